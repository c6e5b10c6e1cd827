//! INI file access for the store.
//!
//! Files are opened through `cap_std::fs_utf8`: the parent directory is opened
//! with ambient authority and the file is read or written relative to it.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ini::{Ini, ParseOption};

use crate::error::{ConfigError, Result};

/// Reads `path` to a string.
pub(super) fn read_file(path: &Utf8Path) -> Result<String> {
    let (dir, file_name) = open_parent(path)?;
    dir.read_to_string(file_name)
        .map_err(|source| io_error(path, source))
}

/// Writes `contents` to `path`, replacing any existing file.
pub(super) fn write_file(path: &Utf8Path, contents: &[u8]) -> Result<()> {
    let (dir, file_name) = open_parent(path)?;
    dir.write(file_name, contents)
        .map_err(|source| io_error(path, source))
}

/// Parses INI text without quote or escape processing.
///
/// Values are taken verbatim apart from surrounding whitespace. String
/// parameters decode their own quoting, so a quoted value reaches them intact.
pub(crate) fn parse_ini(content: &str, origin: &str) -> Result<Ini> {
    let options = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    };
    Ini::load_from_str_opt(content, options).map_err(|error| ConfigError::FileSyntax {
        file: origin.to_owned(),
        line: error.line,
        message: error.msg.to_string(),
    })
}

fn open_parent(path: &Utf8Path) -> Result<(Dir, &str)> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let Some(file_name) = path.file_name() else {
        return Err(ConfigError::FileNotFound {
            paths: vec![path.to_path_buf()],
        });
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|source| io_error(path, source))?;
    Ok((dir, file_name))
}

fn io_error(path: &Utf8Path, source: std::io::Error) -> ConfigError {
    if source.kind() == std::io::ErrorKind::NotFound {
        ConfigError::FileNotFound {
            paths: vec![path.to_path_buf()],
        }
    } else {
        ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
