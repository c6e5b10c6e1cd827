//! Configuration file path helpers.
//!
//! Environment access goes through [`mockable::Env`] so the home directory
//! lookup can be replaced in tests.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

/// Replaces a leading `~` with the home directory from `$HOME`.
///
/// Only `~` alone or `~/...` is expanded; `~user` forms and paths without a
/// leading tilde are returned unchanged, as is everything when `$HOME` is
/// unset or empty.
#[must_use]
pub fn expand_tilde<E: mockable::Env>(path: &Utf8Path, env: &E) -> Utf8PathBuf {
    let Some(rest) = path.as_str().strip_prefix('~') else {
        return path.to_path_buf();
    };
    if !(rest.is_empty() || rest.starts_with('/')) {
        return path.to_path_buf();
    }
    env.string("HOME")
        .filter(|home| !home.is_empty())
        .map_or_else(
            || path.to_path_buf(),
            |home| Utf8PathBuf::from(format!("{home}{rest}")),
        )
}

/// Builds the probing list: each candidate with `suffix` appended and `~`
/// expanded, in the given order.
#[must_use]
pub fn candidate_paths<E: mockable::Env>(
    candidates: &[&str],
    suffix: &str,
    env: &E,
) -> Vec<Utf8PathBuf> {
    candidates
        .iter()
        .map(|candidate| expand_tilde(Utf8Path::new(&format!("{candidate}{suffix}")), env))
        .collect()
}

/// Returns the first candidate that exists on disk.
#[must_use]
pub fn first_existing(candidates: &[Utf8PathBuf]) -> Option<&Utf8Path> {
    let found = candidates
        .iter()
        .map(Utf8PathBuf::as_path)
        .find(|path| path.exists());
    if let Some(path) = found {
        debug!(%path, "configuration file found");
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::{fixture, rstest};

    /// Fixture providing a `MockEnv` with `HOME` set.
    #[fixture]
    fn home_env() -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string().returning(|key| {
            if key == "HOME" {
                Some(String::from("/home/user"))
            } else {
                None
            }
        });
        env
    }

    /// Fixture providing a `MockEnv` where nothing is set.
    #[fixture]
    fn empty_env() -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string().returning(|_| None);
        env
    }

    #[rstest]
    #[case("~/.demo.ini", "/home/user/.demo.ini")]
    #[case("~", "/home/user")]
    #[case("/etc/demo.ini", "/etc/demo.ini")]
    #[case("~other/demo.ini", "~other/demo.ini")]
    #[case("dir/~/demo.ini", "dir/~/demo.ini")]
    fn expands_only_leading_tilde(home_env: MockEnv, #[case] input: &str, #[case] expected: &str) {
        assert_eq!(expand_tilde(Utf8Path::new(input), &home_env), expected);
    }

    #[rstest]
    fn unset_home_leaves_path_alone(empty_env: MockEnv) {
        assert_eq!(
            expand_tilde(Utf8Path::new("~/.demo.ini"), &empty_env),
            "~/.demo.ini"
        );
    }

    #[rstest]
    fn candidates_get_suffix_and_expansion(home_env: MockEnv) {
        let paths = candidate_paths(&["~/.config/demo", "/etc/demo"], ".ini", &home_env);
        assert_eq!(
            paths,
            [
                Utf8PathBuf::from("/home/user/.config/demo.ini"),
                Utf8PathBuf::from("/etc/demo.ini"),
            ]
        );
    }

    #[rstest]
    #[expect(clippy::expect_used, reason = "test setup - panics are acceptable")]
    fn first_existing_candidate_wins() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("UTF-8 temp dir");
        let second = root.join("second.ini");
        let third = root.join("third.ini");
        std::fs::write(&second, "").expect("write second");
        std::fs::write(&third, "").expect("write third");

        let candidates = [root.join("first.ini"), second.clone(), third];
        assert_eq!(first_existing(&candidates), Some(second.as_path()));
    }

    #[rstest]
    fn no_existing_candidate_yields_none() {
        let candidates = [Utf8PathBuf::from("/definitely/not/here.ini")];
        assert!(first_existing(&candidates).is_none());
    }
}
