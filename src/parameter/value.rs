//! The closed set of value types a parameter may hold.

use std::fmt;

/// Runtime tag naming the type stored in a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `bool`.
    Bool,
    /// `i64`.
    Integer,
    /// `f64`.
    Float,
    /// `String`.
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bool => "boolean",
            Self::Integer => "integer",
            Self::Float => "floating-point number",
            Self::Text => "string",
        };
        f.write_str(label)
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for bool {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
    impl Sealed for String {}
}

/// A type that can be stored in a [`Parameter`](super::Parameter).
///
/// Implemented for `bool`, `i64`, `f64` and `String` only. Conversions use
/// `str::parse`, so they do not depend on the process locale.
pub trait ParamValue: Clone + fmt::Debug + PartialEq + 'static + sealed::Sealed {
    /// The tag reported for parameters of this type.
    const KIND: ValueKind;

    /// Parses the text found in a configuration file.
    fn parse_text(text: &str) -> Option<Self>;

    /// Parses the text attached to a command-line flag.
    ///
    /// Only booleans differ from [`parse_text`](Self::parse_text): a bare
    /// switch arrives as `"true"`, and unrecognised text still means `true`.
    fn parse_flag(text: &str) -> Option<Self> {
        Self::parse_text(text)
    }

    /// Canonical text shown in help output and schema entries.
    fn to_text(&self) -> String;

    /// Text written to a configuration file.
    ///
    /// [`parse_text`](Self::parse_text) must read it back to an equal value.
    fn to_file_text(&self) -> String {
        self.to_text()
    }

    /// Value held by a parameter declared without a default.
    fn implicit_default() -> Option<Self> {
        None
    }
}

impl ParamValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn parse_text(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        }
    }

    fn parse_flag(text: &str) -> Option<Self> {
        Some(Self::parse_text(text).unwrap_or(true))
    }

    fn to_text(&self) -> String {
        self.to_string()
    }

    fn implicit_default() -> Option<Self> {
        Some(false)
    }
}

impl ParamValue for i64 {
    const KIND: ValueKind = ValueKind::Integer;

    fn parse_text(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }

    fn to_text(&self) -> String {
        self.to_string()
    }
}

impl ParamValue for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn parse_text(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }

    // `Display` for f64 is the shortest text that parses back to the same value.
    fn to_text(&self) -> String {
        self.to_string()
    }
}

/// Strings that an INI line cannot carry verbatim are written between double
/// quotes with backslash escapes. Unquoted file text is taken as is.
impl ParamValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn parse_text(text: &str) -> Option<Self> {
        match text.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
            Some(quoted) => unescape(quoted),
            None => Some(text.to_owned()),
        }
    }

    fn parse_flag(text: &str) -> Option<Self> {
        Some(text.to_owned())
    }

    fn to_text(&self) -> String {
        self.clone()
    }

    fn to_file_text(&self) -> String {
        if needs_quotes(self) {
            format!("\"{}\"", escape(self))
        } else {
            self.clone()
        }
    }
}

fn needs_quotes(text: &str) -> bool {
    text.trim() != text
        || text.starts_with('"')
        || text.contains(['\n', '\r', ';', '#'])
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            ';' => escaped.push_str("\\;"),
            '#' => escaped.push_str("\\#"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Reverses [`escape`]. A dangling or unknown escape yields `None`.
fn unescape(text: &str) -> Option<String> {
    let mut plain = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            plain.push(ch);
            continue;
        }
        let decoded = match chars.next()? {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            other @ ('\\' | '"' | ';' | '#') => other,
            _ => return None,
        };
        plain.push(decoded);
    }
    Some(plain)
}
