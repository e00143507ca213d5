//! Header value model.
//!
//! HTTP header values such as `Content-Type` and `Content-Disposition` share one shape: a
//! primary value followed by `;`-separated parameters.
//!
//! ```text
//! multipart/form-data; boundary="----token"; charset=utf-8
//! \_________________/  \__________________/  \___________/
//!       value                 parameter        parameter
//! ```
//!
//! Parameter names are case-insensitive and stored lower-cased. Values may be tokens or
//! quoted strings with backslash escapes.

use std::fmt;

use encoding_rs::Encoding;

/// Ordered, case-insensitive collection of header parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterCollection {
    entries: Vec<(String, String)>,
}

impl ParameterCollection {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a parameter value by name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns true if a parameter with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a parameter, replacing any existing value for the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Add a parameter unless one with the same name is already present.
    ///
    /// Returns false when the parameter was ignored as a duplicate.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into().to_ascii_lowercase();
        if self.entries.iter().any(|(key, _)| *key == name) {
            return false;
        }
        self.entries.push((name, value.into()));
        true
    }

    /// Remove a parameter, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self
            .entries
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(index).1)
    }

    /// Parameter names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A parsed header value: primary value plus parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderValue {
    value: String,
    parameters: ParameterCollection,
}

impl HeaderValue {
    /// Create a header value from its parts.
    #[must_use]
    pub fn new(value: impl Into<String>, parameters: ParameterCollection) -> Self {
        Self {
            value: value.into(),
            parameters,
        }
    }

    /// Parse a raw header value.
    ///
    /// Parsing is lenient: segments without `=` or with an empty name are skipped, and a
    /// repeated parameter keeps its first value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut segments = split_unquoted(raw).into_iter();
        let value = segments.next().unwrap_or_default().trim().to_string();

        let mut parameters = ParameterCollection::new();
        for segment in segments {
            let Some((key, raw_value)) = segment.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            parameters.insert_if_absent(key, unquote(raw_value.trim()));
        }

        Self { value, parameters }
    }

    /// The primary value, e.g. `form-data` or `multipart/form-data`.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// All parameters.
    #[must_use]
    pub fn parameters(&self) -> &ParameterCollection {
        &self.parameters
    }

    /// Mutable access to the parameters.
    pub fn parameters_mut(&mut self) -> &mut ParameterCollection {
        &mut self.parameters
    }

    /// Get a single parameter (case-insensitive).
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name)
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)?;
        for (key, value) in self.parameters.iter() {
            if needs_quoting(value) {
                write!(f, "; {key}=\"")?;
                for ch in value.chars() {
                    if ch == '"' || ch == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{ch}")?;
                }
                f.write_str("\"")?;
            } else {
                write!(f, "; {key}={value}")?;
            }
        }
        Ok(())
    }
}

/// A parsed `Content-Type` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentType {
    header: HeaderValue,
}

impl ContentType {
    /// Parse a raw `Content-Type` value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            header: HeaderValue::parse(raw),
        }
    }

    /// The lower-cased media type, e.g. `multipart/form-data`.
    #[must_use]
    pub fn media_type(&self) -> String {
        self.header.value().to_ascii_lowercase()
    }

    /// Returns true if the media type is `multipart/*`.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.header
            .value()
            .get(..10)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("multipart/"))
    }

    /// The `boundary` parameter, if present and not blank.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.header
            .parameter("boundary")
            .filter(|boundary| !boundary.trim().is_empty())
    }

    /// The encoding named by the `charset` parameter, if it is a known label.
    #[must_use]
    pub fn charset(&self) -> Option<&'static Encoding> {
        self.header
            .parameter("charset")
            .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
    }

    /// The underlying header value.
    #[must_use]
    pub fn header(&self) -> &HeaderValue {
        &self.header
    }
}

impl From<HeaderValue> for ContentType {
    fn from(header: HeaderValue) -> Self {
        Self { header }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.header, f)
    }
}

/// Split on `;` outside of quoted strings.
fn split_unquoted(raw: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, ch) in raw.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                segments.push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&raw[start..]);
    segments
}

fn unquote(value: &str) -> String {
    let Some(inner) = value.strip_prefix('"') else {
        return value.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            // Anything after the closing quote is not part of the value.
            '"' => break,
            _ => out.push(ch),
        }
    }
    out
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value.chars().any(|ch| {
            ch.is_ascii_whitespace()
                || ch.is_ascii_control()
                || matches!(
                    ch,
                    '(' | ')' | '<' | '>' | '@' | ',' | ';' | ':' | '\\' | '"' | '/' | '[' | ']'
                        | '?' | '=' | '{' | '}'
                )
        })
}
