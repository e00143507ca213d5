//! HTTP message types consumed by entity serializers.

use std::collections::HashMap;

use crate::header::ContentType;

/// Read-only view of an HTTP message as seen by an entity serializer.
///
/// Serializers only look at headers; the body is passed to them separately.
pub trait HttpMessage {
    /// All message headers.
    fn headers(&self) -> &MessageHeaders;

    /// The parsed `Content-Type`, if the message declares one.
    fn content_type(&self) -> Option<&ContentType>;
}

/// HTTP headers collection.
#[derive(Debug, Clone, Default)]
pub struct MessageHeaders {
    inner: HashMap<String, Vec<String>>,
}

impl MessageHeaders {
    /// Create empty headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the first value of a header (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Get every value of a header (case-insensitive).
    #[must_use]
    pub fn get_all(&self, name: &str) -> &[String] {
        self.inner
            .get(&name.to_ascii_lowercase())
            .map_or(&[][..], Vec::as_slice)
    }

    /// Append a header value.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner
            .entry(name.into().to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// Replace all values of a header.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner
            .insert(name.into().to_ascii_lowercase(), vec![value.into()]);
    }

    /// Remove a header, returning its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.inner.remove(&name.to_ascii_lowercase())
    }

    /// Iterate over all headers as (name, values) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Returns the number of distinct header names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Headers of a received or outgoing message, with the `Content-Type` parsed once.
#[derive(Debug, Clone, Default)]
pub struct MessageHead {
    headers: MessageHeaders,
    content_type: Option<ContentType>,
}

impl MessageHead {
    /// Create a message head without headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`MessageHead::set_header`].
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set a header. A `Content-Type` header is parsed and cached.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if name.eq_ignore_ascii_case("content-type") {
            self.content_type = Some(ContentType::parse(&value));
        }
        self.headers.set(name, value);
    }

    /// Set an already-parsed content type.
    pub fn set_content_type(&mut self, content_type: ContentType) {
        self.headers.set("content-type", content_type.to_string());
        self.content_type = Some(content_type);
    }
}

impl HttpMessage for MessageHead {
    fn headers(&self) -> &MessageHeaders {
        &self.headers
    }

    fn content_type(&self) -> Option<&ContentType> {
        self.content_type.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_are_case_insensitive() {
        let mut headers = MessageHeaders::new();
        headers.add("X-Trace", "a");
        headers.add("x-trace", "b");
        assert_eq!(headers.get("X-TRACE"), Some("a"));
        assert_eq!(headers.get_all("x-trace"), ["a", "b"]);
        assert_eq!(headers.len(), 1);

        headers.set("X-Trace", "c");
        assert_eq!(headers.get_all("x-trace"), ["c"]);
        assert_eq!(headers.remove("X-Trace"), Some(vec!["c".to_string()]));
        assert!(headers.is_empty());
    }

    #[test]
    fn test_message_head_parses_content_type() {
        let head = MessageHead::new()
            .with_header("Content-Type", "multipart/form-data; boundary=--token");
        let content_type = head.content_type().expect("content type");
        assert_eq!(content_type.media_type(), "multipart/form-data");
        assert_eq!(content_type.boundary(), Some("--token"));
        assert_eq!(
            head.headers().get("content-type"),
            Some("multipart/form-data; boundary=--token")
        );
    }

    #[test]
    fn test_message_head_without_content_type() {
        let head = MessageHead::new().with_header("Accept", "*/*");
        assert!(head.content_type().is_none());
    }

    #[test]
    fn test_set_content_type_updates_header() {
        let mut head = MessageHead::new();
        head.set_content_type(ContentType::parse("application/json; charset=utf-8"));
        assert_eq!(
            head.headers().get("Content-Type"),
            Some("application/json; charset=utf-8")
        );
    }
}
