//! Header block of a single multipart section.

use bodykit_core::{Charset, HeaderValue};

const CONTENT_DISPOSITION: &str = "content-disposition";

/// What a section's headers say about it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PartHeaders {
    /// The `name` parameter, empty when absent.
    pub(crate) name: String,
    /// The `filename` parameter. Its presence makes the section a file.
    pub(crate) filename: Option<String>,
}

/// Interpret the header lines of one section (CRLF already stripped).
///
/// Only `Content-Disposition` is read. Lines without a colon and headers with any other
/// name are skipped; they never fail the decode. If `Content-Disposition` repeats, the
/// first one wins.
pub(crate) fn parse_part_headers<L: AsRef<[u8]>>(lines: &[L], charset: Charset) -> PartHeaders {
    for line in lines {
        let line = charset.decode_without_bom_handling(line.as_ref()).0;
        let Some((name, value)) = line.split_once(':') else {
            tracing::debug!(line = %line, "skipping malformed part header line");
            continue;
        };
        if !name.trim().eq_ignore_ascii_case(CONTENT_DISPOSITION) {
            continue;
        }

        let disposition = HeaderValue::parse(value);
        return PartHeaders {
            name: disposition.parameter("name").unwrap_or_default().to_string(),
            filename: disposition.parameter("filename").map(str::to_string),
        };
    }
    PartHeaders::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_8, WINDOWS_1252};

    #[test]
    fn test_text_field() {
        let headers = parse_part_headers(&["Content-Disposition: form-data; name=\"key\""], UTF_8);
        assert_eq!(headers.name, "key");
        assert_eq!(headers.filename, None);
    }

    #[test]
    fn test_file_field() {
        let headers = parse_part_headers(
            &[
                "Content-Disposition: form-data; name=\"key\"; filename=\"test.txt\"",
                "Content-Type: text/plain",
            ],
            UTF_8,
        );
        assert_eq!(headers.name, "key");
        assert_eq!(headers.filename.as_deref(), Some("test.txt"));
    }

    #[test]
    fn test_empty_filename_is_still_a_file() {
        let headers = parse_part_headers(&["content-disposition: form-data; filename=\"\""], UTF_8);
        assert_eq!(headers.name, "");
        assert_eq!(headers.filename.as_deref(), Some(""));
    }

    #[test]
    fn test_missing_name_defaults_to_empty() {
        let headers = parse_part_headers(&["Content-Disposition: form-data"], UTF_8);
        assert_eq!(headers, PartHeaders::default());
    }

    #[test]
    fn test_malformed_and_unknown_lines_are_ignored() {
        let headers = parse_part_headers(
            &[
                "Wrong",
                "Unused: value",
                "Content-disposition: form-data; name=\"key\"",
            ],
            UTF_8,
        );
        assert_eq!(headers.name, "key");
    }

    #[test]
    fn test_no_headers() {
        let lines: [&[u8]; 0] = [];
        assert_eq!(parse_part_headers(&lines, UTF_8), PartHeaders::default());
    }

    #[test]
    fn test_first_disposition_and_first_parameter_win() {
        let headers = parse_part_headers(
            &[
                "Content-Disposition: form-data; name=first; NAME=second",
                "Content-Disposition: form-data; name=third; filename=x",
            ],
            UTF_8,
        );
        assert_eq!(headers.name, "first");
        assert_eq!(headers.filename, None);
    }

    #[test]
    fn test_lines_are_decoded_with_charset() {
        let line: &[u8] = b"Content-Disposition: form-data; filename=\"caf\xe9.txt\"";
        let headers = parse_part_headers(&[line], WINDOWS_1252);
        assert_eq!(headers.filename.as_deref(), Some("café.txt"));
    }
}
