//! Transport-agnostic description of an HTTP response.

use std::borrow::Cow;

use crate::header::HeaderMap;

/// The response produced by an executor: status line, headers with
/// multiplicity preserved, and the (already decoded) body bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseDescriptor {
    /// Numeric status code.
    pub status_code: u16,
    /// Reason phrase of the status line; empty when the transport does not
    /// expose one.
    pub status_message: String,
    /// Response headers.
    pub headers: HeaderMap,
    /// Body bytes after content decoding.
    pub body: Vec<u8>,
}

impl ResponseDescriptor {
    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// The body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// The body decoded with the given charset label (e.g. `"gbk"`),
    /// falling back to UTF-8 when the label is unknown.
    pub fn text_with_charset(&self, label: &str) -> String {
        let encoding =
            encoding_rs::Encoding::for_label(label.as_bytes()).unwrap_or(encoding_rs::UTF_8);
        let (text, _, _) = encoding.decode(&self.body);
        text.into_owned()
    }

    /// First value of the given header, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Every value of the given header, in the order received.
    pub fn header_values(&self, name: &str) -> &[String] {
        self.headers.get_all(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_covers_the_2xx_range() {
        let mut response = ResponseDescriptor {
            status_code: 200,
            ..ResponseDescriptor::default()
        };
        assert!(response.is_success());
        response.status_code = 299;
        assert!(response.is_success());
        response.status_code = 301;
        assert!(!response.is_success());
        response.status_code = 404;
        assert!(!response.is_success());
    }

    #[test]
    fn text_decodes_utf8_by_default() {
        let response = ResponseDescriptor {
            body: "héllo".as_bytes().to_vec(),
            ..ResponseDescriptor::default()
        };
        assert_eq!(response.text(), "héllo");
        assert_eq!(response.text_with_charset("utf-8"), "héllo");
    }

    #[test]
    fn text_with_charset_honors_the_label() {
        // "你好" in GBK.
        let response = ResponseDescriptor {
            body: vec![0xc4, 0xe3, 0xba, 0xc3],
            ..ResponseDescriptor::default()
        };
        assert_eq!(response.text_with_charset("gbk"), "你好");
    }
}
