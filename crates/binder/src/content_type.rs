use std::fmt;

const JSON_MARKER: &str = "json";
const XML_MARKER: &str = "xml";
const FORM_MARKER: &str = "form-urlencoded";
const MULTIPART_MARKER: &str = "multipart/form-data";

/// The binding strategy selected for a `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    Xml,
    Form,
    Multipart,
}

impl ContentKind {
    /// Classifies a `Content-Type` value by substring, checking json, xml, url-encoded form and
    /// multipart in that order. Returns `None` if no marker matches.
    pub fn classify(content_type: &str) -> Option<Self> {
        if content_type.contains(JSON_MARKER) {
            Some(ContentKind::Json)
        } else if content_type.contains(XML_MARKER) {
            Some(ContentKind::Xml)
        } else if content_type.contains(FORM_MARKER) {
            Some(ContentKind::Form)
        } else if content_type.contains(MULTIPART_MARKER) {
            Some(ContentKind::Multipart)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Json => "json",
            ContentKind::Xml => "xml",
            ContentKind::Form => "form",
            ContentKind::Multipart => "multipart",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_types() {
        assert_eq!(ContentKind::classify("application/json"), Some(ContentKind::Json));
        assert_eq!(ContentKind::classify("application/json; charset=utf-8"), Some(ContentKind::Json));
        assert_eq!(ContentKind::classify("application/problem+json"), Some(ContentKind::Json));
        assert_eq!(ContentKind::classify("text/xml"), Some(ContentKind::Xml));
        assert_eq!(ContentKind::classify("application/xml"), Some(ContentKind::Xml));
        assert_eq!(ContentKind::classify("application/x-www-form-urlencoded"), Some(ContentKind::Form));
        assert_eq!(ContentKind::classify("multipart/form-data; boundary=abc"), Some(ContentKind::Multipart));
    }

    #[test]
    fn first_marker_wins() {
        assert_eq!(ContentKind::classify("multipart/form-data; boundary=json"), Some(ContentKind::Json));
        assert_eq!(ContentKind::classify("application/xml+json"), Some(ContentKind::Json));
    }

    #[test]
    fn classify_unknown_types() {
        for content_type in ["unsupported", "text/plain", "multipart/mixed", "application/octet-stream", "JSON"] {
            assert_eq!(ContentKind::classify(content_type), None, "{content_type}");
        }
    }
}
