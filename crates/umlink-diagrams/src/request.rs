//! Image address for a diagram.

use crate::language::DiagramFormat;

/// Resolved server, format and payload for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// Server base URL without trailing slash.
    pub server_url: String,
    /// Requested image format.
    pub format: DiagramFormat,
    /// Encoded diagram source.
    pub payload: String,
}

impl RenderRequest {
    /// Create a request, dropping a trailing `/` from `server_url`.
    #[must_use]
    pub fn new(server_url: &str, format: DiagramFormat, payload: String) -> Self {
        Self {
            server_url: server_url.trim_end_matches('/').to_owned(),
            format,
            payload,
        }
    }

    /// `{server_url}/{format}/{payload}`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}/{}/{}", self.server_url, self.format, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_url() {
        let request = RenderRequest::new("http://localhost:8080", DiagramFormat::Png, "abc".to_owned());
        assert_eq!(request.url(), "http://localhost:8080/png/abc");
    }

    #[test]
    fn test_trailing_slash_dropped() {
        let request = RenderRequest::new("https://plantuml.example.com/plantuml/", DiagramFormat::Svg, "abc".to_owned());
        assert_eq!(request.server_url, "https://plantuml.example.com/plantuml");
        assert_eq!(request.url(), "https://plantuml.example.com/plantuml/svg/abc");
    }
}
