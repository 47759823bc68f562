use std::collections::HashMap;

/// Methods the dispatcher knows how to serve.
///
/// Anything else is carried as `Other` and answered with 501 Not Implemented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - headers plus the file body
    Get,
    /// HEAD - headers only
    Head,
    /// POST - acknowledged, body ignored
    Post,
    /// Any other token, kept verbatim
    Other(String),
}

impl Method {
    /// Classifies a request-line method token. Matching is case-insensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use liso::http::request::Method;
    /// assert_eq!(Method::from_token("get"), Method::Get);
    /// assert_eq!(Method::from_token("PUT"), Method::Other("PUT".to_string()));
    /// ```
    pub fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case("GET") {
            Method::Get
        } else if token.eq_ignore_ascii_case("HEAD") {
            Method::Head
        } else if token.eq_ignore_ascii_case("POST") {
            Method::Post
        } else {
            Method::Other(token.to_string())
        }
    }
}

/// A parsed HTTP request as produced by the tokenizer.
///
/// Lives for a single dispatch and is then dropped.
#[derive(Debug, Clone)]
pub struct Request {
    /// Method token exactly as sent
    pub method: String,
    /// Request target (e.g. "/index.html"), not normalized
    pub target: String,
    /// Version token (e.g. "HTTP/1.1")
    pub version: String,
    /// Header fields, trimmed
    pub headers: HashMap<String, String>,
    /// Bytes after the header block, capped by Content-Length
    pub body: Vec<u8>,
}

impl Request {
    pub fn method(&self) -> Method {
        Method::from_token(&self.method)
    }

    /// True when the version token is `HTTP/1.1`, compared case-insensitively.
    pub fn is_http11(&self) -> bool {
        self.version.eq_ignore_ascii_case("HTTP/1.1")
    }

    /// Retrieves a header value by name, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Declared body length.
    ///
    /// `None` if the header is missing or not a valid number.
    pub fn content_length(&self) -> Option<usize> {
        self.header("Content-Length").and_then(|v| v.parse().ok())
    }
}
