use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

/// Value of the `Server` header on every response.
pub const SERVER_NAME: &str = "Liso/1.0";

/// Version written on responses that are not echoing a request's version.
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// HTTP status codes the server emits.
///
/// - `Ok` (200): resource served or POST acknowledged
/// - `BadRequest` (400): request could not be tokenized
/// - `NotFound` (404): resource missing or unreadable
/// - `InternalServerError` (500): resource opened but could not be read
/// - `NotImplemented` (501): method other than GET/HEAD/POST
/// - `HttpVersionNotSupported` (505): version other than HTTP/1.1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
    /// 501 Not Implemented
    NotImplemented,
    /// 505 HTTP Version Not Supported
    HttpVersionNotSupported,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use liso::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::HttpVersionNotSupported.as_u16(), 505);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
            StatusCode::HttpVersionNotSupported => 505,
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            200 => Some(StatusCode::Ok),
            400 => Some(StatusCode::BadRequest),
            404 => Some(StatusCode::NotFound),
            500 => Some(StatusCode::InternalServerError),
            501 => Some(StatusCode::NotImplemented),
            505 => Some(StatusCode::HttpVersionNotSupported),
            _ => None,
        }
    }

    /// Returns the reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use liso::http::response::StatusCode;
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
            StatusCode::HttpVersionNotSupported => "HTTP Version Not Supported",
        }
    }
}

impl From<StatusCode> for u16 {
    fn from(status: StatusCode) -> Self {
        status.as_u16()
    }
}

/// Reason phrase for an arbitrary numeric code, `"Unknown Error"` if unrecognized.
pub fn reason_for(code: u16) -> &'static str {
    StatusCode::from_u16(code)
        .map(|s| s.reason_phrase())
        .unwrap_or("Unknown Error")
}

/// Formats a timestamp as RFC-1123 GMT text, e.g. `Wed, 23 Oct 2024 07:28:00 GMT`.
///
/// Any `SystemTime` is accepted. Times before 1970 are formatted as they are;
/// times outside what chrono can represent are clamped to its range.
pub fn http_date(time: SystemTime) -> String {
    let secs = match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(e) => {
            let before = e.duration();
            // Round toward negative infinity so -0.5s reads as 23:59:59.
            let whole = before.as_secs() + u64::from(before.subsec_nanos() > 0);
            i64::try_from(whole).map_or(i64::MIN, |s| -s)
        }
    };

    let date = DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or(if secs < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    });

    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// A response ready to be serialized.
///
/// Header fields keep insertion order and are written exactly as named.
#[derive(Debug, Clone)]
pub struct Response {
    /// Version token for the status line
    pub version: String,
    pub code: u16,
    pub reason: String,
    /// Ordered header fields
    pub headers: Vec<(String, String)>,
    /// Sent after the head by [`ResponseWriter::full`](crate::http::writer::ResponseWriter::full)
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Server", SERVER_NAME)
///     .header("Content-length", "0")
///     .build();
/// ```
pub struct ResponseBuilder {
    version: String,
    code: u16,
    reason: String,
    headers: Vec<(String, String)>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self::with_code(status.as_u16())
    }

    /// Starts a response for a raw numeric code; the reason comes from [`reason_for`].
    pub fn with_code(code: u16) -> Self {
        Self {
            version: HTTP_VERSION.to_string(),
            code,
            reason: reason_for(code).to_string(),
            headers: Vec::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Overrides the reason phrase on the status line.
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Appends a header field. Fields are serialized in the order added.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn build(self) -> Response {
        Response {
            version: self.version,
            code: self.code,
            reason: self.reason,
            headers: self.headers,
            body: Vec::new(),
        }
    }
}

impl Response {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Status line, header fields and the terminating blank line, in one pass.
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);

        buf.extend_from_slice(
            format!("{} {} {}\r\n", self.version, self.code, self.reason).as_bytes(),
        );

        for (k, v) in &self.headers {
            buf.extend_from_slice(k.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(v.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }

        buf.extend_from_slice(b"\r\n");
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn http_date_is_rfc1123_gmt() {
        // 2024-10-23 07:28:00 UTC
        let t = UNIX_EPOCH + Duration::from_secs(1_729_668_480);
        assert_eq!(http_date(t), "Wed, 23 Oct 2024 07:28:00 GMT");
    }

    #[test]
    fn http_date_before_epoch() {
        let day = Duration::from_secs(86_400);
        assert_eq!(http_date(UNIX_EPOCH - day), "Wed, 31 Dec 1969 00:00:00 GMT");
        assert_eq!(
            http_date(UNIX_EPOCH - Duration::from_millis(500)),
            "Wed, 31 Dec 1969 23:59:59 GMT"
        );
    }

    #[test]
    fn http_date_far_future_does_not_panic() {
        let t = UNIX_EPOCH + Duration::from_secs(300_000_000_000);
        assert!(http_date(t).ends_with(" GMT"));
    }

    #[test]
    fn head_bytes_preserve_field_order() {
        let resp = ResponseBuilder::new(StatusCode::Ok)
            .header("B", "2")
            .header("A", "1")
            .build();
        assert_eq!(resp.head_bytes(), b"HTTP/1.1 200 OK\r\nB: 2\r\nA: 1\r\n\r\n");
    }
}
