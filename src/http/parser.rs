use crate::http::request::Request;
use std::collections::HashMap;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed request line")]
    InvalidRequest,
    #[error("malformed header line")]
    InvalidHeader,
    #[error("header block is not valid UTF-8")]
    InvalidEncoding,
    #[error("header block not terminated")]
    Incomplete,
}

/// Parses one request out of the bytes delivered by a single read.
///
/// The whole request head must be present; nothing is carried over between
/// reads. Any method token is accepted. Body bytes are whatever follows the
/// blank line, truncated to `Content-Length` when that header is present.
pub fn parse_request(buf: &[u8]) -> Result<Request, ParseError> {
    // Look for header/body separator
    let headers_end = find_headers_end(buf).ok_or(ParseError::Incomplete)?;
    let header_bytes = &buf[..headers_end];
    let body_bytes = &buf[headers_end + 4..];

    let headers_str =
        std::str::from_utf8(header_bytes).map_err(|_| ParseError::InvalidEncoding)?;

    let mut lines = headers_str.split("\r\n");

    // Request line
    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let mut parts = request_line.split_whitespace();

    let method = parts.next().ok_or(ParseError::InvalidRequest)?;
    let target = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().ok_or(ParseError::InvalidRequest)?;
    if parts.next().is_some() {
        return Err(ParseError::InvalidRequest);
    }

    // Headers
    let mut headers = HashMap::new();

    for line in lines {
        if line.is_empty() {
            continue;
        }

        let (key, value) = line.split_once(':').ok_or(ParseError::InvalidHeader)?;

        headers.insert(key.trim().to_string(), value.trim().to_string());
    }

    let mut request = Request {
        method: method.to_string(),
        target: target.to_string(),
        version: version.to_string(),
        headers,
        body: body_bytes.to_vec(),
    };

    if let Some(len) = request.content_length() {
        request.body.truncate(len);
    }

    Ok(request)
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
