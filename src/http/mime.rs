//! Content-type lookup by file suffix.

const TYPES: &[(&str, &str)] = &[
    (".html", "text/html"),
    (".css", "text/css"),
    (".js", "application/javascript"),
    (".jpg", "image/jpeg"),
    (".png", "image/png"),
    (".gif", "image/gif"),
];

pub const DEFAULT_TYPE: &str = "text/plain";

/// Maps a path to its MIME type. First matching suffix wins.
pub fn content_type(path: &str) -> &'static str {
    TYPES
        .iter()
        .find(|(suffix, _)| path.ends_with(suffix))
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_TYPE)
}
