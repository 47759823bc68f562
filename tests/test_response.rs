use liso::http::response::{ResponseBuilder, StatusCode, reason_for};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
    assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
    assert_eq!(StatusCode::HttpVersionNotSupported.as_u16(), 505);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
    assert_eq!(StatusCode::NotImplemented.reason_phrase(), "Not Implemented");
    assert_eq!(
        StatusCode::HttpVersionNotSupported.reason_phrase(),
        "HTTP Version Not Supported"
    );
}

#[test]
fn test_unknown_code_reason() {
    assert_eq!(reason_for(404), "Not Found");
    assert_eq!(reason_for(418), "Unknown Error");
    assert_eq!(StatusCode::from_u16(418), None);
}

#[test]
fn test_response_builder_uses_code_reason() {
    let response = ResponseBuilder::new(StatusCode::NotFound).build();

    assert_eq!(response.code, 404);
    assert_eq!(response.reason, "Not Found");
    assert_eq!(response.version, "HTTP/1.1");
    assert!(response.headers.is_empty());
}

#[test]
fn test_response_builder_keeps_header_order_and_case() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Server", "Liso/1.0")
        .header("Content-type", "text/html")
        .header("Content-length", "0")
        .build();

    let names: Vec<&str> = response.headers.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, ["Server", "Content-type", "Content-length"]);
    assert_eq!(response.header("content-type"), Some("text/html"));
}

#[test]
fn test_head_bytes_layout() {
    let mut response = ResponseBuilder::with_code(505)
        .version("HTTP/1.0")
        .header("Content-Length", "26")
        .build();
    response.body = b"ignored".to_vec();

    assert_eq!(
        response.head_bytes(),
        b"HTTP/1.0 505 HTTP Version Not Supported\r\nContent-Length: 26\r\n\r\n".to_vec()
    );
}

#[test]
fn test_reason_override() {
    let response = ResponseBuilder::new(StatusCode::Ok).reason("No Content").build();
    assert!(response.head_bytes().starts_with(b"HTTP/1.1 200 No Content\r\n"));
}
