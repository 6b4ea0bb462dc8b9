//! Test fixtures for building multipart submissions.

/// Boundary used by the hand-rolled multipart bodies below.
pub const BOUNDARY: &str = "exhibit-test-boundary";

/// Content-Type header value matching [`multipart_body`].
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Build a multipart/form-data body with an `image` file part and an
/// optional `databases` part.
#[allow(dead_code)]
pub fn multipart_body(filename: &str, data: &[u8], databases: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();

    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");

    if let Some(databases) = databases {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"databases\"\r\n\r\n");
        body.extend_from_slice(databases.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Build a multipart body with only a `databases` part and no file.
#[allow(dead_code)]
pub fn multipart_body_without_image(databases: &str) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"databases\"\r\n\r\n");
    body.extend_from_slice(databases.as_bytes());
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
