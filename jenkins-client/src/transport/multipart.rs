//! `multipart/form-data` bodies
//!
//! Jenkins only accepts form submissions as multipart bodies. The boundary
//! lives in the request's `Content-Type` header, so encoding and header parsing
//! are kept side by side.

use bytes::{BufMut, Bytes, BytesMut};

use super::request::FormField;

/// Fresh random boundary
pub fn generate_boundary() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// `Content-Type` header value for a boundary
pub fn content_type(boundary: &str) -> String {
    format!("multipart/form-data; boundary=\"{boundary}\"")
}

/// Extract the boundary from a `multipart/form-data` content type
///
/// Accepts quoted and bare values; returns `None` for any other media type.
pub fn boundary_from_content_type(content_type: &str) -> Option<&str> {
    let mut params = content_type.split(';');
    let media_type = params.next()?.trim();
    if !media_type.eq_ignore_ascii_case("multipart/form-data") {
        return None;
    }

    params
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|boundary| !boundary.is_empty())
}

/// Encode form fields as a multipart body delimited by `boundary`
pub fn encode(boundary: &str, fields: &[FormField]) -> Bytes {
    let mut body = BytesMut::new();
    for field in fields {
        body.put_slice(format!("--{boundary}\r\n").as_bytes());
        body.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n",
                escape_name(&field.name)
            )
            .as_bytes(),
        );
        body.put_slice(format!("Content-Length: {}\r\n\r\n", field.contents.len()).as_bytes());
        body.put_slice(field.contents.as_bytes());
        body.put_slice(b"\r\n");
    }
    body.put_slice(format!("--{boundary}--\r\n").as_bytes());
    body.freeze()
}

fn escape_name(name: &str) -> String {
    name.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
