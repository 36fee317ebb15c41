//! Request body selection and decoding, dispatched on the declared encoding.

use base64::Engine;
use std::collections::HashSet;

use crate::har::{BodyEncoding, Param, PostData, Request};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data";

/// What the generator should emit for a request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// No body (none captured, or a GET).
    Absent,
    /// Raw text body.
    Text(String),
    /// Decoded form fields, rendered as an object so k6 re-encodes them.
    Form(Vec<(String, String)>),
    /// Body present in the capture but not representable; reason goes in a comment.
    Omitted(String),
}

/// Decides how a captured request body is replayed.
pub fn request_body(request: &Request) -> RequestBody {
    let Some(post) = request.post_data.as_ref() else {
        return RequestBody::Absent;
    };
    if request.method.eq_ignore_ascii_case("GET") {
        return RequestBody::Absent;
    }

    let mime = post.mime_type.trim().to_ascii_lowercase();
    if mime.starts_with(MULTIPART) {
        return RequestBody::Omitted(format!("{MULTIPART} bodies are not replayed"));
    }
    if mime.starts_with(FORM_URLENCODED) && !post.params.is_empty() {
        match form_fields(&post.params) {
            Ok(fields) => return RequestBody::Form(fields),
            Err(reason) => {
                tracing::debug!(url = %request.url, "replaying form body as text: {reason}");
                return match decode_text(post) {
                    RequestBody::Absent => RequestBody::Omitted(reason),
                    body => body,
                };
            }
        }
    }
    decode_text(post)
}

/// Decoded form fields, or why they cannot be rendered as an object literal
/// (undecodable bytes, or a repeated name that an object would collapse).
fn form_fields(params: &[Param]) -> Result<Vec<(String, String)>, String> {
    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(params.len());
    for p in params {
        let name = form_unescape(&p.name)
            .ok_or_else(|| format!("form field name {:?} is not UTF-8", p.name))?;
        let value = form_unescape(&p.value)
            .ok_or_else(|| format!("form field {:?} value is not UTF-8", p.name))?;
        if !seen.insert(name.clone()) {
            return Err(format!("form field {name:?} is repeated"));
        }
        fields.push((name, value));
    }
    Ok(fields)
}

fn decode_text(post: &PostData) -> RequestBody {
    let text = match post.text.as_deref() {
        None | Some("") => return RequestBody::Absent,
        Some(t) => t,
    };
    match &post.encoding {
        BodyEncoding::PlainText => RequestBody::Text(text.to_string()),
        BodyEncoding::Base64 => {
            let bytes = match base64::engine::general_purpose::STANDARD.decode(text.trim()) {
                Ok(b) => b,
                Err(e) => return RequestBody::Omitted(format!("invalid base64 body: {e}")),
            };
            match String::from_utf8(bytes) {
                Ok(s) => RequestBody::Text(s),
                Err(e) => RequestBody::Omitted(format!(
                    "binary body of {} bytes",
                    e.as_bytes().len()
                )),
            }
        }
        BodyEncoding::Unknown(enc) => {
            RequestBody::Omitted(format!("unsupported body encoding {enc:?}"))
        }
    }
}

/// Decodes `application/x-www-form-urlencoded` text: `+` is a space, `%XX` a byte.
/// `None` when the decoded bytes are not UTF-8.
fn form_unescape(s: &str) -> Option<String> {
    let spaced = s.replace('+', " ");
    percent_encoding::percent_decode_str(&spaced)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}
