//! Decoded archive model: the validated, capture-ordered request timeline.

use chrono::{DateTime, FixedOffset};
use url::Url;

/// Root decoded object.
#[derive(Debug, Clone)]
pub struct Archive {
    /// HAR format version (e.g. "1.2"); empty when the capture omits it.
    pub version: String,
    pub creator: Option<Creator>,
    pub browser: Option<Creator>,
    pub comment: Option<String>,
    pub pages: Vec<Page>,
    /// Entries in capture order. This order is the only timing reference.
    pub entries: Vec<Entry>,
}

/// Name/version of the tool that produced the capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub started: Option<DateTime<FixedOffset>>,
}

/// One captured request/response exchange.
#[derive(Debug, Clone)]
pub struct Entry {
    pub pageref: Option<String>,
    pub started: DateTime<FixedOffset>,
    /// Total elapsed time of the exchange in milliseconds.
    pub time_ms: f64,
    pub request: Request,
    pub response: Response,
}

impl Entry {
    /// Host of the request URL; `None` only for host-less URLs, which the decoder rejects.
    pub fn host(&self) -> Option<&str> {
        self.request.url.host_str()
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub url: Url,
    /// Headers verbatim, in captured order and case.
    pub headers: Vec<Header>,
    pub cookies: Vec<Cookie>,
    pub post_data: Option<PostData>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

/// Form parameter from `postData.params`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct PostData {
    pub mime_type: String,
    pub text: Option<String>,
    pub encoding: BodyEncoding,
    pub params: Vec<Param>,
}

/// Declared encoding of a captured body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyEncoding {
    PlainText,
    Base64,
    /// Any other declared encoding, kept for diagnostics.
    Unknown(String),
}

impl BodyEncoding {
    /// Classifies the HAR `encoding` field. Absent or empty means plain text.
    pub fn from_declared(declared: Option<&str>) -> Self {
        let declared = match declared.map(str::trim) {
            None | Some("") => return BodyEncoding::PlainText,
            Some(d) => d,
        };
        if declared.eq_ignore_ascii_case("base64") {
            BodyEncoding::Base64
        } else if declared.eq_ignore_ascii_case("utf-8")
            || declared.eq_ignore_ascii_case("utf8")
            || declared.eq_ignore_ascii_case("identity")
        {
            BodyEncoding::PlainText
        } else {
            BodyEncoding::Unknown(declared.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Captured status; 0 when the capture recorded no response.
    pub status: u16,
    pub status_text: String,
}
