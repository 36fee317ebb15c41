//! Raw HAR 1.2 structures as they appear on the wire.
//!
//! Fields the decoder must validate are `Option`s here so that a missing value
//! surfaces as a per-entry error instead of a generic serde message.

use serde::Deserialize;

/// Root HAR document (top-level wrapper).
#[derive(Debug, Deserialize)]
pub struct RawHar {
    pub log: RawLog,
}

#[derive(Debug, Deserialize)]
pub struct RawLog {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub creator: Option<RawCreator>,
    #[serde(default)]
    pub browser: Option<RawCreator>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub pages: Option<Vec<RawPage>>,
    pub entries: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
pub struct RawCreator {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct RawPage {
    #[serde(default, rename = "startedDateTime")]
    pub started_date_time: Option<String>,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub pageref: Option<String>,
    #[serde(default, rename = "startedDateTime")]
    pub started_date_time: Option<String>,
    #[serde(default)]
    pub time: Option<f64>,
    pub request: RawRequest,
    pub response: RawResponse,
}

#[derive(Debug, Deserialize)]
pub struct RawRequest {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub headers: Vec<RawNameValue>,
    #[serde(default)]
    pub cookies: Vec<RawNameValue>,
    #[serde(default, rename = "postData")]
    pub post_data: Option<RawPostData>,
}

#[derive(Debug, Deserialize)]
pub struct RawPostData {
    #[serde(default, rename = "mimeType")]
    pub mime_type: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub params: Vec<RawNameValue>,
}

#[derive(Debug, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default, rename = "statusText")]
    pub status_text: String,
}

/// Shared shape of headers, cookies, and post params.
#[derive(Debug, Deserialize)]
pub struct RawNameValue {
    pub name: String,
    #[serde(default)]
    pub value: String,
}
