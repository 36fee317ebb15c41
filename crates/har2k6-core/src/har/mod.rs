//! HAR (HTTP Archive) decoder.
//!
//! Parses a HAR 1.2 document into the [`Archive`] model, preserving entry order.
//! Required per-entry fields (method, URL, start time, status) are validated
//! here so that the generator only ever sees well-formed entries.

mod error;
mod model;
mod parse;

pub use error::DecodeError;
pub use model::{
    Archive, BodyEncoding, Cookie, Creator, Entry, Header, Page, Param, PostData, Request,
    Response,
};

use chrono::{DateTime, FixedOffset};
use std::io::Read;
use url::Url;

use parse::{RawCreator, RawEntry, RawHar, RawNameValue, RawPage, RawPostData};

/// Decodes a HAR document from raw bytes.
pub fn decode(bytes: &[u8]) -> Result<Archive, DecodeError> {
    let raw: RawHar = serde_json::from_slice(bytes)?;
    let log = raw.log;

    let entries = log
        .entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| decode_entry(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    let pages = log
        .pages
        .unwrap_or_default()
        .into_iter()
        .map(decode_page)
        .collect();

    tracing::debug!(entries = entries.len(), "decoded HAR archive");

    Ok(Archive {
        version: log.version.unwrap_or_default(),
        creator: log.creator.map(decode_creator),
        browser: log.browser.map(decode_creator),
        comment: log.comment.filter(|c| !c.trim().is_empty()),
        pages,
        entries,
    })
}

/// Reads the whole stream, then decodes it.
pub fn decode_reader<R: Read>(mut reader: R) -> Result<Archive, DecodeError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode(&bytes)
}

fn decode_entry(index: usize, raw: RawEntry) -> Result<Entry, DecodeError> {
    let started_raw = raw
        .started_date_time
        .ok_or(DecodeError::MissingField {
            entry: index,
            field: "startedDateTime",
        })?;
    let started = parse_timestamp(&started_raw).map_err(|e| DecodeError::InvalidField {
        entry: index,
        field: "startedDateTime",
        reason: format!("{started_raw:?}: {e}"),
    })?;

    let method = raw.request.method.ok_or(DecodeError::MissingField {
        entry: index,
        field: "request.method",
    })?;
    let method = method.trim().to_string();
    if method.is_empty() {
        return Err(DecodeError::InvalidField {
            entry: index,
            field: "request.method",
            reason: "empty method".to_string(),
        });
    }

    let url_raw = raw.request.url.ok_or(DecodeError::MissingField {
        entry: index,
        field: "request.url",
    })?;
    let url = Url::parse(url_raw.trim()).map_err(|e| DecodeError::InvalidField {
        entry: index,
        field: "request.url",
        reason: format!("{url_raw:?}: {e}"),
    })?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(DecodeError::InvalidField {
            entry: index,
            field: "request.url",
            reason: format!("{url_raw:?}: URL has no host"),
        });
    }

    let status = raw.response.status.ok_or(DecodeError::MissingField {
        entry: index,
        field: "response.status",
    })?;
    let status = u16::try_from(status)
        .ok()
        .filter(|s| *s <= 999)
        .ok_or_else(|| DecodeError::InvalidField {
            entry: index,
            field: "response.status",
            reason: format!("{status} is not an HTTP status code"),
        })?;

    Ok(Entry {
        pageref: raw.pageref.filter(|p| !p.is_empty()),
        started,
        time_ms: raw.time.filter(|t| t.is_finite() && *t >= 0.0).unwrap_or(0.0),
        request: Request {
            method,
            url,
            headers: raw
                .request
                .headers
                .into_iter()
                .map(|RawNameValue { name, value }| Header { name, value })
                .collect(),
            cookies: raw
                .request
                .cookies
                .into_iter()
                .map(|RawNameValue { name, value }| Cookie { name, value })
                .collect(),
            post_data: raw.request.post_data.map(decode_post_data),
        },
        response: Response {
            status,
            status_text: raw.response.status_text,
        },
    })
}

fn decode_post_data(raw: RawPostData) -> PostData {
    PostData {
        encoding: BodyEncoding::from_declared(raw.encoding.as_deref()),
        mime_type: raw.mime_type,
        text: raw.text,
        params: raw
            .params
            .into_iter()
            .map(|RawNameValue { name, value }| Param { name, value })
            .collect(),
    }
}

/// Pages are informational; a bad page timestamp is dropped rather than rejected.
fn decode_page(raw: RawPage) -> Page {
    let started = raw.started_date_time.as_deref().and_then(|s| {
        parse_timestamp(s)
            .map_err(|e| tracing::debug!(page = %raw.id, "ignoring page startedDateTime: {e}"))
            .ok()
    });
    Page {
        id: raw.id,
        title: raw.title,
        started,
    }
}

fn decode_creator(raw: RawCreator) -> Creator {
    Creator {
        name: raw.name,
        version: raw.version,
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s.trim())
}
