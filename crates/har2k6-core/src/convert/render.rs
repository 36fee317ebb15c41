//! k6 script rendering.

use std::collections::HashSet;

use super::batch::Batch;
use super::body::{request_body, RequestBody};
use super::escape::{comment_text, js_string};
use super::ConvertConfig;
use crate::har::{Archive, Creator, Header, Request};

/// Headers never replayed; k6 computes Content-Length from the body.
const IGNORED_HEADERS: [&str; 1] = ["content-length"];

/// Line-oriented script buffer with fixed four-space indentation.
struct ScriptWriter {
    out: String,
}

impl ScriptWriter {
    fn new() -> Self {
        Self { out: String::new() }
    }

    fn line(&mut self, indent: usize, text: &str) {
        for _ in 0..indent {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Renders the complete script for already-filtered, already-batched entries.
pub fn render_script(archive: &Archive, batches: &[Batch<'_>], config: &ConvertConfig) -> String {
    let mut w = ScriptWriter::new();

    if config.enable_checks {
        w.line(0, r#"import { check, sleep } from "k6";"#);
    } else {
        w.line(0, r#"import { sleep } from "k6";"#);
    }
    w.line(0, r#"import http from "k6/http";"#);
    w.blank();

    write_header_comments(&mut w, archive);

    w.line(0, "export let options = {");
    w.line(1, "maxRedirects: 0,");
    w.line(0, "};");
    w.blank();

    w.line(0, "export default function() {");
    if !batches.is_empty() {
        w.line(1, "let req, res;");
    }
    for batch in batches {
        if let Some(pause) = batch.pause_before {
            w.line(1, &format!("sleep({});", seconds(pause.num_milliseconds())));
        }
        write_batch(&mut w, batch, config);
    }
    w.line(0, "}");

    w.finish()
}

fn write_header_comments(w: &mut ScriptWriter, archive: &Archive) {
    let mut wrote = false;
    if !archive.version.is_empty() {
        w.line(0, &format!("// Version: {}", comment_text(&archive.version)));
        wrote = true;
    }
    if let Some(creator) = &archive.creator {
        w.line(0, &format!("// Creator: {}", creator_text(creator)));
        wrote = true;
    }
    if let Some(browser) = &archive.browser {
        w.line(0, &format!("// Browser: {}", creator_text(browser)));
        wrote = true;
    }
    if let Some(comment) = &archive.comment {
        w.line(0, &format!("// {}", comment_text(comment)));
        wrote = true;
    }
    for page in &archive.pages {
        w.line(
            0,
            &format!(
                "// Page: {} - {}",
                comment_text(&page.id),
                comment_text(&page.title)
            ),
        );
        wrote = true;
    }
    if wrote {
        w.blank();
    }
}

fn creator_text(creator: &Creator) -> String {
    comment_text(&format!("{} {}", creator.name, creator.version))
}

fn write_batch(w: &mut ScriptWriter, batch: &Batch<'_>, config: &ConvertConfig) {
    w.line(1, "req = [");
    for entry in &batch.entries {
        write_request(w, &entry.request);
    }
    w.line(1, "];");
    w.line(1, "res = http.batch(req);");

    if !config.enable_checks {
        return;
    }
    for (i, entry) in batch.entries.iter().enumerate() {
        let status = entry.response.status;
        if status == 0 {
            continue;
        }
        let check = format!(
            "check(res[{i}], {{ {}: (r) => r.status === {status} }})",
            js_string(&format!("status is {status}"))
        );
        if config.return_on_failed_check {
            w.line(1, &format!("if (!{check}) {{ return; }}"));
        } else {
            w.line(1, &format!("{check};"));
        }
    }
}

fn write_request(w: &mut ScriptWriter, request: &Request) {
    w.line(2, "{");
    w.line(3, &format!("method: {},", js_string(&request.method.to_ascii_uppercase())));
    w.line(3, &format!("url: {},", js_string(request.url.as_str())));

    match request_body(request) {
        RequestBody::Absent => {}
        RequestBody::Text(text) => w.line(3, &format!("body: {},", js_string(&text))),
        RequestBody::Form(fields) => {
            w.line(3, "body: {");
            for (name, value) in &fields {
                w.line(4, &format!("{}: {},", js_string(name), js_string(value)));
            }
            w.line(3, "},");
        }
        RequestBody::Omitted(reason) => {
            tracing::warn!(url = %request.url, "request body omitted: {reason}");
            w.line(3, &format!("// body omitted: {}", comment_text(&reason)));
        }
    }

    let replay_cookies = !request.cookies.is_empty();
    let headers = replayed_headers(&request.headers, replay_cookies);
    if headers.is_empty() && !replay_cookies {
        w.line(2, "},");
        return;
    }

    w.line(3, "params: {");
    if replay_cookies {
        w.line(4, "cookies: {");
        for cookie in &request.cookies {
            w.line(
                5,
                &format!("{}: {},", js_string(&cookie.name), js_string(&cookie.value)),
            );
        }
        w.line(4, "},");
    }
    if !headers.is_empty() {
        w.line(4, "headers: {");
        for header in headers {
            w.line(
                5,
                &format!("{}: {},", js_string(&header.name), js_string(&header.value)),
            );
        }
        w.line(4, "},");
    }
    w.line(3, "},");
    w.line(2, "},");
}

/// Headers to replay, in captured order and case.
///
/// Drops HTTP/2 pseudo-headers, `Content-Length`, repeats of an earlier name,
/// and `Cookie` when cookies are replayed separately.
pub(crate) fn replayed_headers(headers: &[Header], cookies_replayed: bool) -> Vec<&Header> {
    let mut seen: HashSet<String> = IGNORED_HEADERS.iter().map(|h| h.to_string()).collect();
    if cookies_replayed {
        seen.insert("cookie".to_string());
    }
    headers
        .iter()
        .filter(|h| {
            let name = h.name.trim();
            !name.is_empty() && !name.starts_with(':') && seen.insert(name.to_ascii_lowercase())
        })
        .collect()
}

/// Milliseconds as a k6 `sleep` argument in seconds.
fn seconds(ms: i64) -> String {
    format!("{}.{:03}", ms / 1000, ms % 1000)
}
