//! Script generator: filter → batch → render.
//!
//! Turns a decoded [`Archive`] into k6 script source. Each batch of
//! time-proximate requests becomes one `http.batch` call; idle gaps between
//! batches become `sleep` calls. Conversion is a pure function of its inputs.

mod batch;
mod body;
mod error;
mod escape;
mod filter;
mod options;
mod render;

pub use batch::{split_into_batches, Batch};
pub use body::{request_body, RequestBody};
pub use error::ConvertError;
pub use escape::js_string;
pub use filter::{host_matches, DomainFilter};
pub use options::{ConvertConfig, DEFAULT_BATCH_THRESHOLD_MS};

use crate::har::{Archive, Entry};

/// Converts a decoded archive into k6 script text.
///
/// The configuration is validated before any entry is looked at. An archive
/// with no entries (or none surviving the domain filter) yields a valid script
/// with an empty entry point.
pub fn convert(archive: &Archive, config: &ConvertConfig) -> Result<String, ConvertError> {
    config.validate()?;

    let kept = filter_entries(archive, config)?;
    let batches = split_into_batches(&kept, config.batch_threshold());
    let script = render::render_script(archive, &batches, config);

    tracing::info!(
        total = archive.entries.len(),
        kept = kept.len(),
        batches = batches.len(),
        checks = config.enable_checks,
        "converted HAR to k6 script"
    );
    Ok(script)
}

/// Capture-ordered entries whose host passes the only/skip lists.
fn filter_entries<'a>(
    archive: &'a Archive,
    config: &ConvertConfig,
) -> Result<Vec<&'a Entry>, ConvertError> {
    let filter = DomainFilter::new(config.only_domains.as_slice(), config.skip_domains.as_slice());
    let mut kept = Vec::with_capacity(archive.entries.len());
    for (index, entry) in archive.entries.iter().enumerate() {
        let host = entry.host().ok_or_else(|| ConvertError::UnrenderableUrl {
            entry: index,
            url: entry.request.url.to_string(),
        })?;
        if filter.allows(host) {
            kept.push(entry);
        } else {
            tracing::debug!(host, url = %entry.request.url, "skipping filtered entry");
        }
    }
    Ok(kept)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::har::{Request, Response};
    use chrono::{DateTime, TimeDelta};
    use url::Url;

    /// Entry for `url` starting `offset_ms` after a fixed base time.
    pub(crate) fn entry(method: &str, url: &str, offset_ms: i64, status: u16) -> Entry {
        let base = DateTime::parse_from_rfc3339("2024-03-01T12:00:00.000Z").unwrap();
        Entry {
            pageref: None,
            started: base + TimeDelta::milliseconds(offset_ms),
            time_ms: 10.0,
            request: Request {
                method: method.to_string(),
                url: Url::parse(url).unwrap(),
                headers: Vec::new(),
                cookies: Vec::new(),
                post_data: None,
            },
            response: Response {
                status,
                status_text: String::new(),
            },
        }
    }

    pub(crate) fn entry_at(offset_ms: i64) -> Entry {
        entry("GET", &format!("https://example.com/r{offset_ms}"), offset_ms, 200)
    }

    pub(crate) fn archive(entries: Vec<Entry>) -> Archive {
        Archive {
            version: "1.2".to_string(),
            creator: None,
            browser: None,
            comment: None,
            pages: Vec::new(),
            entries,
        }
    }

    #[test]
    fn three_entry_scenario() {
        let a = archive(vec![
            entry("GET", "https://example.com/one", 0, 200),
            entry("GET", "https://example.com/two", 100, 200),
            entry("GET", "https://example.com/three", 700, 200),
        ]);
        let script = convert(&a, &ConvertConfig::default()).unwrap();
        assert_eq!(script.matches("http.batch(req)").count(), 2);
        assert_eq!(script.matches("sleep(").count(), 1);
        assert!(script.contains("sleep(0.600);"));
        assert!(!script.contains("check("));

        let one = script.find("/one").unwrap();
        let two = script.find("/two").unwrap();
        let sleep = script.find("sleep(0.600)").unwrap();
        let three = script.find("/three").unwrap();
        assert!(one < two && two < sleep && sleep < three);
    }

    #[test]
    fn only_filter_scenario() {
        let a = archive(vec![
            entry("GET", "https://a.example.com/keep", 0, 200),
            entry("GET", "https://b.other.com/drop", 10, 200),
        ]);
        let cfg = ConvertConfig::new(false, 500, vec!["example.com".into()], Vec::new());
        let script = convert(&a, &cfg).unwrap();
        assert!(script.contains("https://a.example.com/keep"));
        assert!(!script.contains("b.other.com"));
    }

    #[test]
    fn filtered_entries_do_not_affect_pacing() {
        let a = archive(vec![
            entry("GET", "https://example.com/a", 0, 200),
            entry("GET", "https://ads.tracker.io/px", 400, 200),
            entry("GET", "https://example.com/b", 800, 200),
        ]);
        let cfg = ConvertConfig::new(false, 500, Vec::new(), vec!["tracker.io".into()]);
        let script = convert(&a, &cfg).unwrap();
        assert!(!script.contains("tracker.io"));
        assert!(script.contains("sleep(0.800);"));
        assert_eq!(script.matches("http.batch(req)").count(), 2);
    }

    #[test]
    fn filtering_ignores_path_and_query() {
        let a = archive(vec![entry(
            "GET",
            "https://cdn.net/example.com/x?host=example.com",
            0,
            200,
        )]);
        let cfg = ConvertConfig::new(false, 500, vec!["example.com".into()], Vec::new());
        let script = convert(&a, &cfg).unwrap();
        assert!(!script.contains("cdn.net"));
    }

    #[test]
    fn empty_archive_yields_empty_entry_point() {
        let script = convert(&archive(Vec::new()), &ConvertConfig::default()).unwrap();
        assert!(script.contains("export default function() {\n}\n"));
        assert!(!script.contains("http.batch"));
        assert!(!script.contains("let req, res;"));
    }

    #[test]
    fn everything_filtered_is_not_an_error() {
        let a = archive(vec![entry("GET", "https://example.com/", 0, 200)]);
        let cfg = ConvertConfig::new(false, 500, vec!["nowhere.test".into()], Vec::new());
        let script = convert(&a, &cfg).unwrap();
        assert!(!script.contains("http.batch"));
    }

    #[test]
    fn invalid_config_rejected_before_processing() {
        let a = archive(vec![entry_at(0)]);
        let cfg = ConvertConfig::new(false, -5, Vec::new(), Vec::new());
        assert_eq!(convert(&a, &cfg), Err(ConvertError::NegativeThreshold(-5)));
    }

    #[test]
    fn host_less_url_is_an_invariant_violation() {
        let mut e = entry_at(0);
        e.request.url = Url::parse("mailto:someone@example.com").unwrap();
        let a = archive(vec![entry_at(0), e]);
        assert!(matches!(
            convert(&a, &ConvertConfig::default()),
            Err(ConvertError::UnrenderableUrl { entry: 1, .. })
        ));
    }

    #[test]
    fn status_checks_when_enabled() {
        let a = archive(vec![
            entry("GET", "https://example.com/ok", 0, 200),
            entry("GET", "https://example.com/none", 1, 0),
            entry("POST", "https://example.com/created", 2, 201),
        ]);
        let cfg = ConvertConfig::new(true, 500, Vec::new(), Vec::new());
        let script = convert(&a, &cfg).unwrap();
        assert!(script.starts_with("import { check, sleep } from \"k6\";"));
        assert!(script.contains(r#"check(res[0], { "status is 200": (r) => r.status === 200 });"#));
        assert!(script.contains(r#"check(res[2], { "status is 201": (r) => r.status === 201 });"#));
        assert!(!script.contains("res[1]"));
    }

    #[test]
    fn return_on_failed_check_wraps_checks() {
        let a = archive(vec![entry("GET", "https://example.com/", 0, 302)]);
        let cfg = ConvertConfig {
            enable_checks: true,
            return_on_failed_check: true,
            ..ConvertConfig::default()
        };
        let script = convert(&a, &cfg).unwrap();
        assert!(script.contains(
            r#"if (!check(res[0], { "status is 302": (r) => r.status === 302 })) { return; }"#
        ));
    }

    #[test]
    fn zero_threshold_splits_identical_timestamps() {
        let a = archive(vec![
            entry("GET", "https://example.com/a", 0, 200),
            entry("GET", "https://example.com/b", 0, 200),
        ]);
        let cfg = ConvertConfig::new(false, 0, Vec::new(), Vec::new());
        let script = convert(&a, &cfg).unwrap();
        assert_eq!(script.matches("http.batch(req)").count(), 2);
        assert!(script.contains("sleep(0.000);"));
    }

    #[test]
    fn conversion_is_idempotent() {
        let a = archive(vec![entry_at(0), entry_at(50), entry_at(5_000)]);
        let cfg = ConvertConfig::new(true, 500, Vec::new(), Vec::new());
        assert_eq!(convert(&a, &cfg).unwrap(), convert(&a, &cfg).unwrap());
    }

    #[test]
    fn method_and_url_are_rendered() {
        let a = archive(vec![entry("delete", "https://example.com/item/1?x=\"y\"", 0, 204)]);
        let script = convert(&a, &ConvertConfig::default()).unwrap();
        assert!(script.contains(r#"method: "DELETE","#));
        assert!(script.contains(r#"url: "https://example.com/item/1?x=%22y%22","#));
    }
}
