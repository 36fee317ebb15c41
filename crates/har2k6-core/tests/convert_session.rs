//! End-to-end conversion of a recorded shop session.
//!
//! Decodes `fixtures/session.har` and checks the generated k6 script against
//! the batching, filtering, and rendering rules.

use har2k6_core::convert::js_string;
use har2k6_core::{convert, decode, ConvertConfig};

const SESSION: &[u8] = include_bytes!("fixtures/session.har");

fn config(enable_checks: bool, threshold: i64, only: &[&str], skip: &[&str]) -> ConvertConfig {
    ConvertConfig::new(
        enable_checks,
        threshold,
        only.iter().map(|s| s.to_string()).collect(),
        skip.iter().map(|s| s.to_string()).collect(),
    )
}

fn positions(script: &str, needles: &[&str]) -> Vec<usize> {
    needles
        .iter()
        .map(|n| script.find(n).unwrap_or_else(|| panic!("{n} not in script")))
        .collect()
}

#[test]
fn session_converts_with_defaults() {
    let archive = decode(SESSION).unwrap();
    assert_eq!(archive.entries.len(), 6);

    let script = convert(&archive, &ConvertConfig::default()).unwrap();

    assert!(script.contains("// Version: 1.2"));
    assert!(script.contains("// Creator: WebInspector 537.36"));
    assert!(script.contains("// Browser: Chrome 124.0"));
    assert!(script.contains("// Page: page_1 - Shop - Home"));
    assert!(script.contains("maxRedirects: 0,"));

    // 0, 150, 200 | 2700, 2900 | 4000
    assert_eq!(script.matches("res = http.batch(req);").count(), 3);
    assert!(script.contains("sleep(2.500);"));
    assert!(script.contains("sleep(1.100);"));

    let order = positions(
        &script,
        &[
            "https://shop.example.com/\"",
            "google-analytics.com",
            "static.example.com/app.js",
            "sleep(2.500)",
            "shop.example.com/login",
            "api.example.com/v1/cart",
            "sleep(1.100)",
            "api.example.com/v1/avatar",
        ],
    );
    assert!(order.windows(2).all(|w| w[0] < w[1]), "{order:?}");
}

#[test]
fn session_only_and_skip() {
    let archive = decode(SESSION).unwrap();
    let script = convert(
        &archive,
        &config(false, 500, &[" Example.com "], &["static.example.com"]),
    )
    .unwrap();
    assert!(!script.contains("google-analytics.com"));
    assert!(!script.contains("static.example.com"));
    assert!(script.contains("https://shop.example.com/login"));
    assert!(script.contains("https://api.example.com/v1/cart"));
}

#[test]
fn session_headers_cookies_and_bodies() {
    let archive = decode(SESSION).unwrap();
    let script = convert(&archive, &ConvertConfig::default()).unwrap();

    assert!(!script.contains(":authority"));
    assert!(!script.contains("Content-Length"));
    assert!(script.contains(r#""session": "s3cr3t","#));
    assert!(script.contains(r#""User-Agent": "Mozilla/5.0","#));

    let quirky = js_string("say \"hi\"\\n ${boom}");
    assert!(script.contains(&format!(r#""X-Quirky": {quirky},"#)));
    assert!(script.contains(r#"\${boom}"#));

    assert!(script.contains(r#""user": "jane@example.com","#));
    assert!(script.contains(r#""pw": "p&ss","#));

    let json = js_string("{\"sku\": \"A-1\",\n \"note\": \"line\\nbreak\"}");
    assert!(script.contains(&format!("body: {json},")));

    assert!(script.contains("// body omitted: binary body of 8 bytes"));
}

#[test]
fn session_status_checks() {
    let archive = decode(SESSION).unwrap();
    let script = convert(&archive, &config(true, 500, &[], &[])).unwrap();
    // Second batch: login (302) then cart (201); the avatar upload has no captured status.
    assert!(script.contains(r#"check(res[0], { "status is 302": (r) => r.status === 302 });"#));
    assert!(script.contains(r#"check(res[1], { "status is 201": (r) => r.status === 201 });"#));
    assert_eq!(script.matches("check(res[").count(), 5);
}

#[test]
fn session_threshold_extremes() {
    let archive = decode(SESSION).unwrap();

    let split = convert(&archive, &config(false, 0, &[], &[])).unwrap();
    assert_eq!(split.matches("res = http.batch(req);").count(), 6);
    assert_eq!(split.matches("sleep(").count(), 5);

    let single = convert(&archive, &config(false, i64::MAX / 2, &[], &[])).unwrap();
    assert_eq!(single.matches("res = http.batch(req);").count(), 1);
    assert_eq!(single.matches("sleep(").count(), 0);
}

#[test]
fn session_conversion_is_deterministic() {
    let cfg = config(true, 500, &["example.com"], &[]);
    let first = convert(&decode(SESSION).unwrap(), &cfg).unwrap();
    let second = convert(&decode(SESSION).unwrap(), &cfg).unwrap();
    assert_eq!(first, second);
}
