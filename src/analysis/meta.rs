//! Page metadata extraction and best-effort AJAX endpoint detection.

use std::collections::BTreeMap;

use regex::Regex;

use crate::dom::DocumentModel;
use crate::types::{ApiEndpoint, PageMeta};

/// Extract document metadata: title, meta tags, favicon, external
/// script/stylesheet URLs, and AJAX endpoint hints from inline scripts.
pub fn extract_meta(doc: &DocumentModel) -> PageMeta {
    let mut meta_tags = BTreeMap::new();
    for el in doc.find_all(Some(&["meta"]), None, None) {
        let name = el
            .attribute("name")
            .or_else(|| el.attribute("property"))
            .unwrap_or("");
        if name.is_empty() {
            continue;
        }
        let content = el.attribute("content").unwrap_or("").to_string();
        meta_tags.entry(name.to_string()).or_insert(content);
    }

    let description = meta_tags.get("description").cloned().filter(|v| !v.is_empty());
    let keywords = meta_tags
        .get("keywords")
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let favicon = doc
        .find_all(Some(&["link"]), None, None)
        .into_iter()
        .find(|el| {
            el.attribute("rel")
                .map_or(false, |rel| rel.to_lowercase().contains("icon"))
        })
        .and_then(|el| el.attribute("href"))
        .map(str::to_string);

    let scripts = doc
        .find_all(Some(&["script"]), None, None)
        .into_iter()
        .filter_map(|el| el.attribute("src"))
        .map(str::to_string)
        .collect();

    let stylesheets = doc
        .find_all(Some(&["link"]), None, None)
        .into_iter()
        .filter(|el| {
            el.attribute("rel")
                .map_or(false, |rel| rel.eq_ignore_ascii_case("stylesheet"))
        })
        .filter_map(|el| el.attribute("href"))
        .map(str::to_string)
        .collect();

    PageMeta {
        title: doc.title(),
        description,
        keywords,
        meta_tags,
        favicon,
        scripts,
        stylesheets,
        api_endpoints: scan_api_endpoints(doc),
    }
}

/// Heuristic scan of inline script bodies for fetch/axios/jQuery/XHR calls.
/// Approximate by construction: the method defaults to GET when the pattern
/// has no method capture, and string-built URLs are missed entirely.
pub fn scan_api_endpoints(doc: &DocumentModel) -> Vec<ApiEndpoint> {
    let fetch = Regex::new(r#"fetch\(\s*['"]([^'"]+)['"]"#).expect("static pattern");
    let fetch_method = Regex::new(r#"method\s*:\s*['"](\w+)['"]"#).expect("static pattern");
    let axios = Regex::new(r#"axios\.(get|post|put|delete|patch)\s*\(\s*['"]([^'"]+)['"]"#)
        .expect("static pattern");
    let jquery =
        Regex::new(r#"\$\.(get|post)\s*\(\s*['"]([^'"]+)['"]"#).expect("static pattern");
    let xhr = Regex::new(r#"\.open\(\s*['"]([A-Za-z]+)['"]\s*,\s*['"]([^'"]+)['"]"#)
        .expect("static pattern");

    let mut endpoints = Vec::new();
    let mut push = |method: String, url: String| {
        let endpoint = ApiEndpoint { method, url };
        if !endpoints.contains(&endpoint) {
            endpoints.push(endpoint);
        }
    };

    for script in doc.find_all(Some(&["script"]), None, None) {
        let body = script.own_text();
        if body.trim().is_empty() {
            continue;
        }

        for capture in fetch.captures_iter(&body) {
            let url = capture[1].to_string();
            // Look for an options object near the call; first hit wins.
            let tail_start = capture.get(0).map(|m| m.end()).unwrap_or(0);
            let tail: String = body[tail_start..].chars().take(200).collect();
            let method = fetch_method
                .captures(&tail)
                .map(|m| m[1].to_uppercase())
                .unwrap_or_else(|| "GET".to_string());
            push(method, url);
        }
        for capture in axios.captures_iter(&body) {
            push(capture[1].to_uppercase(), capture[2].to_string());
        }
        for capture in jquery.captures_iter(&body) {
            push(capture[1].to_uppercase(), capture[2].to_string());
        }
        for capture in xhr.captures_iter(&body) {
            push(capture[1].to_uppercase(), capture[2].to_string());
        }
    }
    endpoints
}
