//! Pure parsing helpers for the two week-discovery strategies: scraping a
//! dataset HTML index page, and parsing a search-API JSON response.
//!
//! Both return `(week_id, url)` pairs, deduped (first URL per week wins) and
//! sorted descending by week id — see spec invariant 7.

use std::collections::HashSet;
use std::sync::LazyLock;

use serde_json::Value;

static HREF_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r#"(?i)href\s*=\s*"([^"]*)""#).unwrap());
static WEEK_FILE_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(?i)ipg(\d{8})\.zip").unwrap());

/// Scrape every `href` matching `ipg(\d{8}).zip` out of a dataset index page,
/// resolving relative links against `page_url`.
#[must_use]
pub fn parse_dataset_page_links(html: &str, page_url: &str) -> Vec<(String, String)> {
    let base = url::Url::parse(page_url).ok();
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for caps in HREF_RE.captures_iter(html) {
        let href = &caps[1];
        let Some(week_caps) = WEEK_FILE_RE.captures(href) else {
            continue;
        };
        let week = week_caps[1].to_string();
        if !seen.insert(week.clone()) {
            continue;
        }
        let resolved = base
            .as_ref()
            .and_then(|b| b.join(href).ok())
            .map_or_else(|| href.to_string(), |u| u.to_string());
        out.push((week, resolved));
    }

    out.sort_by(|a, b| b.0.cmp(&a.0));
    out
}

/// Parse a search-API JSON body, tolerating a handful of common envelope
/// shapes (`results`, `items`, `data`, `response.docs`).
#[must_use]
pub fn parse_search_response(body: &Value) -> Vec<(String, String)> {
    let rows = rows_from_envelope(body);
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for row in rows {
        let Some(week) = extract_week_id(row) else {
            continue;
        };
        let Some(url) = extract_url(row) else {
            continue;
        };
        if seen.insert(week.clone()) {
            out.push((week, url));
        }
    }

    out.sort_by(|a, b| b.0.cmp(&a.0));
    out
}

fn rows_from_envelope(body: &Value) -> &[Value] {
    for key in ["results", "items", "data"] {
        if let Some(arr) = body.get(key).and_then(Value::as_array) {
            return arr;
        }
    }
    if let Some(arr) = body
        .get("response")
        .and_then(|r| r.get("docs"))
        .and_then(Value::as_array)
    {
        return arr;
    }
    &[]
}

/// Week id for one search-API result row: the filename field first, falling
/// back to the first 8 digits of a file-date field.
#[must_use]
pub fn extract_week_id(row: &Value) -> Option<String> {
    for key in ["fileName", "filename", "name", "downloadFileName"] {
        if let Some(name) = row.get(key).and_then(Value::as_str) {
            if let Some(caps) = WEEK_FILE_RE.captures(name) {
                return Some(caps[1].to_string());
            }
        }
    }
    for key in ["fileDataToDate", "fileDataFromDate", "fileDate"] {
        if let Some(date) = row.get(key).and_then(Value::as_str) {
            let digits: String = date.chars().filter(char::is_ascii_digit).collect();
            if digits.len() >= 8 {
                return Some(digits[..8].to_string());
            }
        }
    }
    None
}

fn extract_url(row: &Value) -> Option<String> {
    for key in ["downloadUrl", "fileDownloadUrl", "url"] {
        if let Some(u) = row.get(key).and_then(Value::as_str) {
            return Some(u.to_string());
        }
    }
    None
}
