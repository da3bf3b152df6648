//! `Link` response header parsing
//!
//! Entries look like `<https://host/path?page=2>; rel="next"` and are separated
//! by commas. Only the target of the requested relation is extracted.

use regex::Regex;
use reqwest::header::{HeaderMap, LINK};
use std::sync::LazyLock;

/// One `<target>; params` entry. Commas inside the brackets belong to the target.
static ENTRY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<([^>]*)>([^,<]*)").unwrap());

static REL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)^\s*rel\s*=\s*"?([^"]*)"?\s*$"#).unwrap());

/// Target of the `next` relation, if the headers carry one
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(LINK)?.to_str().ok()?;
    find_relation(value, "next")
}

/// Target of the first entry whose `rel` parameter lists `relation`
pub fn find_relation(header: &str, relation: &str) -> Option<String> {
    ENTRY.captures_iter(header).find_map(|entry| {
        let target = entry.get(1)?.as_str().trim();
        let params = entry.get(2).map_or("", |m| m.as_str());
        let matches = params.split(';').any(|param| {
            REL.captures(param)
                .and_then(|caps| caps.get(1))
                .is_some_and(|rels| rels.as_str().split_whitespace().any(|r| r == relation))
        });
        (matches && !target.is_empty()).then(|| target.to_string())
    })
}
