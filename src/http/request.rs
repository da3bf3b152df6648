//! Outgoing request description
//!
//! A `Request` is built per call and handed to an [`Executor`](super::Executor)
//! by value; nothing about it changes once it has been built.

use reqwest::blocking::multipart::Form;
use reqwest::Method;
use std::collections::BTreeMap;
use std::fmt;

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Query parameters, key → values.
///
/// Keys are kept sorted so the encoded query string is stable; values for
/// one key keep the order they were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(BTreeMap<String, Vec<String>>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to `key`
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Replace all values of `key` with a single value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), vec![value.into()]);
    }

    /// Append each non-blank value, trimmed
    pub fn add_each<S: AsRef<str>>(&mut self, key: &str, values: &[S]) {
        for value in values {
            let value = value.as_ref().trim();
            if !value.is_empty() {
                self.add(key, value);
            }
        }
    }

    /// Set `key` unless `value` is blank
    pub fn set_nonblank(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.set(key, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Flattened `(key, value)` pairs in encoding order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |v| (key.as_str(), v.as_str())))
    }
}

/// Request payload
pub enum RequestBody {
    Empty,
    /// Serialized JSON document, sent as `application/json`
    Json(Vec<u8>),
    /// `multipart/form-data`; the transport picks the boundary
    Multipart(Form),
}

impl RequestBody {
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Json(_) => Some(CONTENT_TYPE_JSON),
            RequestBody::Empty | RequestBody::Multipart(_) => None,
        }
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Empty => f.write_str("Empty"),
            RequestBody::Json(bytes) => write!(f, "Json({} bytes)", bytes.len()),
            RequestBody::Multipart(_) => f.write_str("Multipart"),
        }
    }
}

#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<Query>,
    body: RequestBody,
    headers: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: RequestBody::Empty,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach query parameters. A request without a query leaves the URL's
    /// own query (if any) untouched.
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_json(mut self, value: &serde_json::Value) -> Self {
        // Serializing a `Value` cannot fail
        self.body = RequestBody::Json(value.to_string().into_bytes());
        self
    }

    pub fn with_multipart(mut self, form: Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Add an explicit header. Explicit headers win over defaults.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    pub fn into_body(self) -> RequestBody {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_should_skip_blank_values() {
        let mut query = Query::new();
        query.add_each("board_ids[]", &["b1", "  ", " b2 "]);
        query.set_nonblank("sorted_by", Some("   "));
        query.set_nonblank("indexed_by", Some(" closed "));
        query.set_nonblank("creation", None);

        assert_eq!(query.get("board_ids[]"), Some(&["b1".to_string(), "b2".to_string()][..]));
        assert_eq!(query.get("indexed_by"), Some(&["closed".to_string()][..]));
        assert!(query.get("sorted_by").is_none());
        assert!(query.get("creation").is_none());
    }

    #[test]
    fn query_pairs_should_be_sorted_by_key_and_keep_value_order() {
        let mut query = Query::new();
        query.add("terms[]", "zeta");
        query.add("terms[]", "alpha");
        query.set("indexed_by", "all");

        let pairs: Vec<_> = query.pairs().collect();
        assert_eq!(
            pairs,
            vec![("indexed_by", "all"), ("terms[]", "zeta"), ("terms[]", "alpha")]
        );
    }

    #[test]
    fn json_body_should_set_content_type() {
        let request = Request::post("/boards").with_json(&json!({"board": {"name": "Ops"}}));
        assert_eq!(request.body().content_type(), Some(CONTENT_TYPE_JSON));
        assert_eq!(request.method(), &Method::POST);
    }

    #[test]
    fn explicit_header_lookup_should_ignore_case() {
        let request = Request::post("/session/magic_link").with_header("cookie", "a=b");
        assert!(request.has_header("Cookie"));
        assert!(!request.has_header("Authorization"));
    }
}
