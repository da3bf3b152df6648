//! # HTTP Client
//!
//! Executes a single request against the configured base URL and turns
//! every status >= 400 into an [`ApiError`].

use super::request::{Query, Request, RequestBody};
use super::response::{ApiError, Response};
use crate::auth::AuthScheme;
use crate::error::{CliError, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can send a [`Request`] and hand back a [`Response`]
pub trait Executor {
    fn execute(&self, request: Request) -> Result<Response>;
}

/// Blocking reqwest-backed executor
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    auth: AuthScheme,
}

impl HttpClient {
    pub fn new(base_url: &str, auth: AuthScheme) -> Result<Self> {
        tracing::debug!("Creating HttpClient for {base_url} ({})", auth.describe());
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent())
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(base_url.trim_end_matches('/'))?,
            auth,
        })
    }

    /// Resolve `path` against the base URL. Absolute URLs (pagination
    /// cursors) are used as they are; a supplied query replaces theirs.
    pub fn build_url(&self, path: &str, query: Option<&Query>) -> Result<Url> {
        let mut url = if path.starts_with("http://") || path.starts_with("https://") {
            Url::parse(path)?
        } else {
            self.base_url.join(path)?
        };

        if let Some(query) = query {
            if query.is_empty() {
                url.set_query(None);
            } else {
                url.query_pairs_mut().clear().extend_pairs(query.pairs());
            }
        }
        Ok(url)
    }

    /// Headers for `request`: defaults first, explicit headers last so they win
    pub fn build_headers(&self, request: &Request) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some((name, value)) = self.auth.header(request) {
            insert_header(&mut headers, name, &value)?;
        }
        if let Some(content_type) = request.body().content_type() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        for (name, value) in request.headers() {
            insert_header(&mut headers, name, value)?;
        }
        Ok(headers)
    }
}

impl Executor for HttpClient {
    #[tracing::instrument(level = "debug", skip_all, fields(method = %request.method(), path = request.path()))]
    fn execute(&self, request: Request) -> Result<Response> {
        let url = self.build_url(request.path(), request.query())?;
        let headers = self.build_headers(&request)?;
        let method = request.method().clone();
        tracing::debug!("Sending {method} {url}");

        let builder = self.client.request(method, url).headers(headers);
        let builder = match request.into_body() {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder.body(bytes),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        let response = builder.send()?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes()?;
        tracing::debug!("Received status {status} with {} bytes", body.len());

        if status >= 400 {
            return Err(ApiError::new(status, body).into());
        }
        Ok(Response::new(status, headers, body))
    }
}

pub fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<()> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| CliError::InvalidHeader(name.to_string()))?;
    let value =
        HeaderValue::from_str(value).map_err(|_| CliError::InvalidHeader(name.to_string()))?;
    headers.insert(name, value);
    Ok(())
}
