//! Authentication scheme selection
//!
//! The scheme is decided once per invocation from the resolved settings and
//! only controls which header the executor adds to each request.

use crate::error::{CliError, Result};
use crate::http::Request;

pub const AUTHORIZATION: &str = "Authorization";
pub const COOKIE: &str = "Cookie";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    Unauthenticated,
    /// Personal access token, sent as `Authorization: Bearer <token>`
    BearerToken(String),
    /// Session from the magic-link flow, sent as `Cookie: session_token=<token>`
    SessionCookie(String),
}

impl AuthScheme {
    /// A bearer token always wins over a session token.
    pub fn resolve(token: Option<&str>, session_token: Option<&str>) -> Self {
        let nonblank = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(String::from);
        match (nonblank(token), nonblank(session_token)) {
            (Some(token), _) => AuthScheme::BearerToken(token),
            (None, Some(session)) => AuthScheme::SessionCookie(session),
            (None, None) => AuthScheme::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, AuthScheme::Unauthenticated)
    }

    /// Fail before any network call when credentials are required but missing
    pub fn require(&self) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(CliError::usage(
                "missing credentials; set --token or FIZZY_TOKEN, or run 'fizzy-cli auth login'",
            ))
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            AuthScheme::Unauthenticated => "no credentials",
            AuthScheme::BearerToken(_) => "personal access token",
            AuthScheme::SessionCookie(_) => "session token",
        }
    }

    /// Default auth header for `request`. An explicit `Cookie` on the
    /// request suppresses the session cookie.
    pub fn header(&self, request: &Request) -> Option<(&'static str, String)> {
        match self {
            AuthScheme::Unauthenticated => None,
            AuthScheme::BearerToken(token) => Some((AUTHORIZATION, format!("Bearer {token}"))),
            AuthScheme::SessionCookie(session) => (!request.has_header(COOKIE))
                .then(|| (COOKIE, format!("session_token={session}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_should_win_over_session() {
        let scheme = AuthScheme::resolve(Some("tok"), Some("sess"));
        assert_eq!(scheme, AuthScheme::BearerToken("tok".to_string()));
        assert_eq!(
            scheme.header(&Request::get("/my/identity")),
            Some((AUTHORIZATION, "Bearer tok".to_string()))
        );
    }

    #[test]
    fn session_cookie_should_be_used_without_token() {
        let scheme = AuthScheme::resolve(Some("  "), Some("sess"));
        assert_eq!(scheme, AuthScheme::SessionCookie("sess".to_string()));
        assert_eq!(
            scheme.header(&Request::get("/my/identity")),
            Some((COOKIE, "session_token=sess".to_string()))
        );
    }

    #[test]
    fn explicit_cookie_should_suppress_session_cookie() {
        let scheme = AuthScheme::SessionCookie("sess".to_string());
        let request = Request::post("/session/magic_link")
            .with_header("cookie", "pending_authentication_token=p");
        assert_eq!(scheme.header(&request), None);
    }

    #[test]
    fn unauthenticated_should_fail_require_with_usage_error() {
        let scheme = AuthScheme::resolve(None, None);
        assert!(!scheme.is_authenticated());
        let err = scheme.require().unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("missing credentials"));
    }
}
