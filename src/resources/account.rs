use super::{name_of, text, ListRecord, Named, Row};
use crate::error::Result;
use serde::Deserialize;

/// Response of `GET /my/identity`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Identity {
    pub accounts: Option<Vec<Account>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Account {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub user: Option<Named>,
}

impl ListRecord for Account {
    const HEADERS: &'static [&'static str] = &["SLUG", "NAME", "USER"];

    fn row(&self) -> Row {
        let slug = text(&self.slug);
        vec![
            slug.strip_prefix('/').unwrap_or(&slug).to_string(),
            text(&self.name),
            name_of(&self.user),
        ]
    }
}

/// Accounts are nested inside the identity object rather than listed directly
pub fn identity_rows(body: &[u8]) -> Result<Vec<Row>> {
    let identity: Identity = serde_json::from_slice(body)?;
    Ok(identity.accounts.iter().flatten().map(Account::row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_rows_should_strip_leading_slash() {
        let body = br#"{"accounts":[
            {"slug":"/897362094","name":"37signals","user":{"name":"Kim"}},
            {"slug":"123","name":"Side project"}
        ]}"#;
        let rows = identity_rows(body).unwrap();
        assert_eq!(rows[0], vec!["897362094", "37signals", "Kim"]);
        assert_eq!(rows[1], vec!["123", "Side project", ""]);
    }

    #[test]
    fn identity_without_accounts_should_have_no_rows() {
        assert!(identity_rows(b"{}").unwrap().is_empty());
    }
}
