use super::{text, DetailRecord, ListRecord, Row};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    pub id: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub email_address: Option<String>,
}

impl ListRecord for User {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "ROLE", "EMAIL"];

    fn row(&self) -> Row {
        vec![
            text(&self.id),
            text(&self.name),
            text(&self.role),
            text(&self.email_address),
        ]
    }
}

impl DetailRecord for User {
    fn detail(&self) -> String {
        format!(
            "ID: {}\nName: {}\nRole: {}\nEmail: {}",
            text(&self.id),
            text(&self.name),
            text(&self.role),
            text(&self.email_address),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::format_detail;

    #[test]
    fn user_detail_should_use_email_address_field() {
        let text = format_detail::<User>(
            br#"{"id":"u1","name":"Kim","role":"admin","email_address":"kim@example.com"}"#,
        )
        .unwrap();
        assert_eq!(text, "ID: u1\nName: Kim\nRole: admin\nEmail: kim@example.com");
    }
}
