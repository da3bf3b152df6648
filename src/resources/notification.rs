use super::{text, ListRecord, Row};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationCard {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Notification {
    pub id: Option<String>,
    pub read: Option<bool>,
    pub created_at: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub card: Option<NotificationCard>,
}

impl ListRecord for Notification {
    const HEADERS: &'static [&'static str] = &["ID", "READ", "TITLE", "CARD", "CREATED"];

    fn row(&self) -> Row {
        let read = if self.read.unwrap_or(false) { "yes" } else { "no" };
        vec![
            text(&self.id),
            read.to_string(),
            text(&self.title),
            self.card.as_ref().map(|c| text(&c.title)).unwrap_or_default(),
            text(&self.created_at),
        ]
    }
}
