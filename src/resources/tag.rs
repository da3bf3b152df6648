use super::{text, ListRecord, Row};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tag {
    pub id: Option<String>,
    pub title: Option<String>,
}

impl ListRecord for Tag {
    const HEADERS: &'static [&'static str] = &["ID", "TITLE"];

    fn row(&self) -> Row {
        vec![text(&self.id), text(&self.title)]
    }
}
