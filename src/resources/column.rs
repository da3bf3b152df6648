use super::{text, DetailRecord, ListRecord, Row};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Column {
    pub id: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub created_at: Option<String>,
}

impl ListRecord for Column {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "COLOR"];

    fn row(&self) -> Row {
        vec![text(&self.id), text(&self.name), text(&self.color)]
    }
}

impl DetailRecord for Column {
    fn detail(&self) -> String {
        format!(
            "ID: {}\nName: {}\nColor: {}\nCreated: {}",
            text(&self.id),
            text(&self.name),
            text(&self.color),
            text(&self.created_at),
        )
    }
}
