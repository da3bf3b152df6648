use super::{flag, name_of, text, DetailRecord, ListRecord, Named, Row};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Board {
    pub id: Option<String>,
    pub name: Option<String>,
    pub all_access: Option<bool>,
    pub created_at: Option<String>,
    pub creator: Option<Named>,
    pub url: Option<String>,
}

impl ListRecord for Board {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "ALL_ACCESS", "CREATED"];

    fn row(&self) -> Row {
        vec![
            text(&self.id),
            text(&self.name),
            flag(self.all_access),
            text(&self.created_at),
        ]
    }
}

impl DetailRecord for Board {
    fn detail(&self) -> String {
        format!(
            "ID: {}\nName: {}\nAll access: {}\nCreated: {}\nCreator: {}\nURL: {}",
            text(&self.id),
            text(&self.name),
            flag(self.all_access),
            text(&self.created_at),
            name_of(&self.creator),
            text(&self.url),
        )
    }
}
