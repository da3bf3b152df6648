use super::{name_of, text, DetailRecord, ListRecord, Named, Row};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentBody {
    pub plain_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Comment {
    pub id: Option<String>,
    pub created_at: Option<String>,
    pub body: Option<CommentBody>,
    pub creator: Option<Named>,
}

impl Comment {
    fn plain_text(&self) -> String {
        self.body
            .as_ref()
            .map(|b| text(&b.plain_text))
            .unwrap_or_default()
    }
}

impl ListRecord for Comment {
    const HEADERS: &'static [&'static str] = &["ID", "CREATOR", "BODY", "CREATED"];

    fn row(&self) -> Row {
        vec![
            text(&self.id),
            name_of(&self.creator),
            self.plain_text(),
            text(&self.created_at),
        ]
    }
}

impl DetailRecord for Comment {
    fn detail(&self) -> String {
        format!(
            "ID: {}\nCreator: {}\nCreated: {}\nBody: {}",
            text(&self.id),
            name_of(&self.creator),
            text(&self.created_at),
            self.plain_text(),
        )
    }
}
