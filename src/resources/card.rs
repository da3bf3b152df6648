use super::{name_of, text, DetailRecord, ListRecord, Named, Row};
use serde::Deserialize;
use std::fmt::Write;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Step {
    pub id: Option<String>,
    pub content: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Card {
    pub id: Option<String>,
    pub number: Option<i64>,
    pub title: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub golden: Option<bool>,
    pub last_active_at: Option<String>,
    pub created_at: Option<String>,
    pub board: Option<Named>,
    pub creator: Option<Named>,
    pub steps: Option<Vec<Step>>,
}

impl Card {
    fn number(&self) -> String {
        self.number.unwrap_or(0).to_string()
    }
}

impl ListRecord for Card {
    const HEADERS: &'static [&'static str] = &["#", "TITLE", "STATUS", "BOARD", "LAST_ACTIVE"];

    fn row(&self) -> Row {
        vec![
            self.number(),
            text(&self.title),
            text(&self.status),
            name_of(&self.board),
            text(&self.last_active_at),
        ]
    }
}

impl DetailRecord for Card {
    fn detail(&self) -> String {
        // Writing into a String cannot fail
        let mut out = String::new();
        let _ = writeln!(out, "ID: {}", text(&self.id));
        let _ = writeln!(out, "Number: {}", self.number());
        let _ = writeln!(out, "Title: {}", text(&self.title));
        let _ = writeln!(out, "Status: {}", text(&self.status));
        let _ = writeln!(out, "Board: {}", name_of(&self.board));
        let _ = writeln!(out, "Creator: {}", name_of(&self.creator));

        let tags = self.tags.as_deref().unwrap_or_default();
        if !tags.is_empty() {
            let _ = writeln!(out, "Tags: {}", tags.join(", "));
        }
        if self.golden.unwrap_or(false) {
            let _ = writeln!(out, "Golden: true");
        }
        if let Some(last_active) = self.last_active_at.as_deref().filter(|v| !v.is_empty()) {
            let _ = writeln!(out, "Last active: {last_active}");
        }
        if let Some(created) = self.created_at.as_deref().filter(|v| !v.is_empty()) {
            let _ = writeln!(out, "Created: {created}");
        }
        if let Some(description) = self.description.as_deref().filter(|v| !v.is_empty()) {
            let _ = writeln!(out, "\nDescription:\n{description}");
        }

        let steps = self.steps.as_deref().unwrap_or_default();
        if !steps.is_empty() {
            let _ = writeln!(out, "\nSteps:");
            for step in steps {
                let mark = if step.completed.unwrap_or(false) { "x" } else { " " };
                let _ = writeln!(out, "- [{mark}] {}", text(&step.content));
            }
        }
        out.trim().to_string()
    }
}
