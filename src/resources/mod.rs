//! # Resource records
//!
//! Read-only projections of the API's JSON documents. Each record turns into
//! a fixed-width table row for list views, and some into a text block for
//! single-entity views.
//!
//! Every field is optional. Absent strings render as an empty column, absent
//! numbers as `0` and absent flags as `false`, so partially populated
//! documents never fail to render.

mod account;
mod board;
mod card;
mod column;
mod comment;
mod notification;
mod tag;
mod user;

pub use account::{Account, Identity};
pub use board::Board;
pub use card::{Card, Step};
pub use column::Column;
pub use comment::Comment;
pub use notification::Notification;
pub use tag::Tag;
pub use user::User;

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// One rendered table row
pub type Row = Vec<String>;

/// A record that appears in list views
pub trait ListRecord: DeserializeOwned {
    const HEADERS: &'static [&'static str];

    fn row(&self) -> Row;
}

/// A record with a single-entity text view
pub trait DetailRecord: DeserializeOwned {
    fn detail(&self) -> String;
}

/// Nested object only shown by its display name
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Named {
    pub name: Option<String>,
}

/// Decode a JSON array of `T` into table rows
pub fn decode_rows<T: ListRecord>(body: &[u8]) -> Result<Vec<Row>> {
    let records: Vec<T> = serde_json::from_slice(body)?;
    Ok(records.iter().map(T::row).collect())
}

/// Decode a single `T` into its text view
pub fn format_detail<T: DetailRecord>(body: &[u8]) -> Result<String> {
    let record: T = serde_json::from_slice(body)?;
    Ok(record.detail())
}

pub(crate) fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

pub(crate) fn name_of(value: &Option<Named>) -> String {
    value.as_ref().map(|n| text(&n.name)).unwrap_or_default()
}

pub(crate) fn flag(value: Option<bool>) -> String {
    value.unwrap_or(false).to_string()
}

pub type RowsFn = fn(&[u8]) -> Result<Vec<Row>>;
pub type DetailFn = fn(&[u8]) -> Result<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Board,
    Card,
    Comment,
    Tag,
    Column,
    User,
    Notification,
    Account,
}

/// Headers and row decoder for one resource kind
pub struct ResourceView {
    pub kind: ResourceKind,
    pub headers: &'static [&'static str],
    pub rows: RowsFn,
}

static VIEWS: [ResourceView; 8] = [
    ResourceView {
        kind: ResourceKind::Board,
        headers: Board::HEADERS,
        rows: decode_rows::<Board>,
    },
    ResourceView {
        kind: ResourceKind::Card,
        headers: Card::HEADERS,
        rows: decode_rows::<Card>,
    },
    ResourceView {
        kind: ResourceKind::Comment,
        headers: Comment::HEADERS,
        rows: decode_rows::<Comment>,
    },
    ResourceView {
        kind: ResourceKind::Tag,
        headers: Tag::HEADERS,
        rows: decode_rows::<Tag>,
    },
    ResourceView {
        kind: ResourceKind::Column,
        headers: Column::HEADERS,
        rows: decode_rows::<Column>,
    },
    ResourceView {
        kind: ResourceKind::User,
        headers: User::HEADERS,
        rows: decode_rows::<User>,
    },
    ResourceView {
        kind: ResourceKind::Notification,
        headers: Notification::HEADERS,
        rows: decode_rows::<Notification>,
    },
    ResourceView {
        kind: ResourceKind::Account,
        headers: Account::HEADERS,
        rows: account::identity_rows,
    },
];

impl ResourceKind {
    pub fn view(self) -> &'static ResourceView {
        &VIEWS[self as usize]
    }
}

impl ResourceView {
    pub fn decode_rows(&self, body: &[u8]) -> Result<Vec<Row>> {
        (self.rows)(body)
    }
}
