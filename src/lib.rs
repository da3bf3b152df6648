//! # fizzy-cli - command-line client for the Fizzy kanban API
//!
//! Every invocation runs one verb and exits:
//!
//! ```text
//! cmd_args ──► config::Settings ──► commands ──► http::HttpClient ──► API
//!                                      │                 ▲
//!                                      ▼                 │ next page
//!                               pagination::Walker ──────┘
//!                                      │
//!                                      ▼
//!                         resources (rows) ──► output (table / JSON)
//! ```
//!
//! List verbs fetch one page, or follow `Link: rel="next"` cursors with
//! `--all`. Table output streams page by page; JSON output is buffered and
//! printed as one array.

pub mod auth;
pub mod cmd_args;
pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod output;
pub mod pagination;
pub mod resources;

pub use error::{CliError, Result};
