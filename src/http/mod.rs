//! Request executor and wire types

pub mod client;
pub mod link;
pub mod request;
pub mod response;

pub use client::{Executor, HttpClient};
pub use request::{Query, Request, RequestBody};
pub use response::{ApiError, Response};
