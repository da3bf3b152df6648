//! `comment list | get | create | update | delete`

use super::{nonblank, Context};
use crate::cmd_args::CommentCommand;
use crate::error::{CliError, Result};
use crate::http::{Query, Request};
use crate::resources::{format_detail, Comment, ResourceKind};
use serde_json::{json, Value};

pub fn run(ctx: &mut Context, command: CommentCommand) -> Result<()> {
    ctx.require_session()?;
    match command {
        CommentCommand::List { card_number, page } => {
            let path = ctx.path(&format!("/cards/{card_number}/comments"))?;
            ctx.list(&path, Query::new(), &page, ResourceKind::Comment)
        }
        CommentCommand::Get {
            card_number,
            comment_id,
        } => {
            let path = ctx.path(&format!("/cards/{card_number}/comments/{comment_id}"))?;
            let response = ctx.send(Request::get(path))?;
            ctx.show(&response, format_detail::<Comment>)
        }
        CommentCommand::Create { card_number, body } => {
            let payload = comment_body(body.as_deref())?;
            let path = ctx.path(&format!("/cards/{card_number}/comments"))?;
            let response = ctx.send(Request::post(path).with_json(&payload))?;
            ctx.created(&response, "Comment created")
        }
        CommentCommand::Update {
            card_number,
            comment_id,
            body,
        } => {
            let payload = comment_body(body.as_deref())?;
            let path = ctx.path(&format!("/cards/{card_number}/comments/{comment_id}"))?;
            let response = ctx.send(Request::put(path).with_json(&payload))?;
            ctx.echo(&response, "Comment updated")
        }
        CommentCommand::Delete {
            card_number,
            comment_id,
        } => {
            let path = ctx.path(&format!("/cards/{card_number}/comments/{comment_id}"))?;
            let response = ctx.send(Request::delete(path))?;
            ctx.done(&response, "Comment deleted")
        }
    }
}

/// The body is sent as typed, surrounding whitespace included
fn comment_body(body: Option<&str>) -> Result<Value> {
    let body = nonblank(body).ok_or_else(|| CliError::usage("--body is required"))?;
    Ok(json!({ "comment": { "body": body } }))
}
