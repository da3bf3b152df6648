//! `user list | get | update | deactivate`

use super::{file_arg, multipart_form, trimmed, Context};
use crate::cmd_args::UserCommand;
use crate::error::{CliError, Result};
use crate::http::{Query, Request};
use crate::resources::{format_detail, ResourceKind, User};
use serde_json::json;
use std::path::Path;

pub fn run(ctx: &mut Context, command: UserCommand) -> Result<()> {
    ctx.require_session()?;
    match command {
        UserCommand::List(page) => {
            let path = ctx.path("/users")?;
            ctx.list(&path, Query::new(), &page, ResourceKind::User)
        }
        UserCommand::Get { user_id } => {
            let response = ctx.send(Request::get(ctx.path(&format!("/users/{user_id}"))?))?;
            ctx.show(&response, format_detail::<User>)
        }
        UserCommand::Update {
            user_id,
            name,
            avatar,
        } => update(ctx, &user_id, trimmed(name.as_deref()), file_arg(avatar.as_deref())),
        UserCommand::Deactivate { user_id } => {
            let response = ctx.send(Request::delete(ctx.path(&format!("/users/{user_id}"))?))?;
            ctx.done(&response, "User deactivated")
        }
    }
}

fn update(ctx: &mut Context, user_id: &str, name: Option<&str>, avatar: Option<&Path>) -> Result<()> {
    let request = Request::put(ctx.path(&format!("/users/{user_id}"))?);
    let request = match (name, avatar) {
        (None, None) => return Err(CliError::usage("--name or --avatar is required")),
        (name, Some(avatar)) => {
            let names: Vec<String> = name.map(String::from).into_iter().collect();
            request.with_multipart(multipart_form("user", &[("name", names)], "avatar", avatar)?)
        }
        (Some(name), None) => request.with_json(&json!({ "user": { "name": name } })),
    };
    let response = ctx.send(request)?;
    ctx.done(&response, "User updated")
}
