//! `board list | get | create | update | delete`

use super::{nonblank, require, trimmed, Context};
use crate::cmd_args::{BoardCommand, BoardCreateArgs, BoardUpdateArgs};
use crate::error::{CliError, Result};
use crate::http::{Query, Request};
use crate::resources::{format_detail, Board, ResourceKind};
use serde_json::{json, Map, Value};

pub fn run(ctx: &mut Context, command: BoardCommand) -> Result<()> {
    ctx.require_session()?;
    match command {
        BoardCommand::List(page) => {
            let path = ctx.path("/boards")?;
            ctx.list(&path, Query::new(), &page, ResourceKind::Board)
        }
        BoardCommand::Get { board_id } => {
            let response = ctx.send(Request::get(ctx.path(&format!("/boards/{board_id}"))?))?;
            ctx.show(&response, format_detail::<Board>)
        }
        BoardCommand::Create(args) => create(ctx, args),
        BoardCommand::Update(args) => update(ctx, args),
        BoardCommand::Delete { board_id } => {
            let response = ctx.send(Request::delete(ctx.path(&format!("/boards/{board_id}"))?))?;
            ctx.done(&response, "Board deleted")
        }
    }
}

fn create(ctx: &mut Context, args: BoardCreateArgs) -> Result<()> {
    let name = require(args.name.as_deref(), "--name is required")?;
    let mut board = Map::new();
    board.insert("name".into(), json!(name));
    board.insert("all_access".into(), json!(!args.no_all_access));
    if let Some(days) = args.auto_postpone_days.filter(|d| *d > 0) {
        board.insert("auto_postpone_period".into(), json!(days));
    }
    if let Some(description) = nonblank(args.public_description.as_deref()) {
        board.insert("public_description".into(), json!(description));
    }

    let request = Request::post(ctx.path("/boards")?).with_json(&json!({ "board": board }));
    let response = ctx.send(request)?;
    ctx.created(&response, "Board created")
}

fn update(ctx: &mut Context, args: BoardUpdateArgs) -> Result<()> {
    let board = update_fields(&args);
    if board.is_empty() {
        return Err(CliError::usage("no fields to update"));
    }
    let path = ctx.path(&format!("/boards/{}", args.board_id))?;
    let response = ctx.send(Request::put(path).with_json(&json!({ "board": board })))?;
    ctx.done(&response, "Board updated")
}

fn update_fields(args: &BoardUpdateArgs) -> Map<String, Value> {
    let mut board = Map::new();
    if let Some(name) = trimmed(args.name.as_deref()) {
        board.insert("name".into(), json!(name));
    }
    if args.all_access {
        board.insert("all_access".into(), json!(true));
    }
    if args.no_all_access {
        board.insert("all_access".into(), json!(false));
    }
    if let Some(days) = args.auto_postpone_days.filter(|d| *d > 0) {
        board.insert("auto_postpone_period".into(), json!(days));
    }
    if let Some(description) = nonblank(args.public_description.as_deref()) {
        board.insert("public_description".into(), json!(description));
    }
    let user_ids: Vec<&str> = args
        .user_ids
        .iter()
        .map(String::as_str)
        .filter(|id| !id.is_empty())
        .collect();
    if !user_ids.is_empty() {
        board.insert("user_ids".into(), json!(user_ids));
    }
    board
}
