//! `column list | get | create | update | delete`, always scoped to a board

use super::{trimmed, Context};
use crate::cmd_args::{BoardScope, ColumnCommand};
use crate::error::{CliError, Result};
use crate::http::{Query, Request};
use crate::resources::{format_detail, Column, ResourceKind};
use serde_json::{json, Map, Value};

pub fn run(ctx: &mut Context, command: ColumnCommand) -> Result<()> {
    ctx.require_session()?;
    match command {
        ColumnCommand::List { board, page } => {
            let path = columns_path(ctx, &board, None)?;
            ctx.list(&path, Query::new(), &page, ResourceKind::Column)
        }
        ColumnCommand::Get { column_id, board } => {
            let path = columns_path(ctx, &board, Some(&column_id))?;
            let response = ctx.send(Request::get(path))?;
            ctx.show(&response, format_detail::<Column>)
        }
        ColumnCommand::Create { board, name, color } => {
            let (Some(_), Some(name)) = (trimmed(board.board_id.as_deref()), trimmed(name.as_deref()))
            else {
                return Err(CliError::usage("--board-id and --name are required"));
            };
            let mut column = Map::new();
            column.insert("name".into(), json!(name));
            if let Some(color) = trimmed(color.as_deref()) {
                column.insert("color".into(), json!(color));
            }
            let path = columns_path(ctx, &board, None)?;
            let response = ctx.send(Request::post(path).with_json(&json!({ "column": column })))?;
            ctx.created(&response, "Column created")
        }
        ColumnCommand::Update {
            column_id,
            board,
            name,
            color,
        } => {
            let path = columns_path(ctx, &board, Some(&column_id))?;
            let column = update_fields(name.as_deref(), color.as_deref());
            if column.is_empty() {
                return Err(CliError::usage("no fields to update"));
            }
            let response = ctx.send(Request::put(path).with_json(&json!({ "column": column })))?;
            ctx.done(&response, "Column updated")
        }
        ColumnCommand::Delete { column_id, board } => {
            let path = columns_path(ctx, &board, Some(&column_id))?;
            let response = ctx.send(Request::delete(path))?;
            ctx.done(&response, "Column deleted")
        }
    }
}

/// `/boards/<board>/columns[/<column>]` under the account
fn columns_path(ctx: &Context, board: &BoardScope, column_id: Option<&str>) -> Result<String> {
    let board_id = trimmed(board.board_id.as_deref())
        .ok_or_else(|| CliError::usage("--board-id is required"))?;
    let suffix = match column_id {
        Some(column_id) => format!("/boards/{board_id}/columns/{column_id}"),
        None => format!("/boards/{board_id}/columns"),
    };
    ctx.path(&suffix)
}

fn update_fields(name: Option<&str>, color: Option<&str>) -> Map<String, Value> {
    let mut column = Map::new();
    if let Some(name) = trimmed(name) {
        column.insert("name".into(), json!(name));
    }
    if let Some(color) = trimmed(color) {
        column.insert("color".into(), json!(color));
    }
    column
}
