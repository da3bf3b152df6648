//! `card` listing, CRUD and workflow actions

use super::{file_arg, multipart_form, nonblank, require, trimmed, Context};
use crate::cmd_args::{CardCommand, CardCreateArgs, CardFields, CardListArgs, CardUpdateArgs};
use crate::error::{CliError, Result};
use crate::http::{Query, Request};
use crate::resources::{format_detail, Card, ResourceKind};
use reqwest::blocking::multipart::Form;
use reqwest::Method;
use serde_json::{json, Map, Value};
use std::path::Path;

pub fn run(ctx: &mut Context, command: CardCommand) -> Result<()> {
    ctx.require_session()?;
    match command {
        CardCommand::List(args) => {
            let path = ctx.path("/cards")?;
            ctx.list(&path, list_query(&args), &args.page, ResourceKind::Card)
        }
        CardCommand::Get { number } => {
            let response = ctx.send(Request::get(ctx.path(&format!("/cards/{number}"))?))?;
            ctx.show(&response, format_detail::<Card>)
        }
        CardCommand::Create(args) => create(ctx, args),
        CardCommand::Update(args) => update(ctx, args),
        CardCommand::Delete { number } => {
            let response = ctx.send(Request::delete(ctx.path(&format!("/cards/{number}"))?))?;
            ctx.done(&response, "Card deleted")
        }
        CardCommand::Close { number } => action(ctx, &number, Method::POST, "/closure", "Card closed"),
        CardCommand::Reopen { number } => {
            action(ctx, &number, Method::DELETE, "/closure", "Card reopened")
        }
        CardCommand::NotNow { number } => {
            action(ctx, &number, Method::POST, "/not_now", "Card moved to Not Now")
        }
        CardCommand::Triage { number, column_id } => {
            let column_id = require(column_id.as_deref(), "--column-id is required")?;
            let body = json!({ "column_id": column_id });
            action_with_body(ctx, &number, "/triage", &body, "Card moved into column")
        }
        CardCommand::Untriage { number } => {
            action(ctx, &number, Method::DELETE, "/triage", "Card moved back to triage")
        }
        CardCommand::Tag { number, title } => {
            let title = require(title.as_deref(), "--title is required")?;
            let body = json!({ "tag_title": title.strip_prefix('#').unwrap_or(title) });
            action_with_body(ctx, &number, "/taggings", &body, "Tag toggled")
        }
        CardCommand::Assign { number, assignee_id } => {
            let assignee_id = require(assignee_id.as_deref(), "--assignee-id is required")?;
            let body = json!({ "assignee_id": assignee_id });
            action_with_body(ctx, &number, "/assignments", &body, "Assignment toggled")
        }
        CardCommand::Watch { number } => {
            action(ctx, &number, Method::POST, "/watch", "Subscribed to card")
        }
        CardCommand::Unwatch { number } => {
            action(ctx, &number, Method::DELETE, "/watch", "Unsubscribed from card")
        }
    }
}

/// Repeatable filters go out as `key[]`, scalar filters only when non-blank
fn list_query(args: &CardListArgs) -> Query {
    let mut query = Query::new();
    query.add_each("board_ids[]", &args.board_ids);
    query.add_each("tag_ids[]", &args.tag_ids);
    query.add_each("assignee_ids[]", &args.assignee_ids);
    query.add_each("creator_ids[]", &args.creator_ids);
    query.add_each("closer_ids[]", &args.closer_ids);
    query.add_each("card_ids[]", &args.card_ids);
    query.add_each("terms[]", &args.terms);
    query.set_nonblank("indexed_by", args.indexed_by.as_deref());
    query.set_nonblank("sorted_by", args.sorted_by.as_deref());
    query.set_nonblank("assignment_status", args.assignment_status.as_deref());
    query.set_nonblank("creation", args.creation.as_deref());
    query.set_nonblank("closure", args.closure.as_deref());
    query
}

/// Card attributes that were actually given
#[derive(Debug, Default, PartialEq)]
struct CardPayload {
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    tag_ids: Vec<String>,
}

impl CardPayload {
    fn from_fields(fields: &CardFields) -> Self {
        Self {
            title: trimmed(fields.title.as_deref()).map(String::from),
            description: nonblank(fields.description.as_deref()).map(String::from),
            status: nonblank(fields.status.as_deref()).map(String::from),
            tag_ids: fields
                .tag_ids
                .iter()
                .filter(|id| !id.is_empty())
                .cloned()
                .collect(),
        }
    }

    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.tag_ids.is_empty()
    }

    fn to_json(&self) -> Value {
        let mut card = Map::new();
        if let Some(title) = &self.title {
            card.insert("title".into(), json!(title));
        }
        if let Some(description) = &self.description {
            card.insert("description".into(), json!(description));
        }
        if let Some(status) = &self.status {
            card.insert("status".into(), json!(status));
        }
        if !self.tag_ids.is_empty() {
            card.insert("tag_ids".into(), json!(self.tag_ids));
        }
        json!({ "card": card })
    }

    fn to_multipart(&self, image: &Path) -> Result<Form> {
        let fields: [(&str, Vec<String>); 4] = [
            ("title", self.title.iter().cloned().collect()),
            ("description", self.description.iter().cloned().collect()),
            ("status", self.status.iter().cloned().collect()),
            ("tag_ids[]", self.tag_ids.clone()),
        ];
        multipart_form("card", &fields, "image", image)
    }

    /// JSON body, or a multipart form when an image is attached
    fn into_request(self, request: Request, image: Option<&Path>) -> Result<Request> {
        Ok(match image {
            Some(image) => request.with_multipart(self.to_multipart(image)?),
            None => request.with_json(&self.to_json()),
        })
    }
}

fn create(ctx: &mut Context, args: CardCreateArgs) -> Result<()> {
    let (board_id, title) = match (
        trimmed(args.board_id.as_deref()),
        trimmed(args.fields.title.as_deref()),
    ) {
        (Some(board_id), Some(title)) => (board_id, title),
        _ => return Err(CliError::usage("--board-id and --title are required")),
    };
    tracing::debug!("Creating card {title:?} on board {board_id}");

    let payload = CardPayload::from_fields(&args.fields);
    let path = ctx.path(&format!("/boards/{board_id}/cards"))?;
    let request = payload.into_request(Request::post(path), file_arg(args.fields.image.as_deref()))?;
    let response = ctx.send(request)?;
    ctx.created(&response, "Card created")
}

fn update(ctx: &mut Context, args: CardUpdateArgs) -> Result<()> {
    let payload = CardPayload::from_fields(&args.fields);
    let image = file_arg(args.fields.image.as_deref());
    if image.is_none() && payload.is_empty() {
        return Err(CliError::usage("no fields to update"));
    }

    let path = ctx.path(&format!("/cards/{}", args.number))?;
    let response = ctx.send(payload.into_request(Request::put(path), image)?)?;
    ctx.echo(&response, "Card updated")
}

fn action(ctx: &mut Context, number: &str, method: Method, suffix: &str, message: &str) -> Result<()> {
    let path = ctx.path(&format!("/cards/{number}{suffix}"))?;
    let response = ctx.send(Request::new(method, path))?;
    ctx.done(&response, message)
}

fn action_with_body(
    ctx: &mut Context,
    number: &str,
    suffix: &str,
    body: &Value,
    message: &str,
) -> Result<()> {
    let path = ctx.path(&format!("/cards/{number}{suffix}"))?;
    let response = ctx.send(Request::post(path).with_json(body))?;
    ctx.done(&response, message)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;
    use crate::cmd_args::PageArgs;
    use crate::pagination::testing::{Scripted, ScriptedExecutor};

    fn pairs(query: &Query) -> Vec<(String, String)> {
        query.pairs().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn fields(title: Option<&str>) -> CardFields {
        CardFields {
            title: title.map(String::from),
            ..CardFields::default()
        }
    }

    #[test]
    fn list_query_should_encode_repeatable_and_scalar_filters() {
        let args = CardListArgs {
            board_ids: vec!["b1".to_string(), " ".to_string()],
            terms: vec![" dark mode ".to_string()],
            sorted_by: Some("newest".to_string()),
            closure: Some("  ".to_string()),
            ..CardListArgs::default()
        };
        assert_eq!(
            pairs(&list_query(&args)),
            vec![
                ("board_ids[]".to_string(), "b1".to_string()),
                ("sorted_by".to_string(), "newest".to_string()),
                ("terms[]".to_string(), "dark mode".to_string()),
            ]
        );
    }

    #[test]
    fn list_should_stream_all_pages() {
        let harness = Harness::new().plain();
        let executor = ScriptedExecutor::new(vec![
            Scripted::page_with_next(
                r#"[{"number":1,"title":"Fix bug","status":"published"}]"#,
                "https://app.fizzy.do/897362094/cards?page=2",
            ),
            Scripted::page(r#"[{"number":2,"title":"Add feature","status":"drafted"}]"#),
        ]);
        let args = CardListArgs {
            board_ids: vec!["b1".to_string()],
            page: PageArgs { all: true },
            ..CardListArgs::default()
        };
        let (result, out) = harness.run(&executor, |ctx| run(ctx, CardCommand::List(args)));
        result.unwrap();
        assert_eq!(out, "1\tFix bug\tpublished\t\t\n2\tAdd feature\tdrafted\t\t\n");

        let seen = executor.seen();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].path, "/897362094/cards");
        assert_eq!(seen[1].path, "https://app.fizzy.do/897362094/cards?page=2");
        assert_eq!(seen[1].query, None);
    }

    #[test]
    fn create_should_post_json_to_board() {
        let harness = Harness::new();
        let executor = ScriptedExecutor::new(vec![Scripted::created("/897362094/cards/7")]);
        let args = CardCreateArgs {
            board_id: Some("b1".to_string()),
            fields: CardFields {
                title: Some(" Hello ".to_string()),
                description: Some(" keep spacing ".to_string()),
                tag_ids: vec!["t1".to_string()],
                ..CardFields::default()
            },
        };
        let (result, out) = harness.run(&executor, |ctx| create(ctx, args));
        result.unwrap();
        assert_eq!(out, "Card created: /897362094/cards/7\n");

        let seen = executor.seen();
        assert_eq!(seen[0].path, "/897362094/boards/b1/cards");
        let body: Value = serde_json::from_str(seen[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"card": {"title": "Hello", "description": " keep spacing ", "tag_ids": ["t1"]}})
        );
    }

    #[test]
    fn create_with_image_should_send_multipart() {
        let harness = Harness::new();
        let image = harness.dir.path().join("shot.png");
        std::fs::write(&image, b"\x89PNG").unwrap();
        let executor = ScriptedExecutor::new(vec![Scripted::created("/897362094/cards/8")]);
        let args = CardCreateArgs {
            board_id: Some("b1".to_string()),
            fields: CardFields {
                title: Some("Shot".to_string()),
                image: Some(image),
                ..CardFields::default()
            },
        };
        let (result, _) = harness.run(&executor, |ctx| create(ctx, args));
        result.unwrap();
        assert_eq!(executor.seen()[0].body.as_deref(), Some("<multipart>"));
    }

    #[test]
    fn create_without_title_should_be_usage_error() {
        let harness = Harness::new();
        let executor = ScriptedExecutor::default();
        let args = CardCreateArgs {
            board_id: Some("b1".to_string()),
            fields: fields(Some(" ")),
        };
        let (result, _) = harness.run(&executor, |ctx| create(ctx, args));
        assert_eq!(
            result.unwrap_err().to_string(),
            "--board-id and --title are required"
        );
        assert!(executor.seen().is_empty());
    }

    #[test]
    fn update_in_json_mode_should_echo_body() {
        let harness = Harness::new().json();
        let executor = ScriptedExecutor::new(vec![Scripted::page(r#"{"number":3,"title":"New"}"#)]);
        let args = CardUpdateArgs {
            number: "3".to_string(),
            fields: fields(Some("New")),
        };
        let (result, out) = harness.run(&executor, |ctx| update(ctx, args));
        result.unwrap();
        assert_eq!(out, "{\n  \"number\": 3,\n  \"title\": \"New\"\n}\n");
        assert_eq!(executor.seen()[0].method, "PUT");
        assert_eq!(executor.seen()[0].path, "/897362094/cards/3");
    }

    #[test]
    fn update_without_fields_should_be_usage_error() {
        let harness = Harness::new();
        let executor = ScriptedExecutor::default();
        let args = CardUpdateArgs {
            number: "3".to_string(),
            fields: CardFields::default(),
        };
        let (result, _) = harness.run(&executor, |ctx| update(ctx, args));
        assert_eq!(result.unwrap_err().to_string(), "no fields to update");
    }

    #[test]
    fn actions_should_hit_card_subresources() {
        let cases: Vec<(CardCommand, &str, &str, &str)> = vec![
            (CardCommand::Close { number: "5".into() }, "POST", "/897362094/cards/5/closure", "Card closed.\n"),
            (CardCommand::Reopen { number: "5".into() }, "DELETE", "/897362094/cards/5/closure", "Card reopened.\n"),
            (CardCommand::NotNow { number: "5".into() }, "POST", "/897362094/cards/5/not_now", "Card moved to Not Now.\n"),
            (CardCommand::Untriage { number: "5".into() }, "DELETE", "/897362094/cards/5/triage", "Card moved back to triage.\n"),
            (CardCommand::Watch { number: "5".into() }, "POST", "/897362094/cards/5/watch", "Subscribed to card.\n"),
            (CardCommand::Unwatch { number: "5".into() }, "DELETE", "/897362094/cards/5/watch", "Unsubscribed from card.\n"),
        ];
        for (command, method, path, expected) in cases {
            let harness = Harness::new();
            let executor = ScriptedExecutor::new(vec![Scripted::no_content()]);
            let (result, out) = harness.run(&executor, |ctx| run(ctx, command));
            result.unwrap();
            assert_eq!(out, expected);
            assert_eq!(executor.seen()[0].method, method);
            assert_eq!(executor.seen()[0].path, path);
        }
    }

    #[test]
    fn tag_should_strip_hash_prefix() {
        let harness = Harness::new();
        let executor = ScriptedExecutor::new(vec![Scripted::no_content()]);
        let command = CardCommand::Tag {
            number: "5".to_string(),
            title: Some(" #bug ".to_string()),
        };
        let (result, out) = harness.run(&executor, |ctx| run(ctx, command));
        result.unwrap();
        assert_eq!(out, "Tag toggled.\n");
        let seen = executor.seen();
        assert_eq!(seen[0].path, "/897362094/cards/5/taggings");
        assert_eq!(seen[0].body.as_deref(), Some(r#"{"tag_title":"bug"}"#));
    }

    #[test]
    fn triage_should_require_column() {
        let harness = Harness::new();
        let executor = ScriptedExecutor::default();
        let command = CardCommand::Triage {
            number: "5".to_string(),
            column_id: None,
        };
        let (result, _) = harness.run(&executor, |ctx| run(ctx, command));
        assert_eq!(result.unwrap_err().to_string(), "--column-id is required");
        assert!(executor.seen().is_empty());
    }

    #[test]
    fn missing_card_should_surface_api_error() {
        let harness = Harness::new();
        let executor = ScriptedExecutor::new(vec![Scripted::Fail {
            status: 404,
            body: r#"{"error":"not found"}"#,
        }]);
        let (result, out) = harness.run(&executor, |ctx| {
            run(ctx, CardCommand::Get { number: "999".to_string() })
        });
        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("not found"));
        assert!(out.is_empty());
    }
}
