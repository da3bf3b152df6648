//! `tag list`

use super::Context;
use crate::cmd_args::TagCommand;
use crate::error::Result;
use crate::http::Query;
use crate::resources::ResourceKind;

pub fn run(ctx: &mut Context, command: TagCommand) -> Result<()> {
    ctx.require_session()?;
    match command {
        TagCommand::List(page) => {
            let path = ctx.path("/tags")?;
            ctx.list(&path, Query::new(), &page, ResourceKind::Tag)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;
    use crate::cmd_args::PageArgs;
    use crate::pagination::testing::{Scripted, ScriptedExecutor};

    #[test]
    fn list_should_render_tags() {
        let harness = Harness::new();
        let executor = ScriptedExecutor::new(vec![Scripted::page(
            r#"[{"id":"t1","title":"bug"},{"id":"t22","title":"design"}]"#,
        )]);
        let (result, out) = harness.run(&executor, |ctx| {
            run(ctx, TagCommand::List(PageArgs::default()))
        });
        result.unwrap();
        assert_eq!(out, "ID   TITLE\nt1   bug\nt22  design\n");
        assert_eq!(executor.seen()[0].path, "/897362094/tags");
    }

    #[test]
    fn list_in_json_mode_with_all_should_concatenate_pages() {
        let harness = Harness::new().json();
        let executor = ScriptedExecutor::new(vec![
            Scripted::page_with_next(r#"[{"id":"t1"}]"#, "/897362094/tags?page=2"),
            Scripted::page(r#"[{"id":"t2"}]"#),
        ]);
        let (result, out) = harness.run(&executor, |ctx| {
            run(ctx, TagCommand::List(PageArgs { all: true }))
        });
        result.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value, serde_json::json!([{"id": "t1"}, {"id": "t2"}]));
    }
}
