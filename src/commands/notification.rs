//! `notification list | read | unread | read-all`

use super::Context;
use crate::cmd_args::NotificationCommand;
use crate::error::Result;
use crate::http::{Query, Request};
use crate::resources::ResourceKind;

pub fn run(ctx: &mut Context, command: NotificationCommand) -> Result<()> {
    ctx.require_session()?;
    match command {
        NotificationCommand::List { unread, page } => {
            let mut query = Query::new();
            if unread {
                query.set("unread", "true");
            }
            let path = ctx.path("/notifications")?;
            ctx.list(&path, query, &page, ResourceKind::Notification)
        }
        NotificationCommand::Read { notification_id } => {
            let path = ctx.path(&format!("/notifications/{notification_id}/reading"))?;
            let response = ctx.send(Request::post(path))?;
            ctx.done(&response, "Notification marked read")
        }
        NotificationCommand::Unread { notification_id } => {
            let path = ctx.path(&format!("/notifications/{notification_id}/reading"))?;
            let response = ctx.send(Request::delete(path))?;
            ctx.done(&response, "Notification marked unread")
        }
        NotificationCommand::ReadAll => {
            let response = ctx.send(Request::post(ctx.path("/notifications/bulk_reading")?))?;
            ctx.done(&response, "Notifications marked read")
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
    fn list_unread_should_add_query_flag() {
        let harness = Harness::new().plain();
        let executor = ScriptedExecutor::new(vec![Scripted::page(
            r#"[{"id":"n1","read":false,"title":"Mentioned","card":{"title":"Fix bug"},"created_at":"2025-01-01"}]"#,
        )]);
        let command = NotificationCommand::List {
            unread: true,
            page: PageArgs::default(),
        };
        let (result, out) = harness.run(&executor, |ctx| run(ctx, command));
        result.unwrap();
        assert_eq!(out, "n1\tno\tMentioned\tFix bug\t2025-01-01\n");
        assert_eq!(
            executor.seen()[0].query,
            Some(vec![("unread".to_string(), "true".to_string())])
        );
    }

    #[test]
    fn list_without_filter_should_send_empty_query() {
        let harness = Harness::new();
        let executor = ScriptedExecutor::new(vec![Scripted::page("[]")]);
        let command = NotificationCommand::List {
            unread: false,
            page: PageArgs::default(),
        };
        let (result, out) = harness.run(&executor, |ctx| run(ctx, command));
        result.unwrap();
        assert_eq!(out, "ID  READ  TITLE  CARD  CREATED\n");
        assert_eq!(executor.seen()[0].query, Some(vec![]));
    }

    #[test]
    fn read_and_unread_should_toggle_reading() {
        for (command, method, expected) in [
            (
                NotificationCommand::Read { notification_id: "n1".to_string() },
                "POST",
                "Notification marked read.\n",
            ),
            (
                NotificationCommand::Unread { notification_id: "n1".to_string() },
                "DELETE",
                "Notification marked unread.\n",
            ),
        ] {
            let harness = Harness::new();
            let executor = ScriptedExecutor::new(vec![Scripted::no_content()]);
            let (result, out) = harness.run(&executor, |ctx| run(ctx, command));
            result.unwrap();
            assert_eq!(out, expected);
            assert_eq!(executor.seen()[0].method, method);
            assert_eq!(executor.seen()[0].path, "/897362094/notifications/n1/reading");
        }
    }

    #[test]
    fn read_all_should_post_bulk_reading() {
        let harness = Harness::new();
        let executor = ScriptedExecutor::new(vec![Scripted::no_content()]);
        let (result, out) = harness.run(&executor, |ctx| run(ctx, NotificationCommand::ReadAll));
        result.unwrap();
        assert_eq!(out, "Notifications marked read.\n");
        assert_eq!(executor.seen()[0].path, "/897362094/notifications/bulk_reading");
    }
}
