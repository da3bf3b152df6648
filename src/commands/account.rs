//! `account list | set`

use super::Context;
use crate::cmd_args::AccountCommand;
use crate::config::normalize_account;
use crate::error::{CliError, Result};
use crate::http::Request;
use crate::output;
use crate::resources::ResourceKind;
use std::io::Write;

pub fn run(ctx: &mut Context, command: AccountCommand) -> Result<()> {
    match command {
        AccountCommand::List => list(ctx),
        AccountCommand::Set { slug } => set(ctx, &slug),
    }
}

fn list(ctx: &mut Context) -> Result<()> {
    ctx.settings.auth().require()?;
    let response = ctx.send(Request::get("/my/identity"))?;
    if ctx.output().json {
        return ctx.raw(&response);
    }
    let view = ResourceKind::Account.view();
    let rows = view.decode_rows(&response.body)?;
    let output = ctx.output();
    output::write_table(&mut *ctx.out, output.table_headers(view.headers), &rows, output.table_style())
}

fn set(ctx: &mut Context, slug: &str) -> Result<()> {
    let slug = normalize_account(slug);
    if slug.is_empty() {
        return Err(CliError::usage("account slug is required"));
    }
    let mut config = ctx.settings.config.clone();
    config.account = slug;
    ctx.save_config(&config)?;
    writeln!(ctx.out, "Default account set to {}", config.account)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;
    use crate::config::Config;
    use crate::pagination::testing::{Scripted, ScriptedExecutor};

    #[test]
    fn list_should_render_accounts_without_leading_slash() {
        let harness = Harness::new().plain();
        let executor = ScriptedExecutor::new(vec![Scripted::page(
            r#"{"accounts":[{"name":"Acme","slug":"/1"},{"name":"Beta","slug":"2","user":{"name":"Bo"}}]}"#,
        )]);
        let (result, out) = harness.run(&executor, list);
        result.unwrap();
        assert_eq!(out, "1\tAcme\t\n2\tBeta\tBo\n");
    }

    #[test]
    fn list_should_require_credentials() {
        let harness = Harness::with_config(Config::default());
        let executor = ScriptedExecutor::default();
        let (result, _) = harness.run(&executor, list);
        assert_eq!(result.unwrap_err().exit_code(), 2);
        assert!(executor.seen().is_empty());
    }

    #[test]
    fn set_should_normalize_and_persist_slug() {
        let harness = Harness::with_config(Config::default());
        let (result, out) = harness.run(&ScriptedExecutor::default(), |ctx| set(ctx, "/897362094/"));
        result.unwrap();
        assert_eq!(out, "Default account set to 897362094\n");
        assert_eq!(harness.saved_config().account, "897362094");
    }

    #[test]
    fn set_with_only_slashes_should_be_usage_error() {
        let harness = Harness::with_config(Config::default());
        let (result, _) = harness.run(&ScriptedExecutor::default(), |ctx| set(ctx, "//"));
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "account slug is required");
        assert!(!harness.config_path().exists());
    }
}
