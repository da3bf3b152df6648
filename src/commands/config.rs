//! `config show | set`

use super::{trimmed, Context};
use crate::cmd_args::{ConfigCommand, ConfigSetArgs};
use crate::config::normalize_account;
use crate::error::{CliError, Result};
use crate::output;
use serde_json::json;
use std::io::Write;

pub fn run(ctx: &mut Context, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Set(args) => set(ctx, args),
    }
}

fn show(ctx: &mut Context) -> Result<()> {
    let settings = ctx.settings;
    let config = &settings.config;
    let base_url = settings.display_base_url();
    let token_set = !config.token.is_empty();
    let session_token_set = !config.session_token.is_empty();

    if ctx.output().json {
        let payload = json!({
            "base_url": base_url,
            "account": config.account,
            "token_set": token_set,
            "session_token_set": session_token_set,
            "config_path": settings.config_path.display().to_string(),
        });
        return output::write_json(&mut *ctx.out, &payload);
    }

    writeln!(ctx.out, "Config path: {}", settings.config_path.display())?;
    writeln!(ctx.out, "Base URL: {base_url}")?;
    if !config.account.is_empty() {
        writeln!(ctx.out, "Account: {}", config.account)?;
    }
    writeln!(ctx.out, "Token set: {token_set}")?;
    writeln!(ctx.out, "Session token set: {session_token_set}")?;
    Ok(())
}

fn set(ctx: &mut Context, args: ConfigSetArgs) -> Result<()> {
    let base_url = trimmed(args.base_url.as_deref());
    let account = trimmed(args.account.as_deref());
    if base_url.is_none() && account.is_none() {
        return Err(CliError::usage(
            "at least one of --base-url or --account is required",
        ));
    }

    let mut config = ctx.settings.config.clone();
    if let Some(base_url) = base_url {
        config.base_url = base_url.to_string();
    }
    if let Some(account) = account {
        config.account = normalize_account(account);
    }
    ctx.save_config(&config)?;
    writeln!(ctx.out, "Config updated.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;
    use crate::config::Config;
    use crate::pagination::testing::ScriptedExecutor;

    fn stored() -> Config {
        Config {
            base_url: String::new(),
            token: "t".to_string(),
            session_token: String::new(),
            account: "42".to_string(),
        }
    }

    #[test]
    fn show_should_list_effective_values() {
        let harness = Harness::with_config(stored());
        let (result, out) = harness.run(&ScriptedExecutor::default(), show);
        result.unwrap();
        assert_eq!(
            out,
            format!(
                "Config path: {}\nBase URL: https://app.fizzy.do\nAccount: 42\nToken set: true\nSession token set: false\n",
                harness.config_path().display()
            )
        );
    }

    #[test]
    fn show_in_json_mode_should_sort_keys() {
        let harness = Harness::with_config(stored()).json();
        let (result, out) = harness.run(&ScriptedExecutor::default(), show);
        result.unwrap();
        let keys: Vec<&str> = out
            .lines()
            .filter_map(|l| l.trim().strip_prefix('"'))
            .filter_map(|l| l.split('"').next())
            .collect();
        assert_eq!(
            keys,
            vec!["account", "base_url", "config_path", "session_token_set", "token_set"]
        );
    }

    #[test]
    fn set_without_flags_should_not_touch_file() {
        let harness = Harness::with_config(stored());
        let (result, out) = harness.run(&ScriptedExecutor::default(), |ctx| {
            set(ctx, ConfigSetArgs::default())
        });
        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(out.is_empty());
        assert!(!harness.config_path().exists());
    }

    #[test]
    fn set_should_update_only_given_fields() {
        let harness = Harness::with_config(stored());
        let args = ConfigSetArgs {
            base_url: Some(" https://fizzy.example ".to_string()),
            account: None,
        };
        let (result, out) = harness.run(&ScriptedExecutor::default(), |ctx| set(ctx, args));
        result.unwrap();
        assert_eq!(out, "Config updated.\n");
        let saved = harness.saved_config();
        assert_eq!(saved.base_url, "https://fizzy.example");
        assert_eq!(saved.account, "42");
        assert_eq!(saved.token, "t");
    }
}
