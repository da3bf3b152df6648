//! `auth login | logout | status`

use super::{trimmed, Context};
use crate::auth::COOKIE;
use crate::cmd_args::{AuthCommand, LoginArgs};
use crate::error::{CliError, Result};
use crate::http::{Executor, Request};
use crate::output;
use crate::resources::ResourceKind;
use serde::Deserialize;
use serde_json::json;
use std::io::Write;

#[derive(Debug, Deserialize)]
struct PendingAuthentication {
    pending_authentication_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Session {
    session_token: Option<String>,
}

pub fn run(ctx: &mut Context, command: AuthCommand) -> Result<()> {
    match command {
        AuthCommand::Login(args) => login(ctx, args),
        AuthCommand::Logout => logout(ctx),
        AuthCommand::Status => status(ctx),
    }
}

fn login(ctx: &mut Context, args: LoginArgs) -> Result<()> {
    if let Some(email) = trimmed(args.email.as_deref()) {
        return magic_link(ctx, email, trimmed(args.code.as_deref()));
    }

    let token = match trimmed(args.token.as_deref()) {
        Some(token) => token.to_string(),
        None => ctx.read_secret("Token")?,
    };
    if token.is_empty() {
        return Err(CliError::usage("token is required"));
    }

    let mut config = ctx.settings.config.clone();
    config.token = token;
    config.session_token.clear();
    ctx.save_config(&config)?;
    writeln!(ctx.out, "Token saved to {}", ctx.settings.config_path.display())?;
    Ok(())
}

/// Email a magic link, then trade its code for a session token
fn magic_link(ctx: &mut Context, email: &str, code: Option<&str>) -> Result<()> {
    tracing::info!("Requesting magic link");
    let request = Request::post("/session").with_json(&json!({ "email_address": email }));
    let response = ctx.anonymous.execute(request)?;
    let pending: PendingAuthentication = serde_json::from_slice(&response.body)?;
    let pending_token = pending
        .pending_authentication_token
        .filter(|t| !t.trim().is_empty())
        .ok_or(CliError::MissingField("pending_authentication_token"))?;

    let code = match code {
        Some(code) => code.to_string(),
        None if !ctx.interactive => {
            return Err(CliError::usage("--code is required when not running in a TTY"));
        }
        None => ctx.read_secret("Magic link code")?,
    };
    if code.is_empty() {
        return Err(CliError::usage("magic link code is required"));
    }

    let request = Request::post("/session/magic_link")
        .with_json(&json!({ "code": code }))
        .with_header(COOKIE, format!("pending_authentication_token={pending_token}"));
    let response = ctx.anonymous.execute(request)?;
    let session: Session = serde_json::from_slice(&response.body)?;
    let session_token = session
        .session_token
        .filter(|t| !t.trim().is_empty())
        .ok_or(CliError::MissingField("session_token"))?;

    let mut config = ctx.settings.config.clone();
    config.session_token = session_token;
    config.token.clear();
    ctx.save_config(&config)?;
    writeln!(ctx.out, "Session saved to {}", ctx.settings.config_path.display())?;
    Ok(())
}

fn logout(ctx: &mut Context) -> Result<()> {
    let mut config = ctx.settings.config.clone();
    config.token.clear();
    config.session_token.clear();
    ctx.save_config(&config)?;
    writeln!(ctx.out, "Credentials cleared.")?;
    Ok(())
}

fn status(ctx: &mut Context) -> Result<()> {
    let auth = ctx.settings.auth();
    if !auth.is_authenticated() {
        writeln!(ctx.out, "Not logged in (no credentials configured).")?;
        return Ok(());
    }

    let response = ctx.send(Request::get("/my/identity"))?;
    if ctx.output().json {
        return ctx.raw(&response);
    }
    let view = ResourceKind::Account.view();
    let rows = view.decode_rows(&response.body)?;
    writeln!(ctx.out, "Authenticated using {}. Accessible accounts:", auth.describe())?;
    let output = ctx.output();
    output::write_table(&mut *ctx.out, output.table_headers(view.headers), &rows, output.table_style())
}
