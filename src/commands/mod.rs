//! # Command Dispatcher
//!
//! Maps a parsed verb onto requests and output. Each verb lives in its own
//! module; the helpers here cover what they share: account-scoped paths,
//! list rendering through the pagination walker, single-entity views and the
//! short confirmation lines printed after mutations.

mod account;
mod auth;
mod board;
mod card;
mod column;
mod comment;
mod config;
mod notification;
mod tag;
mod user;

use crate::auth::AuthScheme;
use crate::cmd_args::{Command, CommandLineArgs, GlobalArgs, PageArgs};
use crate::config::{get_config_path, Config, Settings};
use crate::error::{CliError, Result};
use crate::http::{Executor, HttpClient, Query, Request, Response};
use crate::output::{self, OutputMode};
use crate::pagination::Walker;
use crate::resources::{DetailFn, ResourceKind};
use reqwest::blocking::multipart::Form;
use std::cell::RefCell;
use std::io::{BufRead, Read, Write};
use std::path::Path;

/// Everything a verb needs for one invocation
pub struct Context<'a> {
    pub settings: &'a Settings,
    /// Executor carrying the resolved credentials
    pub client: &'a dyn Executor,
    /// Executor without credentials, for the magic-link login
    pub anonymous: &'a dyn Executor,
    pub out: &'a mut dyn Write,
    pub input: &'a mut dyn BufRead,
    /// Whether `input` is a terminal
    pub interactive: bool,
}

/// Resolve settings, wire real stdio and HTTP clients, and run `command`.
/// Without a verb the top-level help is printed.
pub fn execute(globals: &GlobalArgs, command: Option<Command>) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let Some(command) = command else {
        out.write_all(CommandLineArgs::render_root_help().as_bytes())?;
        return Ok(());
    };

    let config_path = get_config_path(globals.config.as_deref());
    let config = Config::load(&config_path)?;
    let settings = Settings::resolve(globals, config, config_path);
    tracing::debug!(
        base_url = %settings.base_url,
        account = settings.account.as_deref().unwrap_or(""),
        auth = settings.auth().describe(),
        color = settings.output.color,
        "Resolved settings"
    );

    let client = LazyClient::new(&settings.base_url, settings.auth());
    let anonymous = LazyClient::new(&settings.base_url, AuthScheme::Unauthenticated);
    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    let mut ctx = Context {
        settings: &settings,
        client: &client,
        anonymous: &anonymous,
        out: &mut out,
        input: &mut input,
        interactive: atty::is(atty::Stream::Stdin),
    };
    run(&mut ctx, command)
}

pub fn run(ctx: &mut Context, command: Command) -> Result<()> {
    match command {
        Command::Auth(command) => auth::run(ctx, command),
        Command::Account(command) => account::run(ctx, command),
        Command::Config(command) => config::run(ctx, command),
        Command::Board(command) => board::run(ctx, command),
        Command::Card(command) => card::run(ctx, command),
        Command::Comment(command) => comment::run(ctx, command),
        Command::Tag(command) => tag::run(ctx, command),
        Command::Column(command) => column::run(ctx, command),
        Command::User(command) => user::run(ctx, command),
        Command::Notification(command) => notification::run(ctx, command),
    }
}

/// Builds the HTTP client on first use, so verbs that never reach the
/// network do not depend on a valid base URL.
struct LazyClient<'a> {
    base_url: &'a str,
    auth: AuthScheme,
    client: RefCell<Option<HttpClient>>,
}

impl<'a> LazyClient<'a> {
    fn new(base_url: &'a str, auth: AuthScheme) -> Self {
        Self {
            base_url,
            auth,
            client: RefCell::new(None),
        }
    }
}

impl Executor for LazyClient<'_> {
    fn execute(&self, request: Request) -> Result<Response> {
        let mut slot = self.client.borrow_mut();
        let client = match slot.take() {
            Some(client) => client,
            None => HttpClient::new(self.base_url, self.auth.clone())?,
        };
        let result = client.execute(request);
        *slot = Some(client);
        result
    }
}

impl Context<'_> {
    pub fn output(&self) -> OutputMode {
        self.settings.output
    }

    /// Credentials and an account slug, checked before any request
    pub fn require_session(&self) -> Result<()> {
        self.settings.auth().require()?;
        self.settings.require_account()?;
        Ok(())
    }

    /// `suffix` under the selected account
    pub fn path(&self, suffix: &str) -> Result<String> {
        self.settings.account_path(suffix)
    }

    pub fn send(&self, request: Request) -> Result<Response> {
        self.client.execute(request)
    }

    /// One page, or every page with `--all`, rendered for `kind`
    pub fn list(&mut self, path: &str, query: Query, page: &PageArgs, kind: ResourceKind) -> Result<()> {
        let client = self.client;
        let output = self.settings.output;
        Walker::new(client).walk(path, query, page.all, &output, kind.view(), &mut *self.out)
    }

    /// Single entity: indented JSON, or the text view produced by `detail`
    pub fn show(&mut self, response: &Response, detail: DetailFn) -> Result<()> {
        if self.settings.output.json {
            return output::write_json_body(&mut *self.out, &response.body);
        }
        let text = detail(&response.body)?;
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    /// `<message>: <location>` after a create, `<message>.` without a Location
    pub fn created(&mut self, response: &Response, message: &str) -> Result<()> {
        if self.settings.output.json {
            let location = response.location().unwrap_or("");
            return output::write_json(
                &mut *self.out,
                &output::status_object(response.status, Some(location)),
            );
        }
        match response.location() {
            Some(location) => writeln!(self.out, "{message}: {location}")?,
            None => writeln!(self.out, "{message}.")?,
        }
        Ok(())
    }

    /// `<message>.`, or the status object in JSON mode
    pub fn done(&mut self, response: &Response, message: &str) -> Result<()> {
        if self.settings.output.json {
            return output::write_json(&mut *self.out, &output::status_object(response.status, None));
        }
        writeln!(self.out, "{message}.")?;
        Ok(())
    }

    /// Like [`Context::done`], but JSON mode echoes the response body
    pub fn echo(&mut self, response: &Response, message: &str) -> Result<()> {
        if self.settings.output.json {
            return output::write_json_response(&mut *self.out, response);
        }
        writeln!(self.out, "{message}.")?;
        Ok(())
    }

    /// Raw response body as JSON, or a status object when empty
    pub fn raw(&mut self, response: &Response) -> Result<()> {
        output::write_json_response(&mut *self.out, response)
    }

    pub fn save_config(&self, config: &Config) -> Result<()> {
        config.save(&self.settings.config_path)
    }

    /// Read a secret: prompt on stderr and read one line on a terminal,
    /// otherwise consume the whole input
    pub fn read_secret(&mut self, label: &str) -> Result<String> {
        let mut text = String::new();
        if self.interactive {
            eprint!("{label}: ");
            std::io::stderr().flush()?;
            self.input.read_line(&mut text)?;
        } else {
            self.input.read_to_string(&mut text)?;
        }
        Ok(text.trim().to_string())
    }
}

/// Trimmed value, or `None` when blank
pub(crate) fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Value as given, or `None` when blank
pub(crate) fn nonblank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn require<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str> {
    trimmed(value).ok_or_else(|| CliError::usage(message))
}

/// `root[key]`, keeping a trailing `[]` outside the brackets
pub(crate) fn field_name(root: &str, key: &str) -> String {
    let (key, suffix) = match key.strip_suffix("[]") {
        Some(key) => (key, "[]"),
        None => (key, ""),
    };
    if root.is_empty() {
        format!("{key}{suffix}")
    } else {
        format!("{root}[{key}]{suffix}")
    }
}

/// Multipart form with text fields nested under `root` plus one file part
pub(crate) fn multipart_form(
    root: &str,
    fields: &[(&str, Vec<String>)],
    file_field: &str,
    file: &Path,
) -> Result<Form> {
    let mut form = Form::new();
    for (key, values) in fields {
        let name = field_name(root, key);
        for value in values.iter().filter(|v| !v.trim().is_empty()) {
            form = form.text(name.clone(), value.clone());
        }
    }
    tracing::debug!("Attaching {} as {}", file.display(), field_name(root, file_field));
    form.file(field_name(root, file_field), file).map_err(|err| {
        CliError::Io(std::io::Error::new(
            err.kind(),
            format!("{}: {err}", file.display()),
        ))
    })
}

/// A file path flag counts as absent when empty
pub(crate) fn file_arg(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}
