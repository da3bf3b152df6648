//! Command-line surface: global flags, verbs and sub-verbs
//!
//! Global flags go before the verb (`fizzy-cli --json card list`). Flags that
//! can also come from the environment are wired through clap's `env` support,
//! so a flag always wins over its variable.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::config::{ACCOUNT_ENV_VAR, BASE_URL_ENV_VAR, CONFIG_PATH_ENV_VAR, TOKEN_ENV_VAR};

#[derive(Parser, Debug)]
#[command(
    name = "fizzy-cli",
    version,
    about = "Command-line client for the Fizzy kanban API",
    long_about = None
)]
struct ClapArgs {
    #[command(flatten)]
    globals: GlobalArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Flags shared by every verb
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// API base URL
    #[arg(long, env = BASE_URL_ENV_VAR, value_name = "URL")]
    pub base_url: Option<String>,

    /// Personal access token
    #[arg(long, env = TOKEN_ENV_VAR, hide_env_values = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Account slug
    #[arg(long, env = ACCOUNT_ENV_VAR, value_name = "SLUG")]
    pub account: Option<String>,

    /// Config file path
    #[arg(long, env = CONFIG_PATH_ENV_VAR, value_name = "PATH")]
    pub config: Option<String>,

    /// JSON output
    #[arg(long, conflicts_with = "plain")]
    pub json: bool,

    /// Plain tab-separated output without headers
    #[arg(long)]
    pub plain: bool,

    /// Disable color
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in, log out and show credentials
    #[command(subcommand)]
    Auth(AuthCommand),
    /// List accounts and pick the default one
    #[command(subcommand)]
    Account(AccountCommand),
    /// Show or change the config file
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Manage boards
    #[command(subcommand)]
    Board(BoardCommand),
    /// Manage cards
    #[command(subcommand)]
    Card(CardCommand),
    /// Manage card comments
    #[command(subcommand)]
    Comment(CommentCommand),
    /// List tags
    #[command(subcommand)]
    Tag(TagCommand),
    /// Manage board columns
    #[command(subcommand)]
    Column(ColumnCommand),
    /// Manage users
    #[command(subcommand)]
    User(UserCommand),
    /// List and mark notifications
    #[command(subcommand)]
    Notification(NotificationCommand),
}

impl Command {
    /// Name of the verb, used to render its help on usage errors
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Auth(_) => "auth",
            Command::Account(_) => "account",
            Command::Config(_) => "config",
            Command::Board(_) => "board",
            Command::Card(_) => "card",
            Command::Comment(_) => "comment",
            Command::Tag(_) => "tag",
            Command::Column(_) => "column",
            Command::User(_) => "user",
            Command::Notification(_) => "notification",
        }
    }
}

/// Follow `Link: rel="next"` headers until the last page
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Fetch all pages
    #[arg(long)]
    pub all: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Save a personal access token, or log in with a magic link
    Login(LoginArgs),
    /// Remove saved credentials
    Logout,
    /// Show which credentials are in use and the accessible accounts
    Status,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LoginArgs {
    /// Personal access token (read from stdin when omitted)
    #[arg(long, conflicts_with = "email")]
    pub token: Option<String>,
    /// Email address for magic-link login
    #[arg(long)]
    pub email: Option<String>,
    /// Magic-link code (prompted on a terminal when omitted)
    #[arg(long, requires = "email")]
    pub code: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AccountCommand {
    /// List accessible accounts
    List,
    /// Set the default account
    Set {
        /// Account slug
        slug: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Show the config file and effective settings
    Show,
    /// Persist the base URL and/or default account
    Set(ConfigSetArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigSetArgs {
    /// API base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
    /// Account slug
    #[arg(long, value_name = "SLUG")]
    pub account: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum BoardCommand {
    /// List boards
    List(PageArgs),
    /// Show a board
    Get { board_id: String },
    /// Create a board
    Create(BoardCreateArgs),
    /// Update a board
    Update(BoardUpdateArgs),
    /// Delete a board
    Delete { board_id: String },
}

#[derive(Args, Debug, Clone, Default)]
pub struct BoardCreateArgs {
    /// Board name
    #[arg(long)]
    pub name: Option<String>,
    /// Give every account member access (default)
    #[arg(long, conflicts_with = "no_all_access")]
    pub all_access: bool,
    /// Do not give every account member access
    #[arg(long)]
    pub no_all_access: bool,
    /// Auto postpone period (days)
    #[arg(long, value_name = "DAYS")]
    pub auto_postpone_days: Option<u32>,
    /// Public description
    #[arg(long)]
    pub public_description: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BoardUpdateArgs {
    pub board_id: String,
    /// Board name
    #[arg(long)]
    pub name: Option<String>,
    /// Give every account member access
    #[arg(long, conflicts_with = "no_all_access")]
    pub all_access: bool,
    /// Restrict access to the listed users
    #[arg(long)]
    pub no_all_access: bool,
    /// Auto postpone period (days)
    #[arg(long, value_name = "DAYS")]
    pub auto_postpone_days: Option<u32>,
    /// Public description
    #[arg(long)]
    pub public_description: Option<String>,
    /// User ID with access (repeatable)
    #[arg(long = "user-id", value_name = "ID")]
    pub user_ids: Vec<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CardCommand {
    /// List cards
    List(CardListArgs),
    /// Show a card
    Get { number: String },
    /// Create a card
    Create(CardCreateArgs),
    /// Update a card
    Update(CardUpdateArgs),
    /// Delete a card
    Delete { number: String },
    /// Close a card
    Close { number: String },
    /// Reopen a closed card
    Reopen { number: String },
    /// Move a card to Not Now
    NotNow { number: String },
    /// Move a card into a column
    Triage {
        number: String,
        /// Column ID
        #[arg(long)]
        column_id: Option<String>,
    },
    /// Move a card back to triage
    Untriage { number: String },
    /// Toggle a tag on a card
    Tag {
        number: String,
        /// Tag title (a leading '#' is ignored)
        #[arg(long)]
        title: Option<String>,
    },
    /// Toggle an assignee on a card
    Assign {
        number: String,
        /// Assignee ID
        #[arg(long)]
        assignee_id: Option<String>,
    },
    /// Subscribe to a card
    Watch { number: String },
    /// Unsubscribe from a card
    Unwatch { number: String },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CardListArgs {
    /// Board ID filter (repeatable)
    #[arg(long = "board-id", value_name = "ID")]
    pub board_ids: Vec<String>,
    /// Tag ID filter (repeatable)
    #[arg(long = "tag-id", value_name = "ID")]
    pub tag_ids: Vec<String>,
    /// Assignee ID filter (repeatable)
    #[arg(long = "assignee-id", value_name = "ID")]
    pub assignee_ids: Vec<String>,
    /// Creator ID filter (repeatable)
    #[arg(long = "creator-id", value_name = "ID")]
    pub creator_ids: Vec<String>,
    /// Closer ID filter (repeatable)
    #[arg(long = "closer-id", value_name = "ID")]
    pub closer_ids: Vec<String>,
    /// Card ID filter (repeatable)
    #[arg(long = "card-id", value_name = "ID")]
    pub card_ids: Vec<String>,
    /// Search term (repeatable)
    #[arg(long = "term")]
    pub terms: Vec<String>,
    /// Index filter (all, closed, not_now, stalled, postponing_soon, golden)
    #[arg(long)]
    pub indexed_by: Option<String>,
    /// Sort order (newest, oldest, latest)
    #[arg(long)]
    pub sorted_by: Option<String>,
    /// Assignment status (unassigned)
    #[arg(long)]
    pub assignment_status: Option<String>,
    /// Creation date filter
    #[arg(long)]
    pub creation: Option<String>,
    /// Closure date filter
    #[arg(long)]
    pub closure: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
}

/// Card fields shared by create and update
#[derive(Args, Debug, Clone, Default)]
pub struct CardFields {
    /// Card title
    #[arg(long)]
    pub title: Option<String>,
    /// Card description
    #[arg(long)]
    pub description: Option<String>,
    /// Card status (drafted, published)
    #[arg(long)]
    pub status: Option<String>,
    /// Tag ID (repeatable)
    #[arg(long = "tag-id", value_name = "ID")]
    pub tag_ids: Vec<String>,
    /// Image file to upload
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CardCreateArgs {
    /// Board ID
    #[arg(long)]
    pub board_id: Option<String>,
    #[command(flatten)]
    pub fields: CardFields,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CardUpdateArgs {
    pub number: String,
    #[command(flatten)]
    pub fields: CardFields,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CommentCommand {
    /// List comments on a card
    List {
        card_number: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show a comment
    Get {
        card_number: String,
        comment_id: String,
    },
    /// Add a comment to a card
    Create {
        card_number: String,
        /// Comment body
        #[arg(long)]
        body: Option<String>,
    },
    /// Edit a comment
    Update {
        card_number: String,
        comment_id: String,
        /// Comment body
        #[arg(long)]
        body: Option<String>,
    },
    /// Delete a comment
    Delete {
        card_number: String,
        comment_id: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum TagCommand {
    /// List tags
    List(PageArgs),
}

/// Columns always live on a board
#[derive(Args, Debug, Clone, Default)]
pub struct BoardScope {
    /// Board ID
    #[arg(long)]
    pub board_id: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ColumnCommand {
    /// List columns on a board
    List {
        #[command(flatten)]
        board: BoardScope,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show a column
    Get {
        column_id: String,
        #[command(flatten)]
        board: BoardScope,
    },
    /// Create a column
    Create {
        #[command(flatten)]
        board: BoardScope,
        /// Column name
        #[arg(long)]
        name: Option<String>,
        /// Column color
        #[arg(long)]
        color: Option<String>,
    },
    /// Update a column
    Update {
        column_id: String,
        #[command(flatten)]
        board: BoardScope,
        /// Column name
        #[arg(long)]
        name: Option<String>,
        /// Column color
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a column
    Delete {
        column_id: String,
        #[command(flatten)]
        board: BoardScope,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum UserCommand {
    /// List users
    List(PageArgs),
    /// Show a user
    Get { user_id: String },
    /// Rename a user or upload an avatar
    Update {
        user_id: String,
        /// User name
        #[arg(long)]
        name: Option<String>,
        /// Avatar file to upload
        #[arg(long, value_name = "PATH")]
        avatar: Option<PathBuf>,
    },
    /// Deactivate a user
    Deactivate { user_id: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum NotificationCommand {
    /// List notifications
    List {
        /// Show only unread
        #[arg(long)]
        unread: bool,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Mark a notification read
    Read { notification_id: String },
    /// Mark a notification unread
    Unread { notification_id: String },
    /// Mark every notification read
    ReadAll,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    globals: GlobalArgs,
    command: Option<Command>,
}

impl CommandLineArgs {
    /// Parse the process arguments; clap prints help, version and parse
    /// errors itself and exits (2 for errors).
    pub fn parse() -> Self {
        Self::from_clap(ClapArgs::parse())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_clap(ClapArgs::parse_from(itr))
    }

    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        ClapArgs::try_parse_from(itr).map(Self::from_clap)
    }

    fn from_clap(args: ClapArgs) -> Self {
        Self {
            globals: args.globals,
            command: args.command,
        }
    }

    pub fn globals(&self) -> &GlobalArgs {
        &self.globals
    }

    pub fn command(&self) -> Option<&Command> {
        self.command.as_ref()
    }

    pub fn into_parts(self) -> (GlobalArgs, Option<Command>) {
        (self.globals, self.command)
    }

    /// Top-level help text
    pub fn render_root_help() -> String {
        ClapArgs::command().render_help().to_string()
    }

    /// Help text of one verb, or the top-level help for an unknown verb
    pub fn render_help(verb: &str) -> String {
        let mut command = ClapArgs::command();
        match command.find_subcommand_mut(verb) {
            Some(sub) => sub.render_help().to_string(),
            None => command.render_help().to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::error::ErrorKind;
    use serial_test::serial;

    const ENV_VARS: [&str; 4] = ["FIZZY_BASE_URL", "FIZZY_TOKEN", "FIZZY_ACCOUNT", "FIZZY_CONFIG"];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    fn parse(args: &[&str]) -> CommandLineArgs {
        CommandLineArgs::parse_from(std::iter::once("fizzy-cli").chain(args.iter().copied()))
    }

    #[test]
    fn test_verify_cli() {
        ClapArgs::command().debug_assert();
    }

    #[test]
    #[serial]
    fn test_parse_global_flags_before_verb() {
        clear_env();
        let args = parse(&["--base-url", "https://x.test", "--account", "/1/", "--plain", "tag", "list"]);
        assert_eq!(args.globals().base_url.as_deref(), Some("https://x.test"));
        assert_eq!(args.globals().account.as_deref(), Some("/1/"));
        assert!(args.globals().plain);
        assert!(matches!(
            args.command(),
            Some(Command::Tag(TagCommand::List(PageArgs { all: false })))
        ));
    }

    #[test]
    #[serial]
    fn test_no_verb_is_allowed() {
        clear_env();
        let args = parse(&[]);
        assert!(args.command().is_none());
        assert!(!args.globals().json);
    }

    #[test]
    fn test_json_and_plain_conflict() {
        let err = CommandLineArgs::try_parse_from(["fizzy-cli", "--json", "--plain", "tag", "list"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_verb_without_subcommand_shows_help() {
        let err = CommandLineArgs::try_parse_from(["fizzy-cli", "card"]).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_card_list_repeatable_filters() {
        let args = parse(&[
            "card", "list", "--board-id", "b1", "--board-id", "b2", "--term", "dark mode",
            "--sorted-by", "newest", "--all",
        ]);
        let Some(Command::Card(CardCommand::List(list))) = args.command() else {
            panic!("expected card list");
        };
        assert_eq!(list.board_ids, vec!["b1", "b2"]);
        assert_eq!(list.terms, vec!["dark mode"]);
        assert_eq!(list.sorted_by.as_deref(), Some("newest"));
        assert!(list.page.all);
    }

    #[test]
    fn test_card_create_with_image() {
        let args = parse(&[
            "card", "create", "--board-id", "b1", "--title", "Hi", "--tag-id", "t1", "--image",
            "shot.png",
        ]);
        let Some(Command::Card(CardCommand::Create(create))) = args.command() else {
            panic!("expected card create");
        };
        assert_eq!(create.board_id.as_deref(), Some("b1"));
        assert_eq!(create.fields.title.as_deref(), Some("Hi"));
        assert_eq!(create.fields.tag_ids, vec!["t1"]);
        assert_eq!(create.fields.image, Some(PathBuf::from("shot.png")));
    }

    #[test]
    fn test_board_update_access_flags_conflict() {
        let err = CommandLineArgs::try_parse_from([
            "fizzy-cli", "board", "update", "b1", "--all-access", "--no-all-access",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_login_token_and_email_conflict() {
        let err = CommandLineArgs::try_parse_from([
            "fizzy-cli", "auth", "login", "--token", "t", "--email", "a@b.c",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_config_set_flags_do_not_clash_with_globals() {
        let args = parse(&["config", "set", "--account", "42"]);
        let Some(Command::Config(ConfigCommand::Set(set))) = args.command() else {
            panic!("expected config set");
        };
        assert_eq!(set.account.as_deref(), Some("42"));
        assert_eq!(set.base_url, None);
    }

    #[test]
    #[serial]
    fn test_env_vars_fill_global_flags() {
        clear_env();
        std::env::set_var("FIZZY_TOKEN", "env-token");
        std::env::set_var("FIZZY_ACCOUNT", "7");
        let args = parse(&["--account", "9", "board", "list"]);
        clear_env();
        assert_eq!(args.globals().token.as_deref(), Some("env-token"));
        assert_eq!(args.globals().account.as_deref(), Some("9"));
    }

    #[test]
    fn test_verb_names_match_subcommands() {
        let args = parse(&["notification", "read-all"]);
        let command = args.command().unwrap();
        assert_eq!(command.verb(), "notification");
        assert!(CommandLineArgs::render_help(command.verb()).contains("read-all"));
    }

    #[test]
    fn test_render_help_for_unknown_verb_falls_back_to_root() {
        assert_eq!(
            CommandLineArgs::render_help("nope"),
            CommandLineArgs::render_root_help()
        );
    }
}
