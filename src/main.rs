//! # fizzy-cli entry point
//!
//! Parses arguments, runs the selected verb and maps the outcome to an exit
//! code: 0 on success, 2 for usage errors, 1 for everything else.

use fizzy_cli::cmd_args::CommandLineArgs;
use fizzy_cli::commands;
use std::io::Write;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// Transport crates that are too chatty below warn
const QUIET_TARGETS: [&str; 8] = [
    "reqwest=warn",
    "hyper=warn",
    "hyper_util=warn",
    "h2=warn",
    "rustls=warn",
    "tracing=warn",
    "tracing_subscriber=warn",
    "mime_guess=warn",
];

fn main() {
    let args = CommandLineArgs::parse();
    init_tracing_subscriber(!args.globals().no_color && std::env::var_os("NO_COLOR").is_none());

    let verb = args.command().map(|command| command.verb());
    let (globals, command) = args.into_parts();
    let code = match commands::execute(&globals, command) {
        Ok(()) => 0,
        Err(err) => {
            tracing::debug!("Command failed: {err:?}");
            eprintln!("error: {}", err.report());
            if err.is_usage() {
                let help = match verb {
                    Some(verb) => CommandLineArgs::render_help(verb),
                    None => CommandLineArgs::render_root_help(),
                };
                eprintln!();
                eprint!("{help}");
            }
            err.exit_code()
        }
    };
    let _ = std::io::stdout().flush();
    std::process::exit(code);
}

fn init_tracing_subscriber(ansi: bool) {
    let filter = QUIET_TARGETS
        .iter()
        .filter_map(|directive| directive.parse().ok())
        .fold(
            EnvFilter::from_env(format!(
                "{}_LOG_LEVEL",
                env!("CARGO_PKG_NAME").to_uppercase().replace('-', "_")
            )),
            EnvFilter::add_directive,
        );

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::rfc_3339())
        .with_ansi(ansi)
        .init();
}
