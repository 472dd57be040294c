//! Command-line interface definitions for credential-store.
//!
//! Defines the CLI structure with clap derives and dispatches each subcommand
//! to its handler in [`crate::commands`].

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use url::Url;

use crate::color::ColorScheme;
use crate::commands::completions::handle_completions_command;
use crate::commands::list::handle_list_command;
use crate::commands::remove::handle_remove_command;
use crate::commands::store::handle_store_command;
use crate::commands::version::handle_version_command;
use crate::credentials::{CredentialStore, DEFAULT_SERVICE, Persistence};

/// credential-store - Keep HTTP(S) auth tokens in the OS credential vault
#[derive(Debug, Parser)]
#[command(
  name = "credential-store",
  version,
  about = "Keep HTTP(S) auth tokens in the OS credential vault",
  long_about = "Stores, lists, and removes auth tokens for HTTP and HTTPS origins.\n\
                Tokens are filed by protection space (host, port, and transport security),\n\
                so every URL on the same origin shares one set of credentials.",
  styles = get_clap_styles()
)]
pub struct Cli {
  /// Subcommand to execute
  #[command(subcommand)]
  pub command: Command,

  /// Vault options
  #[command(flatten)]
  pub vault: VaultOptions,

  /// Behavior options
  #[command(flatten)]
  pub behavior: BehaviorOptions,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
  /// Store a token for an origin
  Store(StoreArgs),

  /// Remove every token stored for an origin
  Remove {
    /// Any URL on the target origin
    #[arg(value_name = "URL", value_parser = parse_url)]
    url: Url,
  },

  /// List the tokens stored for an origin
  List {
    /// Any URL on the target origin
    #[arg(value_name = "URL", value_parser = parse_url)]
    url: Url,

    /// Output a JSON object of user to token
    #[arg(long)]
    json: bool,

    /// Print tokens in full instead of masking them
    #[arg(long)]
    show_secrets: bool,
  },

  /// Display version and build information
  Version {
    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Show only version number
    #[arg(long)]
    short: bool,
  },

  /// Generate shell completion scripts
  Completions {
    /// Target shell for completions
    #[arg(value_enum)]
    shell: Shell,
  },
}

/// Arguments for `credential-store store`
#[derive(Debug, Args)]
pub struct StoreArgs {
  /// Any URL on the target origin (https:// is assumed when omitted)
  #[arg(value_name = "URL", value_parser = parse_url)]
  pub url: Url,

  /// User owning the token (username, email, or a free-form label)
  #[arg(short, long, value_name = "USER")]
  pub user: String,

  /// Token to store
  #[arg(long, env = "CREDENTIAL_STORE_TOKEN", value_name = "TOKEN", hide_env_values = true)]
  pub token: Option<String>,

  /// Make this the default credential for the origin
  #[arg(long)]
  pub default: bool,

  /// How long the vault keeps the token
  #[arg(long, value_enum, default_value = "permanent", value_name = "POLICY")]
  pub persistence: PersistenceOption,
}

/// Vault options
#[derive(Debug, Parser)]
pub struct VaultOptions {
  /// Keyring service name tokens are filed under
  #[arg(long, env = "CREDENTIAL_STORE_SERVICE", default_value = DEFAULT_SERVICE, value_name = "NAME", global = true)]
  pub service: String,
}

/// Behavior options
#[derive(Debug, Parser)]
pub struct BehaviorOptions {
  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose", global = true)]
  pub quiet: bool,

  /// Colorize output
  #[arg(long, value_enum, default_value = "auto", value_name = "WHEN", global = true)]
  pub color: ColorOption,
}

/// Color output options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorOption {
  Auto,
  Always,
  Never,
}

/// Persistence policies accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PersistenceOption {
  /// Do not keep the token
  Never,
  /// Keep the token in memory for this invocation only; lost when the command exits
  Session,
  /// Keep the token in memory until the process exits; lost when the command exits
  Process,
  /// Keep the token in the OS keyring
  Permanent,
}

impl From<PersistenceOption> for Persistence {
  fn from(option: PersistenceOption) -> Self {
    match option {
      PersistenceOption::Never => Persistence::Never,
      PersistenceOption::Session => Persistence::ForSession,
      PersistenceOption::Process => Persistence::UntilProcessExit,
      PersistenceOption::Permanent => Persistence::Permanent,
    }
  }
}

/// Shells supported by `credential-store completions`
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
  Bash,
  Zsh,
  Fish,
  Powershell,
  Elvish,
}

/// Parse a URL argument, assuming `https://` when no scheme is given.
///
/// Unsupported schemes are accepted here so the store can report them with
/// its own error.
pub fn parse_url(input: &str) -> Result<Url, String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err("URL must not be empty".to_string());
  }

  if trimmed.contains("://") {
    Url::parse(trimmed).map_err(|e| format!("Invalid URL: {e}"))
  } else {
    Url::parse(&format!("https://{trimmed}")).map_err(|e| format!("Invalid URL: {e}"))
  }
}

/// Parse CLI arguments, initialize logging, and dispatch to the chosen
/// command.
pub fn run() {
  let cli = Cli::parse();

  init_tracing(&cli.behavior);

  let colors = ColorScheme::new(cli.behavior.color);

  match &cli.command {
    Command::Store(args) => {
      let store = CredentialStore::os_default(&cli.vault.service);
      handle_store_command(&store, args, cli.behavior.quiet, &colors);
    }
    Command::Remove { url } => {
      let store = CredentialStore::os_default(&cli.vault.service);
      handle_remove_command(&store, url, cli.behavior.quiet, &colors);
    }
    Command::List {
      url,
      json,
      show_secrets,
    } => {
      let store = CredentialStore::os_default(&cli.vault.service);
      handle_list_command(&store, url, *json, *show_secrets, &colors);
    }
    Command::Version { json, short } => {
      handle_version_command(*json, *short, &colors);
    }
    Command::Completions { shell } => {
      handle_completions_command(*shell);
    }
  }
}

fn init_tracing(behavior: &BehaviorOptions) {
  let level = if behavior.quiet {
    LevelFilter::ERROR
  } else {
    match behavior.verbose {
      0 => LevelFilter::WARN,
      1 => LevelFilter::INFO,
      2 => LevelFilter::DEBUG,
      _ => LevelFilter::TRACE,
    }
  };

  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}

/// Get custom styles for clap help output
fn get_clap_styles() -> clap::builder::Styles {
  use clap::builder::styling::{AnsiColor, Effects};

  clap::builder::Styles::styled()
    .header(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .literal(AnsiColor::BrightGreen.on_default())
    .placeholder(AnsiColor::BrightCyan.on_default())
    .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
    .valid(AnsiColor::BrightGreen.on_default())
    .invalid(AnsiColor::BrightRed.on_default())
}
