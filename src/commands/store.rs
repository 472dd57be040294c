//! `credential-store store`: file a token under the origin of a URL.

use std::io::{self, BufRead, IsTerminal};
use std::process;

use anyhow::Context;

use super::{EXIT_MISSING_TOKEN, fail};
use crate::cli::StoreArgs;
use crate::color::ColorScheme;
use crate::credentials::{Persistence, TokenStore};

/// Store the token described by `args`.
///
/// # Arguments
/// * `store` - Token store to write to.
/// * `args` - Parsed `store` arguments; the token may come from
///   `CREDENTIAL_STORE_TOKEN` or, when stdin is piped, its first line.
/// * `quiet` - Suppress the confirmation line.
/// * `colors` - Shared color scheme used to render output consistently.
pub(crate) fn handle_store_command(store: &impl TokenStore, args: &StoreArgs, quiet: bool, colors: &ColorScheme) {
  let token = match resolve_token(args.token.as_deref()) {
    Ok(Some(token)) => token,
    Ok(None) => {
      eprintln!("{} {}", colors.error("✗"), colors.error("No token provided"));
      eprintln!("\n{}", colors.info("Provide the token via:"));
      eprintln!("  • CLI flag: --token");
      eprintln!("  • Environment variable: CREDENTIAL_STORE_TOKEN");
      eprintln!("  • Standard input: echo \"$TOKEN\" | credential-store store <URL> --user <USER>");
      process::exit(EXIT_MISSING_TOKEN);
    }
    Err(e) => {
      eprintln!("{} {}", colors.error("✗"), colors.error("Failed to read token"));
      eprintln!("  {e:#}");
      process::exit(EXIT_MISSING_TOKEN);
    }
  };

  let persistence = Persistence::from(args.persistence);
  if let Err(e) = store.store_token(&token, &args.user, &args.url, args.default, Some(persistence)) {
    fail("store token", &e, colors);
  }

  if !quiet {
    println!("{}", store_summary(args, persistence, colors));
  }
}

/// Pick the token from the flag/environment, falling back to piped stdin.
fn resolve_token(flag: Option<&str>) -> anyhow::Result<Option<String>> {
  if let Some(token) = flag.filter(|t| !t.is_empty()) {
    return Ok(Some(token.to_string()));
  }

  let stdin = io::stdin();
  if stdin.is_terminal() {
    return Ok(None);
  }
  read_token(stdin.lock())
}

/// Read a token from the first line of `reader`, ignoring the line ending.
fn read_token(mut reader: impl BufRead) -> anyhow::Result<Option<String>> {
  let mut line = String::new();
  reader.read_line(&mut line).context("failed to read token from stdin")?;
  let token = line.trim_end_matches(['\r', '\n']);
  Ok((!token.is_empty()).then(|| token.to_string()))
}

/// One-line confirmation printed after a successful store.
fn store_summary(args: &StoreArgs, persistence: Persistence, colors: &ColorScheme) -> String {
  let origin = args.url.origin().ascii_serialization();
  let mut line = format!(
    "{} Stored token for {} on {}",
    colors.success("✓"),
    colors.emphasis(&args.user),
    colors.link(origin)
  );
  if args.default {
    line.push_str(" (default)");
  }
  match persistence {
    Persistence::Permanent => {}
    Persistence::Never => line.push_str(&colors.warning(" [persistence: never, nothing was kept]")),
    other => line.push_str(&colors.warning(format!(
      " [persistence: {other}, forgotten when this command exits]"
    ))),
  }
  line
}
