//! CLI subcommand handlers.
//!
//! Each `credential-store` subcommand lives in its own module; the helpers
//! here keep error reporting and token masking consistent between them.

pub mod completions;
pub mod list;
pub mod remove;
pub mod store;
pub mod version;

use std::process;

use crate::color::ColorScheme;
use crate::credentials::CredentialError;

/// Exit code for vault failures.
pub const EXIT_VAULT: i32 = 1;
/// Exit code when no token was supplied to `store`.
pub const EXIT_MISSING_TOKEN: i32 = 2;
/// Exit code for URLs the store refuses (bad scheme, missing host).
pub const EXIT_INVALID_URL: i32 = 4;

/// Map a store error onto the process exit code reported for it.
pub fn exit_code(err: &CredentialError) -> i32 {
  match err {
    CredentialError::UnsupportedScheme(_) | CredentialError::NoHost(_) => EXIT_INVALID_URL,
    CredentialError::Vault(_) => EXIT_VAULT,
  }
}

/// Print a store error with a hint for fixing it, then exit.
pub(crate) fn fail(action: &str, err: &CredentialError, colors: &ColorScheme) -> ! {
  eprintln!("{} {}", colors.error("✗"), colors.error(format!("Failed to {action}")));
  eprintln!("  {err}");

  match err {
    CredentialError::UnsupportedScheme(_) => {
      eprintln!("\n{}", colors.info("Only http:// and https:// URLs are supported."));
    }
    CredentialError::NoHost(_) => {
      eprintln!(
        "\n{}",
        colors.info("Pass a URL with a host, e.g. https://api.example.com")
      );
    }
    CredentialError::Vault(_) => {
      eprintln!(
        "\n{}",
        colors.dimmed("Check that the OS keyring is unlocked and reachable, then retry with -vv for details.")
      );
    }
  }

  process::exit(exit_code(err));
}

/// Mask a token for display, keeping a short prefix of long tokens so users
/// can tell them apart.
pub fn mask_token(token: &str) -> String {
  let len = token.chars().count();
  if len > 8 {
    let prefix: String = token.chars().take(4).collect();
    format!("{prefix}{}", "*".repeat(len - 4))
  } else {
    "*".repeat(len)
  }
}
