//! Value types exchanged between the store and its vault.

use std::fmt;
use std::str::FromStr;

/// A token tied to the identity that owns it.
///
/// `user` is usually a username or email address, but any description works
/// for bare API tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
  /// Identity string; unique within a protection space
  pub user: String,
  /// The token or password
  pub secret: String,
}

impl Credential {
  pub fn new(user: impl Into<String>, secret: impl Into<String>) -> Self {
    Self {
      user: user.into(),
      secret: secret.into(),
    }
  }
}

// Keep secrets out of logs and panic messages.
impl fmt::Debug for Credential {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credential")
      .field("user", &self.user)
      .field("secret", &"********")
      .finish()
  }
}

/// How long a vault keeps a credential.
///
/// The exact meaning of each policy belongs to the vault; these are the
/// contracts the bundled vaults honor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Persistence {
  /// Do not keep the credential at all.
  Never,
  /// Keep the credential for the lifetime of the vault value.
  ForSession,
  /// Keep the credential in memory until the process exits.
  UntilProcessExit,
  /// Write the credential to durable storage.
  #[default]
  Permanent,
}

impl Persistence {
  /// Whether the policy keeps the credential in process memory only.
  pub fn is_transient(self) -> bool {
    matches!(self, Self::ForSession | Self::UntilProcessExit)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Never => "never",
      Self::ForSession => "session",
      Self::UntilProcessExit => "process",
      Self::Permanent => "permanent",
    }
  }
}

impl fmt::Display for Persistence {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Persistence {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "never" | "none" => Ok(Self::Never),
      "session" | "for-session" => Ok(Self::ForSession),
      "process" | "until-process-exit" => Ok(Self::UntilProcessExit),
      "permanent" => Ok(Self::Permanent),
      other => Err(format!(
        "unknown persistence '{other}' (expected never, session, process, or permanent)"
      )),
    }
  }
}
