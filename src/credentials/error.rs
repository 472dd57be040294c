//! Errors raised by the credential store and the vaults behind it.

use thiserror::Error;
use url::Url;

/// Errors surfaced by [`TokenStore`](super::TokenStore) operations.
///
/// URL validation errors are always raised before the vault is touched.
#[derive(Debug, Error)]
pub enum CredentialError {
  /// The URL scheme is missing or not one of `http`/`https`.
  #[error("unsupported URL scheme: {}", .0.as_deref().unwrap_or("(none)"))]
  UnsupportedScheme(Option<String>),

  /// The URL has no host component, so no protection space can be derived.
  #[error("URL has no host: {0}")]
  NoHost(Url),

  /// The vault failed; passed through unchanged.
  #[error(transparent)]
  Vault(#[from] VaultError),
}

/// Failures reported by a [`CredentialVault`](super::CredentialVault)
/// implementation.
#[derive(Debug, Error)]
pub enum VaultError {
  /// The platform store rejected or failed the request.
  #[error("vault backend error: {0}")]
  Backend(String),

  /// Bookkeeping data kept next to the credentials could not be decoded.
  #[error("vault data is corrupt: {0}")]
  Corrupt(String),
}
