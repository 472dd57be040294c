//! Derivation of the vault key for a URL.
//!
//! A protection space scopes credentials by host, port, transport security,
//! and authentication method. Only the URL's host and scheme participate:
//! paths, queries, explicit ports, and userinfo are ignored, so every URL on
//! the same origin shares one credential set.

use std::fmt;

use tracing::trace;
use url::Url;

use super::{CredentialError, SupportedScheme};

/// Authentication method a protection space is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthMethod {
  #[default]
  HttpBasic,
}

/// The key a vault files credentials under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProtectionSpace {
  host: String,
  scheme: SupportedScheme,
  port: u16,
  auth_method: AuthMethod,
  realm: Option<String>,
}

impl ProtectionSpace {
  /// Resolve the protection space for `url`.
  ///
  /// # Errors
  /// * [`CredentialError::NoHost`] when the URL has no (or an empty) host.
  ///   This is checked first, so `file:///usr/bin` reports a missing host.
  /// * [`CredentialError::UnsupportedScheme`] when the scheme is not
  ///   `http` or `https`.
  pub fn for_url(url: &Url) -> Result<Self, CredentialError> {
    let host = match url.host_str() {
      Some(host) if !host.is_empty() => host,
      _ => return Err(CredentialError::NoHost(url.clone())),
    };

    let scheme = SupportedScheme::of(url).ok_or_else(|| {
      let raw = url.scheme();
      CredentialError::UnsupportedScheme((!raw.is_empty()).then(|| raw.to_string()))
    })?;

    let space = Self::new(host, scheme);
    trace!("Resolved protection space {space} for {url}");
    Ok(space)
  }

  /// Build a protection space directly from a host and scheme.
  pub fn new(host: impl Into<String>, scheme: SupportedScheme) -> Self {
    Self {
      host: host.into(),
      scheme,
      port: scheme.default_port(),
      auth_method: AuthMethod::HttpBasic,
      realm: None,
    }
  }

  pub fn host(&self) -> &str {
    &self.host
  }

  pub fn port(&self) -> u16 {
    self.port
  }

  pub fn scheme(&self) -> SupportedScheme {
    self.scheme
  }

  pub fn is_secure(&self) -> bool {
    self.scheme.is_secure()
  }

  pub fn auth_method(&self) -> AuthMethod {
    self.auth_method
  }

  pub fn realm(&self) -> Option<&str> {
    self.realm.as_deref()
  }
}

impl fmt::Display for ProtectionSpace {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
  }
}
