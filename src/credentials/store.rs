//! Token storage keyed by URL.
//!
//! [`CredentialStore`] turns `(token, user, url)` requests into vault calls
//! keyed by [`ProtectionSpace`]. Every operation validates the URL before
//! touching the vault, performs a single pass over it, and never retries.

use std::collections::BTreeMap;

use tracing::{debug, info};
use url::Url;

use super::{
  Credential, CredentialError, CredentialVault, KeyringVault, MemoryVault, Persistence, ProtectionSpace,
};

/// Store, remove, and list auth tokens for HTTP(S) URLs.
///
/// Only URLs with a host and an `http`/`https` scheme are accepted. All URLs
/// on the same origin share one set of credentials.
pub trait TokenStore {
  /// Store `token` for `user` under the protection space of `url`.
  ///
  /// # Arguments
  /// * `token` - The secret to store.
  /// * `user` - Identity owning the token (a username, email, or free-form
  ///   description for bare API tokens).
  /// * `url` - Any URL on the target origin.
  /// * `is_default` - Also make this the default credential for the origin.
  /// * `persistence` - How long the vault keeps the token; `None` means
  ///   [`Persistence::Permanent`].
  ///
  /// # Errors
  /// Returns [`CredentialError::NoHost`] or
  /// [`CredentialError::UnsupportedScheme`] before any vault write, or
  /// [`CredentialError::Vault`] if the vault fails.
  fn store_token(
    &self,
    token: &str,
    user: &str,
    url: &Url,
    is_default: bool,
    persistence: Option<Persistence>,
  ) -> Result<(), CredentialError>;

  /// Remove every token stored for the origin of `url`. Succeeds when there
  /// is nothing to remove.
  fn remove_tokens(&self, url: &Url) -> Result<(), CredentialError>;

  /// Every token stored for the origin of `url`, keyed by user. Empty when
  /// nothing is stored.
  fn tokens(&self, url: &Url) -> Result<BTreeMap<String, String>, CredentialError>;

  /// The default credential for the origin of `url`, if one is set.
  fn default_credential(&self, url: &Url) -> Result<Option<Credential>, CredentialError>;
}

/// [`TokenStore`] over any [`CredentialVault`].
///
/// Holds no state besides the vault; cloning semantics and thread safety come
/// from the vault itself.
#[derive(Debug)]
pub struct CredentialStore<V = Box<dyn CredentialVault>> {
  vault: V,
}

impl<V: CredentialVault> CredentialStore<V> {
  pub fn new(vault: V) -> Self {
    Self { vault }
  }

  pub fn vault(&self) -> &V {
    &self.vault
  }
}

impl CredentialStore<KeyringVault> {
  /// The production store: permanent tokens go to the OS keyring under
  /// `service`, session tokens stay in this process.
  pub fn os_default(service: impl Into<String>) -> Self {
    Self::new(KeyringVault::new(service))
  }
}

impl CredentialStore<MemoryVault> {
  /// A store that forgets everything when dropped.
  pub fn in_memory() -> Self {
    Self::new(MemoryVault::new())
  }
}

impl<V: CredentialVault> TokenStore for CredentialStore<V> {
  fn store_token(
    &self,
    token: &str,
    user: &str,
    url: &Url,
    is_default: bool,
    persistence: Option<Persistence>,
  ) -> Result<(), CredentialError> {
    let space = ProtectionSpace::for_url(url)?;
    let persistence = persistence.unwrap_or_default();
    let credential = Credential::new(user, token);

    debug!("Storing token: user={user} space={space} default={is_default} persistence={persistence}");
    if is_default {
      self.vault.set_default_credential(&credential, &space, persistence)?;
    } else {
      self.vault.add_credential(&credential, &space, persistence)?;
    }

    info!(space = %space, "credential storage changed");
    Ok(())
  }

  fn remove_tokens(&self, url: &Url) -> Result<(), CredentialError> {
    let space = ProtectionSpace::for_url(url)?;

    let Some(credentials) = self.vault.all_credentials(&space)? else {
      debug!("No tokens to remove for {space}");
      return Ok(());
    };

    debug!("Removing {} token(s) for {space}", credentials.len());
    for credential in credentials.values() {
      self.vault.remove_credential(credential, &space)?;
    }

    info!(space = %space, "credential storage changed");
    Ok(())
  }

  fn tokens(&self, url: &Url) -> Result<BTreeMap<String, String>, CredentialError> {
    let space = ProtectionSpace::for_url(url)?;

    let tokens: BTreeMap<String, String> = self
      .vault
      .all_credentials(&space)?
      .unwrap_or_default()
      .into_iter()
      .map(|(user, credential)| (user, credential.secret))
      .collect();

    debug!("Found {} token(s) for {space}", tokens.len());
    Ok(tokens)
  }

  fn default_credential(&self, url: &Url) -> Result<Option<Credential>, CredentialError> {
    let space = ProtectionSpace::for_url(url)?;
    Ok(self.vault.default_credential(&space)?)
  }
}
