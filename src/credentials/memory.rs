//! In-memory vault.
//!
//! Backs tests and holds session-scoped credentials for
//! [`KeyringVault`](super::KeyringVault). Nothing outlives the value.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use tracing::debug;

use super::{Credential, CredentialVault, Persistence, ProtectionSpace, VaultError};

#[derive(Debug, Default)]
struct SpaceEntry {
  credentials: BTreeMap<String, Credential>,
  default_user: Option<String>,
}

/// A [`CredentialVault`] that keeps everything in a process-local map.
#[derive(Debug, Default)]
pub struct MemoryVault {
  spaces: RwLock<HashMap<ProtectionSpace, SpaceEntry>>,
}

impl MemoryVault {
  pub fn new() -> Self {
    Self::default()
  }

  /// Whether the vault holds no credentials at all.
  pub fn is_empty(&self) -> bool {
    self.spaces.read().is_empty()
  }

  /// Forget the default for `space`, keeping its credentials.
  pub(crate) fn clear_default(&self, space: &ProtectionSpace) {
    if let Some(entry) = self.spaces.write().get_mut(space) {
      entry.default_user = None;
    }
  }

  fn insert(&self, credential: &Credential, space: &ProtectionSpace, persistence: Persistence, make_default: bool) {
    if persistence == Persistence::Never {
      debug!("Discarding credential for {space}: persistence is 'never'");
      return;
    }

    let mut spaces = self.spaces.write();
    let entry = spaces.entry(space.clone()).or_default();
    entry.credentials.insert(credential.user.clone(), credential.clone());
    if make_default {
      entry.default_user = Some(credential.user.clone());
    }
  }
}

impl CredentialVault for MemoryVault {
  fn set_default_credential(
    &self,
    credential: &Credential,
    space: &ProtectionSpace,
    persistence: Persistence,
  ) -> Result<(), VaultError> {
    self.insert(credential, space, persistence, true);
    Ok(())
  }

  fn add_credential(
    &self,
    credential: &Credential,
    space: &ProtectionSpace,
    persistence: Persistence,
  ) -> Result<(), VaultError> {
    self.insert(credential, space, persistence, false);
    Ok(())
  }

  fn default_credential(&self, space: &ProtectionSpace) -> Result<Option<Credential>, VaultError> {
    let spaces = self.spaces.read();
    Ok(spaces.get(space).and_then(|entry| {
      entry
        .default_user
        .as_ref()
        .and_then(|user| entry.credentials.get(user))
        .cloned()
    }))
  }

  fn all_credentials(&self, space: &ProtectionSpace) -> Result<Option<BTreeMap<String, Credential>>, VaultError> {
    let spaces = self.spaces.read();
    Ok(
      spaces
        .get(space)
        .filter(|entry| !entry.credentials.is_empty())
        .map(|entry| entry.credentials.clone()),
    )
  }

  fn remove_credential(&self, credential: &Credential, space: &ProtectionSpace) -> Result<(), VaultError> {
    let mut spaces = self.spaces.write();
    let Some(entry) = spaces.get_mut(space) else {
      return Ok(());
    };

    entry.credentials.remove(&credential.user);
    if entry.default_user.as_deref() == Some(credential.user.as_str()) {
      entry.default_user = None;
    }
    if entry.credentials.is_empty() {
      spaces.remove(space);
    }
    Ok(())
  }
}
