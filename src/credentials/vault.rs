//! Vault abstraction.
//!
//! Defines the [`CredentialVault`] trait so the store can run against the OS
//! keyring in production and an in-memory vault in tests without changing
//! call sites.

use std::collections::BTreeMap;

use super::{Credential, Persistence, ProtectionSpace, VaultError};

/// A credential store keyed by protection space.
///
/// Within one space a vault holds at most one credential per user, plus an
/// optional pointer to the default credential. Implementations own their
/// locking; callers never serialize access.
pub trait CredentialVault: Send + Sync {
  /// Store `credential` and make it the default for `space`.
  ///
  /// # Errors
  /// Returns `Err(VaultError)` when the backing store rejects the write.
  fn set_default_credential(
    &self,
    credential: &Credential,
    space: &ProtectionSpace,
    persistence: Persistence,
  ) -> Result<(), VaultError>;

  /// Store `credential` alongside any others registered for `space`,
  /// replacing an existing credential for the same user.
  ///
  /// # Errors
  /// Returns `Err(VaultError)` when the backing store rejects the write.
  fn add_credential(
    &self,
    credential: &Credential,
    space: &ProtectionSpace,
    persistence: Persistence,
  ) -> Result<(), VaultError>;

  /// The default credential for `space`.
  ///
  /// # Returns
  /// * `Ok(Some(Credential))` when a default has been registered.
  /// * `Ok(None)` when the space has no default.
  fn default_credential(&self, space: &ProtectionSpace) -> Result<Option<Credential>, VaultError>;

  /// Every credential registered for `space`, keyed by user.
  ///
  /// # Returns
  /// * `Ok(Some(map))` with at least one entry.
  /// * `Ok(None)` when nothing is registered for the space.
  fn all_credentials(&self, space: &ProtectionSpace) -> Result<Option<BTreeMap<String, Credential>>, VaultError>;

  /// Remove the credential for `credential.user` from `space`. Removing an
  /// absent credential succeeds.
  fn remove_credential(&self, credential: &Credential, space: &ProtectionSpace) -> Result<(), VaultError>;
}

impl<V: CredentialVault + ?Sized> CredentialVault for Box<V> {
  fn set_default_credential(
    &self,
    credential: &Credential,
    space: &ProtectionSpace,
    persistence: Persistence,
  ) -> Result<(), VaultError> {
    (**self).set_default_credential(credential, space, persistence)
  }

  fn add_credential(
    &self,
    credential: &Credential,
    space: &ProtectionSpace,
    persistence: Persistence,
  ) -> Result<(), VaultError> {
    (**self).add_credential(credential, space, persistence)
  }

  fn default_credential(&self, space: &ProtectionSpace) -> Result<Option<Credential>, VaultError> {
    (**self).default_credential(space)
  }

  fn all_credentials(&self, space: &ProtectionSpace) -> Result<Option<BTreeMap<String, Credential>>, VaultError> {
    (**self).all_credentials(space)
  }

  fn remove_credential(&self, credential: &Credential, space: &ProtectionSpace) -> Result<(), VaultError> {
    (**self).remove_credential(credential, space)
  }
}
