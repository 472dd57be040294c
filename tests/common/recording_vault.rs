//! A vault that records every call made to it.
//!
//! Wraps a [`MemoryVault`] so stored credentials behave normally, while the
//! call log lets tests assert that validation failures never reach the vault.

use std::collections::BTreeMap;

use credential_store::credentials::{
  Credential, CredentialVault, MemoryVault, Persistence, ProtectionSpace, VaultError,
};
use parking_lot::Mutex;

/// One recorded vault call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultCall {
  SetDefault { user: String, space: String, persistence: Persistence },
  Add { user: String, space: String, persistence: Persistence },
  Default { space: String },
  All { space: String },
  Remove { user: String, space: String },
}

impl VaultCall {
  pub fn is_mutation(&self) -> bool {
    matches!(self, Self::SetDefault { .. } | Self::Add { .. } | Self::Remove { .. })
  }
}

#[derive(Debug, Default)]
pub struct RecordingVault {
  inner: MemoryVault,
  calls: Mutex<Vec<VaultCall>>,
  fail_with: Mutex<Option<String>>,
}

impl RecordingVault {
  pub fn new() -> Self {
    Self::default()
  }

  /// Make every subsequent call fail with a backend error.
  pub fn fail_with(&self, message: &str) {
    *self.fail_with.lock() = Some(message.to_string());
  }

  pub fn calls(&self) -> Vec<VaultCall> {
    self.calls.lock().clone()
  }

  pub fn mutations(&self) -> Vec<VaultCall> {
    self.calls().into_iter().filter(VaultCall::is_mutation).collect()
  }

  fn record(&self, call: VaultCall) -> Result<(), VaultError> {
    self.calls.lock().push(call);
    match self.fail_with.lock().as_ref() {
      Some(message) => Err(VaultError::Backend(message.clone())),
      None => Ok(()),
    }
  }
}

impl CredentialVault for RecordingVault {
  fn set_default_credential(
    &self,
    credential: &Credential,
    space: &ProtectionSpace,
    persistence: Persistence,
  ) -> Result<(), VaultError> {
    self.record(VaultCall::SetDefault {
      user: credential.user.clone(),
      space: space.to_string(),
      persistence,
    })?;
    self.inner.set_default_credential(credential, space, persistence)
  }

  fn add_credential(
    &self,
    credential: &Credential,
    space: &ProtectionSpace,
    persistence: Persistence,
  ) -> Result<(), VaultError> {
    self.record(VaultCall::Add {
      user: credential.user.clone(),
      space: space.to_string(),
      persistence,
    })?;
    self.inner.add_credential(credential, space, persistence)
  }

  fn default_credential(&self, space: &ProtectionSpace) -> Result<Option<Credential>, VaultError> {
    self.record(VaultCall::Default {
      space: space.to_string(),
    })?;
    self.inner.default_credential(space)
  }

  fn all_credentials(&self, space: &ProtectionSpace) -> Result<Option<BTreeMap<String, Credential>>, VaultError> {
    self.record(VaultCall::All {
      space: space.to_string(),
    })?;
    self.inner.all_credentials(space)
  }

  fn remove_credential(&self, credential: &Credential, space: &ProtectionSpace) -> Result<(), VaultError> {
    self.record(VaultCall::Remove {
      user: credential.user.clone(),
      space: space.to_string(),
    })?;
    self.inner.remove_credential(credential, space)
  }
}
