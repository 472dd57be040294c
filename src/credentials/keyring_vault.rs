//! OS keyring vault.
//!
//! Permanent credentials live in the platform secure store (macOS Keychain,
//! Windows Credential Manager, Linux kernel keyutils) through the `keyring`
//! crate. Session-scoped credentials stay in an embedded [`MemoryVault`].
//! A user lives in exactly one of the two layers: whichever store happened
//! last wins, and the other layer's copy is dropped.
//!
//! Keyrings cannot enumerate their entries, so every protection space also
//! gets an index entry listing its users and the default user:
//!
//! ```text
//! service "{service}:{space}"   user "{user}"   -> secret
//! service "{service}.index"     user "{space}"  -> {"users": [...], "default": "..."}
//! ```

use std::collections::{BTreeMap, BTreeSet};

use keyring::credential::CredentialBuilderApi;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{Credential, CredentialVault, MemoryVault, Persistence, ProtectionSpace, VaultError};

/// Service name used when the caller does not pick one.
pub const DEFAULT_SERVICE: &str = "credential-store";

/// Users registered for one protection space.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SpaceIndex {
  users: BTreeSet<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  default: Option<String>,
}

impl SpaceIndex {
  fn decode(raw: &str) -> Result<Self, VaultError> {
    serde_json::from_str(raw).map_err(|e| VaultError::Corrupt(format!("invalid keyring index: {e}")))
  }

  fn encode(&self) -> Result<String, VaultError> {
    serde_json::to_string(self).map_err(|e| VaultError::Corrupt(e.to_string()))
  }

  /// Drop `user`, clearing the default if it pointed there. Returns whether
  /// anything changed.
  fn forget(&mut self, user: &str) -> bool {
    let listed = self.users.remove(user);
    let was_default = self.default.as_deref() == Some(user);
    if was_default {
      self.default = None;
    }
    listed || was_default
  }
}

/// A [`CredentialVault`] backed by the operating system's keyring.
#[derive(Debug)]
pub struct KeyringVault {
  service: String,
  builder: Option<Box<keyring::CredentialBuilder>>,
  session: MemoryVault,
  // Held across every load/modify/save of an index entry.
  index_lock: Mutex<()>,
}

impl KeyringVault {
  /// Create a vault whose keyring entries are namespaced under `service`,
  /// using the platform's default keyring.
  pub fn new(service: impl Into<String>) -> Self {
    Self {
      service: service.into(),
      builder: None,
      session: MemoryVault::new(),
      index_lock: Mutex::new(()),
    }
  }

  /// Create a vault that builds its keyring entries with `builder` instead
  /// of the platform default.
  pub fn with_builder(service: impl Into<String>, builder: Box<keyring::CredentialBuilder>) -> Self {
    Self {
      builder: Some(builder),
      ..Self::new(service)
    }
  }

  pub fn service(&self) -> &str {
    &self.service
  }

  fn secret_service(&self, space: &ProtectionSpace) -> String {
    format!("{}:{space}", self.service)
  }

  fn index_service(&self) -> String {
    format!("{}.index", self.service)
  }

  fn entry(&self, service: &str, user: &str) -> Result<keyring::Entry, VaultError> {
    match &self.builder {
      Some(builder) => builder
        .build(None, service, user)
        .map(keyring::Entry::new_with_credential)
        .map_err(backend),
      None => keyring::Entry::new(service, user).map_err(backend),
    }
  }

  fn secret_entry(&self, space: &ProtectionSpace, user: &str) -> Result<keyring::Entry, VaultError> {
    self.entry(&self.secret_service(space), user)
  }

  fn index_entry(&self, space: &ProtectionSpace) -> Result<keyring::Entry, VaultError> {
    self.entry(&self.index_service(), &space.to_string())
  }

  fn load_index(&self, space: &ProtectionSpace) -> Result<SpaceIndex, VaultError> {
    match self.index_entry(space)?.get_password() {
      Ok(raw) => SpaceIndex::decode(&raw),
      Err(keyring::Error::NoEntry) => Ok(SpaceIndex::default()),
      Err(e) => Err(backend(e)),
    }
  }

  fn save_index(&self, space: &ProtectionSpace, index: &SpaceIndex) -> Result<(), VaultError> {
    let entry = self.index_entry(space)?;
    if index.users.is_empty() {
      return ignore_missing(entry.delete_credential());
    }
    entry.set_password(&index.encode()?).map_err(backend)
  }

  fn read_secret(&self, space: &ProtectionSpace, user: &str) -> Result<Option<String>, VaultError> {
    match self.secret_entry(space, user)?.get_password() {
      Ok(secret) => Ok(Some(secret)),
      Err(keyring::Error::NoEntry) => Ok(None),
      Err(e) => Err(backend(e)),
    }
  }

  /// Remove `user` from the keyring layer of `space`; with `clear_default`
  /// the keyring default goes too. Callers hold `index_lock`.
  fn forget_permanent(&self, space: &ProtectionSpace, user: &str, clear_default: bool) -> Result<(), VaultError> {
    ignore_missing(self.secret_entry(space, user)?.delete_credential())?;

    let mut index = self.load_index(space)?;
    let mut changed = index.forget(user);
    if clear_default && index.default.is_some() {
      index.default = None;
      changed = true;
    }
    if changed {
      self.save_index(space, &index)?;
    }
    Ok(())
  }

  fn write(
    &self,
    credential: &Credential,
    space: &ProtectionSpace,
    persistence: Persistence,
    make_default: bool,
  ) -> Result<(), VaultError> {
    if persistence == Persistence::Never {
      debug!("Discarding credential for {space}: persistence is 'never'");
      return Ok(());
    }

    let _guard = self.index_lock.lock();
    let user = credential.user.as_str();

    if persistence.is_transient() {
      let keeps_default = self.load_index(space)?.default.as_deref() == Some(user);
      trace!("Keeping credential for {space} in the session layer");
      if make_default || keeps_default {
        self.session.set_default_credential(credential, space, persistence)?;
      } else {
        self.session.add_credential(credential, space, persistence)?;
      }
      return self.forget_permanent(space, user, make_default);
    }

    let keeps_default = self
      .session
      .default_credential(space)?
      .is_some_and(|current| current.user == user);

    self
      .secret_entry(space, user)?
      .set_password(&credential.secret)
      .map_err(backend)?;

    let mut index = self.load_index(space)?;
    index.users.insert(user.to_string());
    if make_default || keeps_default {
      index.default = Some(user.to_string());
    }
    self.save_index(space, &index)?;

    self.session.remove_credential(credential, space)?;
    if make_default {
      self.session.clear_default(space);
    }
    trace!("Wrote keyring entry for {space}");
    Ok(())
  }
}

impl Default for KeyringVault {
  fn default() -> Self {
    Self::new(DEFAULT_SERVICE)
  }
}

impl CredentialVault for KeyringVault {
  fn set_default_credential(
    &self,
    credential: &Credential,
    space: &ProtectionSpace,
    persistence: Persistence,
  ) -> Result<(), VaultError> {
    self.write(credential, space, persistence, true)
  }

  fn add_credential(
    &self,
    credential: &Credential,
    space: &ProtectionSpace,
    persistence: Persistence,
  ) -> Result<(), VaultError> {
    self.write(credential, space, persistence, false)
  }

  fn default_credential(&self, space: &ProtectionSpace) -> Result<Option<Credential>, VaultError> {
    if let Some(credential) = self.session.default_credential(space)? {
      return Ok(Some(credential));
    }

    let Some(user) = self.load_index(space)?.default else {
      return Ok(None);
    };
    Ok(
      self
        .read_secret(space, &user)?
        .map(|secret| Credential::new(user, secret)),
    )
  }

  fn all_credentials(&self, space: &ProtectionSpace) -> Result<Option<BTreeMap<String, Credential>>, VaultError> {
    let _guard = self.index_lock.lock();
    let mut index = self.load_index(space)?;
    let mut credentials = BTreeMap::new();
    let mut missing = Vec::new();

    for user in &index.users {
      match self.read_secret(space, user)? {
        Some(secret) => {
          credentials.insert(user.clone(), Credential::new(user.as_str(), secret));
        }
        None => missing.push(user.clone()),
      }
    }

    if !missing.is_empty() {
      debug!("Pruning {} keyring index entries with no stored secret for {space}", missing.len());
      for user in &missing {
        index.forget(user);
      }
      self.save_index(space, &index)?;
    }

    if let Some(session) = self.session.all_credentials(space)? {
      credentials.extend(session);
    }

    Ok((!credentials.is_empty()).then_some(credentials))
  }

  fn remove_credential(&self, credential: &Credential, space: &ProtectionSpace) -> Result<(), VaultError> {
    let _guard = self.index_lock.lock();
    self.session.remove_credential(credential, space)?;
    self.forget_permanent(space, &credential.user, false)
  }
}

fn backend(err: keyring::Error) -> VaultError {
  VaultError::Backend(err.to_string())
}

fn ignore_missing(result: keyring::Result<()>) -> Result<(), VaultError> {
  match result {
    Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
    Err(e) => Err(backend(e)),
  }
}

#[cfg(test)]
mod tests {
  use std::any::Any;
  use std::collections::HashMap;
  use std::sync::Arc;

  use keyring::credential::CredentialApi;

  use super::*;
  use crate::credentials::SupportedScheme;

  type Secrets = Arc<Mutex<HashMap<(String, String), Vec<u8>>>>;

  /// Keyring backend over one shared map, so entries built for the same
  /// service and user see each other's writes.
  #[derive(Debug, Default)]
  struct SharedKeyring {
    secrets: Secrets,
  }

  #[derive(Debug)]
  struct SharedEntry {
    secrets: Secrets,
    key: (String, String),
  }

  impl CredentialApi for SharedEntry {
    fn set_secret(&self, secret: &[u8]) -> keyring::Result<()> {
      self.secrets.lock().insert(self.key.clone(), secret.to_vec());
      Ok(())
    }

    fn get_secret(&self) -> keyring::Result<Vec<u8>> {
      self.secrets.lock().get(&self.key).cloned().ok_or(keyring::Error::NoEntry)
    }

    fn delete_credential(&self) -> keyring::Result<()> {
      self
        .secrets
        .lock()
        .remove(&self.key)
        .map(|_| ())
        .ok_or(keyring::Error::NoEntry)
    }

    fn as_any(&self) -> &dyn Any {
      self
    }
  }

  impl CredentialBuilderApi for SharedKeyring {
    fn build(&self, _target: Option<&str>, service: &str, user: &str) -> keyring::Result<Box<keyring::Credential>> {
      Ok(Box::new(SharedEntry {
        secrets: self.secrets.clone(),
        key: (service.to_string(), user.to_string()),
      }))
    }

    fn as_any(&self) -> &dyn Any {
      self
    }
  }

  fn vault() -> (KeyringVault, Secrets) {
    let secrets = Secrets::default();
    let builder = SharedKeyring {
      secrets: secrets.clone(),
    };
    (KeyringVault::with_builder("test", Box::new(builder)), secrets)
  }

  fn space() -> ProtectionSpace {
    ProtectionSpace::new("example.com", SupportedScheme::Https)
  }

  fn has_index_entry(secrets: &Secrets) -> bool {
    secrets
      .lock()
      .contains_key(&("test.index".to_string(), space().to_string()))
  }

  fn listed(vault: &KeyringVault) -> BTreeMap<String, String> {
    vault
      .all_credentials(&space())
      .unwrap()
      .unwrap_or_default()
      .into_iter()
      .map(|(user, credential)| (user, credential.secret))
      .collect()
  }

  #[test]
  fn test_service_names() {
    let vault = KeyringVault::new("acme");
    assert_eq!(vault.secret_service(&space()), "acme:https://example.com:443");
    assert_eq!(vault.index_service(), "acme.index");
    assert_eq!(KeyringVault::default().service(), DEFAULT_SERVICE);
  }

  #[test]
  fn test_index_decoding() {
    let index = SpaceIndex::decode(r#"{"users":["alice","bob"],"default":"bob"}"#).unwrap();
    assert_eq!(index.users.len(), 2);
    assert_eq!(index.default.as_deref(), Some("bob"));

    let index = SpaceIndex::decode(r#"{"users":[]}"#).unwrap();
    assert_eq!(index, SpaceIndex::default());
  }

  #[test]
  fn test_index_omits_missing_default() {
    let mut index = SpaceIndex::default();
    index.users.insert("alice".to_string());
    assert_eq!(index.encode().unwrap(), r#"{"users":["alice"]}"#);
  }

  #[test]
  fn test_corrupt_index_is_reported() {
    let err = SpaceIndex::decode("not json").unwrap_err();
    assert!(matches!(err, VaultError::Corrupt(_)));
  }

  #[test]
  fn test_corrupt_index_entry_fails_reads() {
    let (vault, secrets) = vault();
    secrets.lock().insert(
      ("test.index".to_string(), space().to_string()),
      b"not json".to_vec(),
    );

    let err = vault.all_credentials(&space()).unwrap_err();
    assert!(matches!(err, VaultError::Corrupt(_)));
  }

  #[test]
  fn test_permanent_store_and_list() {
    let (vault, secrets) = vault();
    vault
      .add_credential(&Credential::new("alice", "a1"), &space(), Persistence::Permanent)
      .unwrap();
    vault
      .set_default_credential(&Credential::new("bob", "b1"), &space(), Persistence::Permanent)
      .unwrap();

    assert_eq!(
      listed(&vault),
      BTreeMap::from([("alice".to_string(), "a1".to_string()), ("bob".to_string(), "b1".to_string())])
    );
    assert_eq!(
      vault.default_credential(&space()).unwrap(),
      Some(Credential::new("bob", "b1"))
    );

    let index = vault.load_index(&space()).unwrap();
    assert_eq!(index.users.iter().collect::<Vec<_>>(), vec!["alice", "bob"]);
    assert_eq!(index.default.as_deref(), Some("bob"));
    assert_eq!(
      secrets.lock()[&("test:https://example.com:443".to_string(), "alice".to_string())],
      b"a1"
    );
  }

  #[test]
  fn test_permanent_restore_overwrites_secret() {
    let (vault, _) = vault();
    vault
      .add_credential(&Credential::new("alice", "old"), &space(), Persistence::Permanent)
      .unwrap();
    vault
      .add_credential(&Credential::new("alice", "new"), &space(), Persistence::Permanent)
      .unwrap();

    assert_eq!(listed(&vault), BTreeMap::from([("alice".to_string(), "new".to_string())]));
  }

  #[test]
  fn test_remove_permanent_clears_default_and_index() {
    let (vault, secrets) = vault();
    let alice = Credential::new("alice", "a1");
    let bob = Credential::new("bob", "b1");
    vault.set_default_credential(&alice, &space(), Persistence::Permanent).unwrap();
    vault.add_credential(&bob, &space(), Persistence::Permanent).unwrap();

    vault.remove_credential(&alice, &space()).unwrap();

    assert_eq!(vault.default_credential(&space()).unwrap(), None);
    assert_eq!(listed(&vault), BTreeMap::from([("bob".to_string(), "b1".to_string())]));
    assert!(has_index_entry(&secrets));

    vault.remove_credential(&bob, &space()).unwrap();

    assert_eq!(vault.all_credentials(&space()).unwrap(), None);
    assert!(!has_index_entry(&secrets));
    assert!(secrets.lock().is_empty());
  }

  #[test]
  fn test_permanent_restore_replaces_session_credential() {
    let (vault, _) = vault();
    vault
      .add_credential(&Credential::new("alice", "old"), &space(), Persistence::ForSession)
      .unwrap();
    vault
      .add_credential(&Credential::new("zed", "p"), &space(), Persistence::Permanent)
      .unwrap();
    vault
      .add_credential(&Credential::new("alice", "new"), &space(), Persistence::Permanent)
      .unwrap();

    assert_eq!(
      listed(&vault),
      BTreeMap::from([("alice".to_string(), "new".to_string()), ("zed".to_string(), "p".to_string())])
    );
  }

  #[test]
  fn test_session_restore_replaces_permanent_credential() {
    let (vault, secrets) = vault();
    vault
      .add_credential(&Credential::new("alice", "old"), &space(), Persistence::Permanent)
      .unwrap();
    vault
      .add_credential(&Credential::new("alice", "new"), &space(), Persistence::UntilProcessExit)
      .unwrap();

    assert_eq!(listed(&vault), BTreeMap::from([("alice".to_string(), "new".to_string())]));
    assert!(!has_index_entry(&secrets));
  }

  #[test]
  fn test_permanent_default_replaces_session_default() {
    let (vault, _) = vault();
    vault
      .set_default_credential(&Credential::new("alice", "a1"), &space(), Persistence::ForSession)
      .unwrap();
    vault
      .set_default_credential(&Credential::new("bob", "b1"), &space(), Persistence::Permanent)
      .unwrap();

    assert_eq!(
      vault.default_credential(&space()).unwrap(),
      Some(Credential::new("bob", "b1"))
    );
    assert_eq!(listed(&vault).len(), 2);
  }

  #[test]
  fn test_session_default_replaces_permanent_default() {
    let (vault, _) = vault();
    vault
      .set_default_credential(&Credential::new("bob", "b1"), &space(), Persistence::Permanent)
      .unwrap();
    vault
      .set_default_credential(&Credential::new("alice", "a1"), &space(), Persistence::ForSession)
      .unwrap();

    assert_eq!(vault.load_index(&space()).unwrap().default, None);
    assert_eq!(
      vault.default_credential(&space()).unwrap(),
      Some(Credential::new("alice", "a1"))
    );
  }

  #[test]
  fn test_default_survives_moving_between_layers() {
    let (vault, _) = vault();
    vault
      .set_default_credential(&Credential::new("alice", "a1"), &space(), Persistence::Permanent)
      .unwrap();
    vault
      .add_credential(&Credential::new("alice", "a2"), &space(), Persistence::ForSession)
      .unwrap();
    assert_eq!(
      vault.default_credential(&space()).unwrap(),
      Some(Credential::new("alice", "a2"))
    );

    vault
      .add_credential(&Credential::new("alice", "a3"), &space(), Persistence::Permanent)
      .unwrap();
    assert_eq!(
      vault.default_credential(&space()).unwrap(),
      Some(Credential::new("alice", "a3"))
    );
  }

  #[test]
  fn test_missing_secret_is_pruned_from_index() {
    let (vault, secrets) = vault();
    vault
      .add_credential(&Credential::new("alice", "a1"), &space(), Persistence::Permanent)
      .unwrap();
    vault
      .set_default_credential(&Credential::new("bob", "b1"), &space(), Persistence::Permanent)
      .unwrap();
    secrets
      .lock()
      .remove(&("test:https://example.com:443".to_string(), "bob".to_string()));

    assert_eq!(listed(&vault), BTreeMap::from([("alice".to_string(), "a1".to_string())]));

    let index = vault.load_index(&space()).unwrap();
    assert_eq!(index.users.iter().collect::<Vec<_>>(), vec!["alice"]);
    assert_eq!(index.default, None);
  }

  #[test]
  fn test_index_without_secrets_is_deleted() {
    let (vault, secrets) = vault();
    vault
      .add_credential(&Credential::new("alice", "a1"), &space(), Persistence::Permanent)
      .unwrap();
    secrets
      .lock()
      .remove(&("test:https://example.com:443".to_string(), "alice".to_string()));

    assert_eq!(vault.all_credentials(&space()).unwrap(), None);
    assert!(!has_index_entry(&secrets));
  }

  #[test]
  fn test_concurrent_adds_keep_every_user() {
    let (vault, _) = vault();
    let vault = Arc::new(vault);

    let handles: Vec<_> = (0..8)
      .map(|i| {
        let vault = vault.clone();
        std::thread::spawn(move || {
          vault
            .add_credential(&Credential::new(format!("user-{i}"), "t"), &space(), Persistence::Permanent)
            .unwrap();
        })
      })
      .collect();
    for handle in handles {
      handle.join().unwrap();
    }

    assert_eq!(listed(&vault).len(), 8);
    assert_eq!(vault.load_index(&space()).unwrap().users.len(), 8);
  }

  #[test]
  fn test_session_credentials_are_listed() {
    let (vault, secrets) = vault();
    vault
      .add_credential(&Credential::new("me@gmail.com", "1234"), &space(), Persistence::ForSession)
      .unwrap();

    let all = vault.all_credentials(&space()).unwrap().unwrap();
    assert_eq!(all["me@gmail.com"].secret, "1234");
    assert!(secrets.lock().is_empty());
  }

  #[test]
  fn test_never_is_discarded() {
    let (vault, secrets) = vault();
    vault
      .add_credential(&Credential::new("alice", "a1"), &space(), Persistence::Never)
      .unwrap();

    assert_eq!(vault.all_credentials(&space()).unwrap(), None);
    assert!(secrets.lock().is_empty());
  }

  #[test]
  fn test_remove_session_credential() {
    let (vault, _) = vault();
    let cred = Credential::new("alice", "a1");
    vault.add_credential(&cred, &space(), Persistence::ForSession).unwrap();
    vault.remove_credential(&cred, &space()).unwrap();

    assert_eq!(vault.all_credentials(&space()).unwrap(), None);
  }
}
