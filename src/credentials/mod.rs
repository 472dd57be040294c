//! Credential storage for HTTP(S) origins.
//!
//! Tokens are filed in a [`CredentialVault`] under the [`ProtectionSpace`]
//! derived from a URL (host, port, transport security, auth method). The
//! production vault is the OS keyring; tests swap in a [`MemoryVault`].
//!
//! ```no_run
//! use credential_store::credentials::{CredentialStore, Persistence, TokenStore};
//! use url::Url;
//!
//! let store = CredentialStore::os_default("my-app");
//! let url = Url::parse("https://api.example.com").unwrap();
//! store
//!   .store_token("api-token", "me@example.com", &url, true, Some(Persistence::Permanent))
//!   .unwrap();
//! assert_eq!(store.tokens(&url).unwrap()["me@example.com"], "api-token");
//! ```

mod error;
mod keyring_vault;
mod memory;
mod protection_space;
mod scheme;
mod store;
mod types;
mod vault;

pub use error::{CredentialError, VaultError};
pub use keyring_vault::{DEFAULT_SERVICE, KeyringVault};
pub use memory::MemoryVault;
pub use protection_space::{AuthMethod, ProtectionSpace};
pub use scheme::SupportedScheme;
pub use store::{CredentialStore, TokenStore};
pub use types::{Credential, Persistence};
pub use vault::CredentialVault;
