//! credential-store library
//!
//! Stores, lists, and removes HTTP(S) auth tokens in a credential vault keyed
//! by protection space. The [`credentials`] module holds the store and its
//! vaults; the remaining modules back the `credential-store` binary.

pub mod cli;
pub mod color;
pub mod commands;
pub mod credentials;
