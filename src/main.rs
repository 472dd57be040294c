//! credential-store - Keep HTTP(S) auth tokens in the OS credential vault
//!
//! This is the main entry point for the CLI application.

fn main() {
  credential_store::cli::run();
}
