//! `credential-store remove`: drop every token stored for an origin.

use super::fail;
use crate::color::ColorScheme;
use crate::credentials::TokenStore;

/// Remove all tokens stored for the origin of `url`.
///
/// Prints how many tokens were removed; removing from an empty origin is not
/// an error.
pub(crate) fn handle_remove_command(store: &impl TokenStore, url: &url::Url, quiet: bool, colors: &ColorScheme) {
  let removed = match store.tokens(url).and_then(|tokens| {
    store.remove_tokens(url)?;
    Ok(tokens.len())
  }) {
    Ok(count) => count,
    Err(e) => fail("remove tokens", &e, colors),
  };

  if quiet {
    return;
  }

  let origin = url.origin().ascii_serialization();
  if removed == 0 {
    println!("{} No tokens stored for {}", colors.info("ℹ"), colors.link(origin));
  } else {
    println!(
      "{} Removed {} token(s) for {}",
      colors.success("✓"),
      colors.number(removed),
      colors.link(origin)
    );
  }
}
