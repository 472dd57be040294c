//! `credential-store list`: show the tokens stored for an origin.

use std::collections::BTreeMap;

use unicode_width::UnicodeWidthStr;
use url::Url;

use super::{fail, mask_token};
use crate::color::ColorScheme;
use crate::credentials::{CredentialError, ProtectionSpace, TokenStore};

/// Everything `list` prints for one origin.
#[derive(Debug)]
struct Listing {
  space: ProtectionSpace,
  tokens: BTreeMap<String, String>,
  default_user: Option<String>,
}

fn load_listing(store: &impl TokenStore, url: &Url) -> Result<Listing, CredentialError> {
  let space = ProtectionSpace::for_url(url)?;
  let tokens = store.tokens(url)?;
  let default_user = store.default_credential(url)?.map(|credential| credential.user);
  Ok(Listing {
    space,
    tokens,
    default_user,
  })
}

/// List the tokens stored for the origin of `url`.
///
/// # Arguments
/// * `json` - Print a JSON object of user to token instead of a table.
/// * `show_secrets` - Print tokens verbatim rather than masked.
pub(crate) fn handle_list_command(
  store: &impl TokenStore,
  url: &Url,
  json: bool,
  show_secrets: bool,
  colors: &ColorScheme,
) {
  let listing = match load_listing(store, url) {
    Ok(listing) => listing,
    Err(e) => fail("list tokens", &e, colors),
  };

  if json {
    println!("{}", render_json(&listing.tokens, show_secrets));
  } else {
    print!("{}", render_table(&listing, show_secrets, colors));
  }
}

fn render_json(tokens: &BTreeMap<String, String>, show_secrets: bool) -> String {
  let shown: BTreeMap<&str, String> = tokens
    .iter()
    .map(|(user, token)| {
      let token = if show_secrets { token.clone() } else { mask_token(token) };
      (user.as_str(), token)
    })
    .collect();
  serde_json::to_string_pretty(&shown).unwrap_or_else(|_| "{}".to_string())
}

fn render_table(listing: &Listing, show_secrets: bool, colors: &ColorScheme) -> String {
  if listing.tokens.is_empty() {
    return format!("{} No tokens stored for {}\n", colors.info("ℹ"), colors.link(&listing.space));
  }

  let width = listing.tokens.keys().map(|user| user.width()).max().unwrap_or(0);
  let mut out = format!("{} {}\n", colors.emphasis("Tokens for"), colors.link(&listing.space));

  for (user, token) in &listing.tokens {
    let marker = if listing.default_user.as_deref() == Some(user.as_str()) {
      colors.success("*")
    } else {
      " ".to_string()
    };
    let padding = " ".repeat(width - user.width());
    let token = if show_secrets {
      colors.code(token)
    } else {
      colors.dimmed(mask_token(token))
    };
    out.push_str(&format!("  {marker} {user}{padding}  {token}\n"));
  }

  if listing.default_user.is_some() {
    out.push_str(&format!("\n{}\n", colors.dimmed("* default credential")));
  }
  out
}
