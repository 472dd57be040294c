//! The fixed set of URL schemes credentials can be stored for.

use std::fmt;

use url::Url;

/// URL schemes with a well-defined protection space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedScheme {
  Http,
  Https,
}

impl SupportedScheme {
  /// Every supported scheme, in declaration order.
  pub const ALL: [SupportedScheme; 2] = [SupportedScheme::Http, SupportedScheme::Https];

  /// Parse a raw scheme string. Matching is exact, as `Url` already
  /// lowercases schemes during parsing.
  pub fn parse(scheme: &str) -> Option<Self> {
    match scheme {
      "http" => Some(Self::Http),
      "https" => Some(Self::Https),
      _ => None,
    }
  }

  /// The supported scheme of `url`, if any.
  pub fn of(url: &Url) -> Option<Self> {
    Self::parse(url.scheme())
  }

  /// Whether traffic under this scheme is protected by TLS.
  pub fn is_secure(self) -> bool {
    match self {
      Self::Http => false,
      Self::Https => true,
    }
  }

  /// Port used for the protection space. Explicit URL ports are not
  /// consulted.
  pub fn default_port(self) -> u16 {
    if self.is_secure() { 443 } else { 80 }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Http => "http",
      Self::Https => "https",
    }
  }
}

impl fmt::Display for SupportedScheme {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
