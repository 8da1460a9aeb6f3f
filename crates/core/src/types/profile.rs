//! Credential profile type.
//!
//! A profile is one named set of shop credentials. The name is the key of
//! the profile store map and is not repeated inside the value.

use serde::{Deserialize, Serialize};

/// Shop credentials as persisted in the profile store.
///
/// The on-disk field names (`shopname`, `apikey`, `password`) are part of the
/// store file format. Missing fields deserialize as empty strings so that a
/// hand-edited, partially filled profile still loads; such a profile is not
/// [complete](Profile::is_complete) and is rejected when credentials are
/// resolved.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Shopify shop name, e.g. `<shopname>.myshopify.com`
    #[serde(rename = "shopname", default)]
    pub shop_name: String,
    /// Private app API key
    #[serde(rename = "apikey", default)]
    pub api_key: String,
    /// Private app API password
    #[serde(rename = "password", default)]
    pub api_password: String,
}

impl Profile {
    /// Create a new profile from its three credential fields.
    #[must_use]
    pub fn new(
        shop_name: impl Into<String>,
        api_key: impl Into<String>,
        api_password: impl Into<String>,
    ) -> Self {
        Self {
            shop_name: shop_name.into(),
            api_key: api_key.into(),
            api_password: api_password.into(),
        }
    }

    /// Whether all three credential fields are non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.shop_name.is_empty() && !self.api_key.is_empty() && !self.api_password.is_empty()
    }
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("shop_name", &self.shop_name)
            .field("api_key", &self.api_key)
            .field("api_password", &"[REDACTED]")
            .finish()
    }
}
