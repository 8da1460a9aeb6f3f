//! Credential resolution for API-calling commands.
//!
//! Sources are tried in a fixed order and the first one that supplies all of
//! shop name, API key and API password wins. Fields are never mixed across
//! sources: a shop name from the environment is ignored if the API key only
//! comes from a flag.
//!
//! 1. Environment variables ([`CredentialInput::from_env`])
//! 2. Command-line flags
//! 3. A named profile in the profile store, if the store file exists

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::debug;

use crate::config::{ENV_APIKEY, ENV_PASSWORD, ENV_SHOPNAME};
use crate::store::{ProfileStore, StoreError};

/// Errors that can occur while resolving credentials.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No source supplied a complete set of credentials.
    #[error("unable to load credentials from environment, flags or {config}")]
    Unresolved { config: String },

    /// The store exists but the profile selector is incomplete.
    #[error("config filename and profile required: given {config:?} {profile:?}")]
    MissingSelector { config: String, profile: String },

    /// The selected profile is not in the store.
    #[error("no profile {profile} in {config}")]
    ProfileMissing { profile: String, config: String },

    /// The selected profile lacks one or more credential fields.
    #[error("profile {profile} in {config} must set shopname, apikey and password")]
    IncompleteProfile { profile: String, config: String },

    /// The store could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Where the resolved credentials came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    Flags,
    Profile { name: String },
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Environment => write!(f, "environment variables"),
            Self::Flags => write!(f, "cli flags"),
            Self::Profile { name } => write!(f, "profile {name}"),
        }
    }
}

/// Shop credentials for the current invocation.
///
/// Implements `Debug` manually to redact the API password.
#[derive(Clone)]
pub struct Credentials {
    shop_name: String,
    api_key: String,
    api_password: SecretString,
    source: CredentialSource,
}

impl Credentials {
    /// Create credentials from already validated fields.
    #[must_use]
    pub fn new(
        shop_name: impl Into<String>,
        api_key: impl Into<String>,
        api_password: impl Into<String>,
        source: CredentialSource,
    ) -> Self {
        Self {
            shop_name: shop_name.into(),
            api_key: api_key.into(),
            api_password: SecretString::from(api_password.into()),
            source,
        }
    }

    /// Shop name as supplied by the user.
    #[must_use]
    pub fn shop_name(&self) -> &str {
        &self.shop_name
    }

    /// Private app API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Private app API password.
    #[must_use]
    pub const fn api_password(&self) -> &SecretString {
        &self.api_password
    }

    /// Source these credentials were resolved from.
    #[must_use]
    pub const fn source(&self) -> &CredentialSource {
        &self.source
    }

    /// Shop host name.
    ///
    /// A bare shop name maps to `<shop>.myshopify.com`; anything containing a
    /// dot is taken to already be a domain.
    #[must_use]
    pub fn host(&self) -> String {
        if self.shop_name.contains('.') {
            self.shop_name.clone()
        } else {
            format!("{}.myshopify.com", self.shop_name)
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("shop_name", &self.shop_name)
            .field("api_key", &self.api_key)
            .field("api_password", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

impl PartialEq for Credentials {
    fn eq(&self, other: &Self) -> bool {
        self.shop_name == other.shop_name
            && self.api_key == other.api_key
            && self.api_password.expose_secret() == other.api_password.expose_secret()
            && self.source == other.source
    }
}

/// Possibly partial credentials from one source.
#[derive(Debug, Clone, Default)]
pub struct CredentialInput {
    pub shop_name: Option<String>,
    pub api_key: Option<String>,
    pub api_password: Option<String>,
}

impl CredentialInput {
    /// Read `SHOPNADO_SHOPNAME`, `SHOPNADO_APIKEY` and `SHOPNADO_PASSWORD`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            shop_name: std::env::var(ENV_SHOPNAME).ok(),
            api_key: std::env::var(ENV_APIKEY).ok(),
            api_password: std::env::var(ENV_PASSWORD).ok(),
        }
    }

    fn complete(&self, source: CredentialSource) -> Option<Credentials> {
        let shop_name = self.shop_name.as_deref().filter(|s| !s.is_empty())?;
        let api_key = self.api_key.as_deref().filter(|s| !s.is_empty())?;
        let api_password = self.api_password.as_deref().filter(|s| !s.is_empty())?;
        Some(Credentials::new(shop_name, api_key, api_password, source))
    }
}

/// Store file and profile name to fall back to.
#[derive(Debug, Clone)]
pub struct ProfileSelector {
    /// Store path as given on the command line (may start with `~/`).
    pub config: String,
    /// Profile name within the store.
    pub profile: String,
}

/// Resolve the credentials for this invocation.
///
/// # Errors
///
/// Returns `ResolveError::Unresolved` if neither `env` nor `flags` is
/// complete and the store file does not exist. When the store exists, returns
/// the store, lookup or completeness error for the selected profile.
pub fn resolve(
    env: &CredentialInput,
    flags: &CredentialInput,
    selector: &ProfileSelector,
) -> Result<Credentials, ResolveError> {
    if let Some(credentials) = env.complete(CredentialSource::Environment) {
        debug!("Loading shop credentials from environment variables");
        return Ok(credentials);
    }

    if let Some(credentials) = flags.complete(CredentialSource::Flags) {
        debug!("Loading shop credentials from cli flags");
        return Ok(credentials);
    }

    let store = ProfileStore::open(&selector.config)?;
    if !store.exists() {
        return Err(ResolveError::Unresolved {
            config: selector.config.clone(),
        });
    }

    debug!(config = %selector.config, "Loading shop credentials from config file");
    from_store(&store, selector)
}

fn from_store(store: &ProfileStore, selector: &ProfileSelector) -> Result<Credentials, ResolveError> {
    if selector.config.is_empty() || selector.profile.is_empty() {
        return Err(ResolveError::MissingSelector {
            config: selector.config.clone(),
            profile: selector.profile.clone(),
        });
    }

    let profile = store
        .load()?
        .remove(&selector.profile)
        .ok_or_else(|| ResolveError::ProfileMissing {
            profile: selector.profile.clone(),
            config: selector.config.clone(),
        })?;

    if !profile.is_complete() {
        return Err(ResolveError::IncompleteProfile {
            profile: selector.profile.clone(),
            config: selector.config.clone(),
        });
    }

    Ok(Credentials::new(
        profile.shop_name,
        profile.api_key,
        profile.api_password,
        CredentialSource::Profile {
            name: selector.profile.clone(),
        },
    ))
}
