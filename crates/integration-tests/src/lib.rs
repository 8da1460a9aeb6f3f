//! Integration tests for Shopnado.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopnado-integration-tests
//! ```
//!
//! No shop is needed: the Admin REST API is served by a local `mockito`
//! server and profile stores live in temporary directories.
//!
//! # Test Categories
//!
//! - `profile_store` - store file scenarios and the profile commands
//! - `credential_resolution` - source precedence against real store files
//! - `webhook_commands` - webhook commands against a mock Admin API

use std::path::PathBuf;

use shopnado_cli::shopify::AdminClient;
use shopnado_cli::{CredentialSource, Credentials, ProfileStore};
use shopnado_core::ApiVersion;
use tempfile::TempDir;

/// `Authorization` header sent for [`test_credentials`] (`key:pw`).
pub const TEST_AUTHORIZATION: &str = "Basic a2V5OnB3";

/// A profile store in its own temporary directory.
///
/// The directory is removed when this value is dropped.
pub struct TempStore {
    _dir: TempDir,
    path: PathBuf,
}

impl TempStore {
    /// A store path whose file does not exist yet.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("config.yaml");
        Self { _dir: dir, path }
    }

    /// The store path as it would be passed to `--config`.
    #[must_use]
    pub fn config(&self) -> String {
        self.path.display().to_string()
    }

    /// Store handle for direct assertions.
    #[must_use]
    pub fn store(&self) -> ProfileStore {
        ProfileStore::at(&self.path)
    }
}

impl Default for TempStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Credentials matching [`TEST_AUTHORIZATION`].
#[must_use]
pub fn test_credentials() -> Credentials {
    Credentials::new("test-shop", "key", "pw", CredentialSource::Flags)
}

/// An Admin client pointed at a mock server.
///
/// # Panics
///
/// Panics if `server_url` is not a valid URL.
#[must_use]
pub fn mock_client(server_url: &str) -> AdminClient {
    let base_url = url::Url::parse(server_url).expect("mock server url");
    AdminClient::with_base_url(&test_credentials(), ApiVersion::Stable, base_url)
}
