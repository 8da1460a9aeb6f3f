//! Credential profile management commands.
//!
//! # Usage
//!
//! ```bash
//! # List profiles
//! shopnado profile list
//!
//! # Create (or overwrite) a profile
//! shopnado profile create -n default -s my-shop -k <api key> -p <api password>
//!
//! # Show a profile, including its secrets
//! shopnado profile read -n default
//!
//! # Delete one profile, or the whole store file
//! shopnado profile delete -n default
//! shopnado profile delete --all
//!
//! # Edit the store file by hand
//! shopnado profile edit -e nano
//! ```

use shopnado_core::Profile;
use tracing::{info, warn};

use crate::error::CliError;
use crate::store::ProfileStore;

/// List every profile as `name [shopname]`.
///
/// # Errors
///
/// Returns an error if the store cannot be loaded.
pub fn list(config: &str) -> Result<Vec<(String, Profile)>, CliError> {
    let profiles = ProfileStore::open(config)?.list()?;

    for (name, profile) in &profiles {
        info!("{name} [{}]", profile.shop_name);
    }

    Ok(profiles)
}

/// Create or overwrite the profile `name`.
///
/// An incomplete profile only creates the store file; see
/// [`ProfileStore::create`]. Returns whether the profile was written.
///
/// # Errors
///
/// Returns an error if `name` is empty or the store cannot be written.
pub fn create(config: &str, name: &str, profile: Profile) -> Result<bool, CliError> {
    let store = ProfileStore::open(config)?;
    let written = store.create(name, profile)?;

    if written {
        info!("profile {name} saved to {config}");
    } else {
        warn!(
            "shopname, apikey and password are all required to save profile {name}; \
             use `shopnado profile edit` to fill in {config}"
        );
    }

    Ok(written)
}

/// Show the profile `name`, including its secrets.
///
/// # Errors
///
/// Returns an error if `name` is empty, the store cannot be loaded or the
/// profile does not exist.
pub fn read(config: &str, name: &str) -> Result<Profile, CliError> {
    let profile = ProfileStore::open(config)?.read(name)?;

    info!(
        "shopname: {}\napikey: {}\npassword: {}",
        profile.shop_name, profile.api_key, profile.api_password
    );

    Ok(profile)
}

/// Update a profile in place.
///
/// Not implemented: whether an update should merge individual fields or
/// require all three has not been decided. Use `create` to overwrite a
/// profile or `edit` to change the file by hand.
pub fn update(config: &str, name: Option<&str>) {
    warn!(
        profile = name.unwrap_or_default(),
        config, "profile update is not implemented; use `profile create` or `profile edit`"
    );
}

/// Delete the profile `name`.
///
/// # Errors
///
/// Returns an error if `name` is empty, the store cannot be loaded or
/// written, or the profile does not exist.
pub fn delete(config: &str, name: &str) -> Result<Profile, CliError> {
    let store = ProfileStore::open(config)?;
    info!("deleting profile {name} from {config}");
    Ok(store.delete(name)?)
}

/// Delete the whole store file.
///
/// # Errors
///
/// Returns an error if the file does not exist or cannot be removed.
pub fn delete_all(config: &str) -> Result<(), CliError> {
    let store = ProfileStore::open(config)?;
    info!("deleting all profiles in {config}");
    Ok(store.clear_all()?)
}

/// Open the store file in `editor`.
///
/// # Errors
///
/// Returns an error if the editor cannot be started or exits unsuccessfully.
pub fn edit(config: &str, editor: &str) -> Result<(), CliError> {
    Ok(ProfileStore::open(config)?.edit(editor)?)
}
