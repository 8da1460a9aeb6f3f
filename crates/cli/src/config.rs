//! Defaults and environment variable names.
//!
//! # Environment Variables
//!
//! - `SHOPNADO_SHOPNAME` - Shopify shop name (e.g. `my-shop` for `my-shop.myshopify.com`)
//! - `SHOPNADO_APIKEY` - Private app API key
//! - `SHOPNADO_PASSWORD` - Private app API password
//!
//! All three must be set for the environment to be used. A `.env` file in the
//! working directory is loaded before they are read.

use std::path::PathBuf;

use crate::store::StoreError;

pub const ENV_SHOPNAME: &str = "SHOPNADO_SHOPNAME";
pub const ENV_APIKEY: &str = "SHOPNADO_APIKEY";
pub const ENV_PASSWORD: &str = "SHOPNADO_PASSWORD";

/// Profile store used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "~/.shopnado/config.yaml";

/// Profile used when `--profile` is not given.
pub const DEFAULT_PROFILE: &str = "default";

/// Editor launched by `profile edit` when `--editor` is not given.
pub const DEFAULT_EDITOR: &str = "vim";

/// Expand a leading `~` or `~/` to the current user's home directory.
///
/// Any other path is returned unchanged.
///
/// # Errors
///
/// Returns `StoreError::NoHomeDir` if the path needs expanding and the home
/// directory cannot be determined.
pub fn expand_home(path: &str) -> Result<PathBuf, StoreError> {
    let rest = match path {
        "~" => "",
        _ => match path.strip_prefix("~/") {
            Some(rest) => rest,
            None => return Ok(PathBuf::from(path)),
        },
    };

    let home = dirs::home_dir().ok_or(StoreError::NoHomeDir)?;
    Ok(home.join(rest))
}
