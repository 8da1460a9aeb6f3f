//! Shopnado - manage Shopify webhooks and local credential profiles.
//!
//! The `shopnado` binary is a thin dispatcher over this library:
//!
//! - [`store`] - YAML-backed profile store (`~/.shopnado/config.yaml`)
//! - [`resolver`] - picks the shop credentials for one invocation
//! - [`shopify`] - Admin REST API client for the `webhook` resource
//! - [`commands`] - the `profile` and `webhook` command handlers
//!
//! # Credential precedence
//!
//! 1. `SHOPNADO_SHOPNAME`, `SHOPNADO_APIKEY`, `SHOPNADO_PASSWORD`
//! 2. `--shopname`, `--apikey`, `--password`
//! 3. the `--profile` entry of the `--config` store file

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod commands;
pub mod config;
pub mod error;
pub mod resolver;
pub mod shopify;
pub mod store;

pub use error::CliError;
pub use resolver::{CredentialInput, CredentialSource, Credentials, ProfileSelector, ResolveError};
pub use store::{ProfileMap, ProfileStore, StoreError};
