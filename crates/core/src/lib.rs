//! Shopnado Core - Shared types library.
//!
//! This crate provides the types used by the `shopnado` command-line tool:
//! - credential profiles as they are persisted in the profile store
//! - Shopify webhook records exchanged with the Admin REST API
//! - API version selection
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no file access,
//! no HTTP clients. Those live in `shopnado-cli`.
//!
//! # Modules
//!
//! - [`types`] - Profiles, webhooks, type-safe IDs and API versions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
