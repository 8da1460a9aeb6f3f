//! Core types for Shopnado.
//!
//! This module provides type-safe wrappers for the domain concepts shared
//! between the profile store and the webhook commands.

pub mod api_version;
pub mod id;
pub mod profile;
pub mod webhook;

pub use api_version::{ApiVersion, ApiVersionError};
pub use id::*;
pub use profile::Profile;
pub use webhook::{Webhook, WebhookFormat, WebhookFormatError};
