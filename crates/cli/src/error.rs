//! Unified error handling for the CLI.

use thiserror::Error;

use crate::resolver::ResolveError;
use crate::shopify::ShopifyError;
use crate::store::StoreError;

/// Error returned by every command handler.
///
/// Component errors are passed through unchanged so the message printed by
/// `main` is the one the component produced.
#[derive(Debug, Error)]
pub enum CliError {
    /// Profile store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No credentials could be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Shopify API operation failed.
    #[error(transparent)]
    Shopify(#[from] ShopifyError),

    /// A required argument was missing or malformed.
    #[error("{0}")]
    InvalidInput(String),
}
