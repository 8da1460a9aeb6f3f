//! Shopify Admin REST API client.
//!
//! Only the `webhook` resource is covered. Requests authenticate with HTTP
//! basic auth using a private app's API key and password.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopnado_cli::shopify::AdminClient;
//! use shopnado_core::ApiVersion;
//!
//! let client = AdminClient::new(&credentials, ApiVersion::Stable)?;
//!
//! for webhook in client.list_webhooks().await? {
//!     println!("{:?} - {}", webhook.id, webhook.topic);
//! }
//! ```

mod client;
pub mod topics;

pub use client::AdminClient;

use thiserror::Error;

/// Errors that can occur when interacting with the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The shop host or resource path does not form a valid URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Shopify answered with a non-success status.
    #[error("{message} ({status})")]
    Api { status: u16, message: String },

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// An update was attempted on a webhook without an ID.
    #[error("webhook has no id")]
    MissingId,

    /// Topic discovery could not produce a topic list.
    #[error("topic discovery failed: {0}")]
    TopicDiscovery(String),
}

impl ShopifyError {
    /// Whether this is a 404 from Shopify.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

/// Flatten a Shopify error body into one line.
///
/// Shopify reports failures as `{"errors": ...}` where the value is a
/// string, a list of strings, or an object of field name to messages.
/// Anything else is returned trimmed, or replaced by `fallback` when empty.
pub(crate) fn error_message(body: &str, fallback: &str) -> String {
    let errors = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|mut v| v.get_mut("errors").map(serde_json::Value::take));

    let message = match errors {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Array(items)) => join_messages(&items),
        Some(serde_json::Value::Object(fields)) => fields
            .iter()
            .map(|(field, messages)| match messages {
                serde_json::Value::Array(items) => format!("{field}: {}", join_messages(items)),
                other => format!("{field}: {}", value_text(other)),
            })
            .collect::<Vec<_>>()
            .join("; "),
        Some(other) => value_text(&other),
        None => body.trim().to_owned(),
    };

    if message.is_empty() {
        fallback.to_owned()
    } else {
        message
    }
}

fn join_messages(items: &[serde_json::Value]) -> String {
    items.iter().map(value_text).collect::<Vec<_>>().join(", ")
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
