//! Shopify webhook subscription types.
//!
//! Field names follow the Admin REST API `webhook` resource so the same type
//! is used for request and response bodies.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::WebhookId;

/// Errors that can occur when parsing a [`WebhookFormat`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid webhook format {0:?}: expected json or xml")]
pub struct WebhookFormatError(String);

/// Payload format Shopify uses when delivering a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WebhookFormat {
    #[default]
    Json,
    Xml,
}

impl std::fmt::Display for WebhookFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Xml => write!(f, "xml"),
        }
    }
}

impl std::str::FromStr for WebhookFormat {
    type Err = WebhookFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            _ => Err(WebhookFormatError(s.to_owned())),
        }
    }
}

/// A webhook subscription.
///
/// `id` and the timestamps are assigned by Shopify and are `None` on a
/// subscription that has not been created yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    /// Shopify-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<WebhookId>,
    /// HTTPS URL Shopify POSTs the event payload to.
    pub address: String,
    /// Event topic, e.g. `orders/create`.
    pub topic: String,
    /// Payload format.
    #[serde(default)]
    pub format: WebhookFormat,
    /// Optional subset of resource fields to include in the payload.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    /// Metafield namespaces to include in the payload.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metafield_namespaces: Vec<String>,
    /// API version used to serialize the payload.
    #[serde(default, skip_serializing)]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing)]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl Webhook {
    /// Build a new, not yet created subscription.
    #[must_use]
    pub fn new(address: impl Into<String>, topic: impl Into<String>, format: WebhookFormat) -> Self {
        Self {
            id: None,
            address: address.into(),
            topic: topic.into(),
            format,
            fields: Vec::new(),
            metafield_namespaces: Vec::new(),
            api_version: None,
            created_at: None,
            updated_at: None,
        }
    }
}
