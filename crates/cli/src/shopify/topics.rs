//! Best-effort discovery of the webhook topics a shop accepts.
//!
//! The Admin REST API has no endpoint listing webhook topics. When a webhook
//! is created with an unknown topic, though, the validation error names every
//! allowed topic. Discovery submits such a probe and scrapes `resource/event`
//! names out of the error text.
//!
//! This depends on the wording of Shopify's error message and can stop
//! working without notice. It never guesses: a probe that is unexpectedly
//! accepted, or an error without any topic names, is reported as
//! [`ShopifyError::TopicDiscovery`].

use std::sync::LazyLock;

use regex::Regex;
use shopnado_core::{ApiVersion, Webhook, WebhookFormat};
use tracing::{debug, warn};

use super::{AdminClient, ShopifyError};

/// API versions probed by `webhook topics --all`.
pub const KNOWN_API_VERSIONS: &[&str] = &[
    "stable", "2019-04", "2019-07", "2019-10", "2020-01", "2020-04",
];

const PROBE_ADDRESS: &str = "https://asdf.com";
const PROBE_TOPIC: &str = "asdf/asdf";
const UNPROCESSABLE_ENTITY: u16 = 422;

/// Regex for matching `resource/event` topic names.
static TOPIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z_]+/[a-z_]+").expect("Invalid regex"));

/// Every known API version, in probe order.
#[must_use]
pub fn known_versions() -> Vec<ApiVersion> {
    KNOWN_API_VERSIONS
        .iter()
        .filter_map(|v| ApiVersion::parse(v).ok())
        .collect()
}

/// Extract sorted, de-duplicated topic names from an error message.
#[must_use]
pub fn extract_topics(message: &str) -> Vec<String> {
    let mut topics: Vec<String> = TOPIC_RE
        .find_iter(message)
        .map(|m| m.as_str().trim().to_owned())
        .filter(|t| t != PROBE_TOPIC)
        .collect();
    topics.sort();
    topics.dedup();
    topics
}

/// Discover the webhook topics allowed for `client`'s API version.
///
/// # Errors
///
/// Returns the underlying error if the probe fails for any reason other than
/// a 422 validation error, and `ShopifyError::TopicDiscovery` if the probe is
/// accepted or the error names no topics.
pub async fn discover_topics(client: &AdminClient) -> Result<Vec<String>, ShopifyError> {
    let probe = Webhook::new(PROBE_ADDRESS, PROBE_TOPIC, WebhookFormat::Json);

    match client.create_webhook(&probe).await {
        Err(ShopifyError::Api {
            status: UNPROCESSABLE_ENTITY,
            message,
        }) => {
            debug!(%message, "Topic probe rejected");
            let topics = extract_topics(&message);
            if topics.is_empty() {
                return Err(ShopifyError::TopicDiscovery(format!(
                    "no topics found in response for api version {}",
                    client.api_version()
                )));
            }
            Ok(topics)
        }
        Err(other) => Err(other),
        Ok(created) => {
            if let Some(id) = created.id
                && let Err(e) = client.delete_webhook(id).await
            {
                warn!(webhook_id = %id, error = %e, "Failed to remove topic probe webhook");
            }
            Err(ShopifyError::TopicDiscovery(format!(
                "probe topic {PROBE_TOPIC} was accepted for api version {}",
                client.api_version()
            )))
        }
    }
}
