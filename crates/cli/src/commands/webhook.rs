//! Webhook subscription commands.
//!
//! # Usage
//!
//! ```bash
//! shopnado webhook list
//! shopnado webhook create -a https://example.com/hooks -t orders/create
//! shopnado webhook read 1047897672
//! shopnado webhook update 1047897672 -a https://example.com/v2/hooks
//! shopnado webhook delete 1047897672
//! shopnado webhook delete --all
//! shopnado webhook topics 2020-04
//! ```
//!
//! Every command needs shop credentials; see [`crate::resolver`].

use shopnado_core::{ApiVersion, Webhook, WebhookFormat, WebhookId};
use tracing::{error, info};

use crate::error::CliError;
use crate::shopify::topics::{self, KNOWN_API_VERSIONS};
use crate::shopify::{AdminClient, ShopifyError};

/// Fields to change on an existing webhook. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct WebhookChanges {
    pub address: Option<String>,
    pub topic: Option<String>,
    pub format: Option<WebhookFormat>,
}

impl WebhookChanges {
    const fn is_empty(&self) -> bool {
        self.address.is_none() && self.topic.is_none() && self.format.is_none()
    }

    fn apply(self, webhook: &mut Webhook) {
        if let Some(address) = self.address {
            webhook.address = address;
        }
        if let Some(topic) = self.topic {
            webhook.topic = topic;
        }
        if let Some(format) = self.format {
            webhook.format = format;
        }
    }
}

/// Outcome of deleting every webhook in a shop.
#[derive(Debug, Default)]
pub struct BulkDeleteReport {
    /// Webhooks that were deleted.
    pub deleted: Vec<WebhookId>,
    /// Webhooks whose deletion failed, with the reason.
    pub failed: Vec<(WebhookId, ShopifyError)>,
}

/// Topics allowed by one API version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTopics {
    pub api_version: ApiVersion,
    pub topics: Vec<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// List every webhook as `id - topic`.
///
/// # Errors
///
/// Returns the Shopify error if the request fails.
pub async fn list(client: &AdminClient) -> Result<Vec<Webhook>, CliError> {
    let webhooks = client.list_webhooks().await?;

    if webhooks.is_empty() {
        info!("no webhooks found");
    }
    for webhook in &webhooks {
        info!("{} - {}", display_id(webhook.id), webhook.topic);
    }

    Ok(webhooks)
}

/// Create a webhook.
///
/// # Errors
///
/// Returns `CliError::InvalidInput` if the address or topic is missing, or
/// the Shopify error if the request fails.
pub async fn create(
    client: &AdminClient,
    address: Option<String>,
    topic: Option<String>,
    format: WebhookFormat,
) -> Result<Webhook, CliError> {
    let (Some(address), Some(topic)) = (non_empty(address), non_empty(topic)) else {
        return Err(CliError::InvalidInput(
            "address, topic and format are all required to make a webhook".to_owned(),
        ));
    };

    let created = client
        .create_webhook(&Webhook::new(address, topic, format))
        .await?;
    info!("webhook created: {}", display_id(created.id));

    Ok(created)
}

/// Show one webhook as `id : topic - address`.
///
/// # Errors
///
/// Returns the Shopify error if the request fails.
pub async fn read(client: &AdminClient, id: WebhookId) -> Result<Webhook, CliError> {
    let webhook = client.get_webhook(id).await?;
    info!("{} : {} - {}", display_id(webhook.id), webhook.topic, webhook.address);
    Ok(webhook)
}

/// Change the address, topic or format of an existing webhook.
///
/// The webhook is fetched first so that unchanged fields keep their
/// current values.
///
/// # Errors
///
/// Returns `CliError::InvalidInput` if no change was given, or the Shopify
/// error if either request fails.
pub async fn update(
    client: &AdminClient,
    id: WebhookId,
    changes: WebhookChanges,
) -> Result<Webhook, CliError> {
    let changes = WebhookChanges {
        address: non_empty(changes.address),
        topic: non_empty(changes.topic),
        format: changes.format,
    };
    if changes.is_empty() {
        return Err(CliError::InvalidInput(
            "nothing to update: pass --address, --topic or --format".to_owned(),
        ));
    }

    let mut webhook = client.get_webhook(id).await?;
    changes.apply(&mut webhook);

    let updated = client.update_webhook(&webhook).await?;
    info!(
        "webhook updated {} : {} - {} ({})",
        display_id(updated.id),
        updated.topic,
        updated.address,
        updated.format
    );

    Ok(updated)
}

/// Delete one webhook.
///
/// # Errors
///
/// Returns the Shopify error if the request fails.
pub async fn delete(client: &AdminClient, id: WebhookId) -> Result<(), CliError> {
    client.delete_webhook(id).await?;
    info!("webhook deleted {id}");
    Ok(())
}

/// Delete every webhook in the shop.
///
/// A failed deletion is logged and the remaining webhooks are still
/// attempted; only a failure to list the webhooks is an error.
///
/// # Errors
///
/// Returns the Shopify error if the webhooks cannot be listed.
pub async fn delete_all(client: &AdminClient) -> Result<BulkDeleteReport, CliError> {
    let webhooks = client.list_webhooks().await?;
    let mut report = BulkDeleteReport::default();

    for id in webhooks.into_iter().filter_map(|w| w.id) {
        match client.delete_webhook(id).await {
            Ok(()) => {
                info!("webhook deleted {id}");
                report.deleted.push(id);
            }
            Err(e) => {
                error!("error deleting webhook {id}: {e}");
                report.failed.push((id, e));
            }
        }
    }

    Ok(report)
}

/// API versions to probe for `webhook topics`.
///
/// With `all`, every known version. Otherwise the requested version, or
/// `stable` when none is given.
///
/// # Errors
///
/// Returns `CliError::InvalidInput` if `version` is not a valid API version.
pub fn topic_versions(version: Option<&str>, all: bool) -> Result<Vec<ApiVersion>, CliError> {
    let requested = version.unwrap_or("stable");
    let parsed = ApiVersion::parse(requested).map_err(|_| {
        CliError::InvalidInput(format!(
            "invalid filter {requested}, allowed: {}",
            KNOWN_API_VERSIONS.join(" ")
        ))
    })?;

    if all {
        return Ok(topics::known_versions());
    }
    Ok(vec![parsed])
}

/// List the webhook topics each API version accepts.
///
/// Best effort: see [`topics`](crate::shopify::topics) for how the list is
/// obtained and when it fails.
///
/// # Errors
///
/// Returns the first discovery error.
pub async fn list_topics(
    client: &AdminClient,
    versions: &[ApiVersion],
) -> Result<Vec<VersionTopics>, CliError> {
    let mut results = Vec::with_capacity(versions.len());

    for api_version in versions {
        let versioned = client.with_api_version(api_version.clone());
        let topics = topics::discover_topics(&versioned).await?;
        results.push(VersionTopics {
            api_version: api_version.clone(),
            topics,
        });
    }

    match results.as_slice() {
        [single] => info!("{}", single.topics.join("\n")),
        many => {
            let blocks: Vec<String> = many
                .iter()
                .map(|v| format!("API: {}\n{}", v.api_version, v.topics.join("\n")))
                .collect();
            info!("{}", blocks.join("\n\n"));
        }
    }

    Ok(results)
}

fn display_id(id: Option<WebhookId>) -> String {
    id.map_or_else(|| "-".to_owned(), |id| id.to_string())
}
