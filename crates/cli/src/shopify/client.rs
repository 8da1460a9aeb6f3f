//! Admin REST client for the `webhook` resource.

use std::sync::Arc;

use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use shopnado_core::{ApiVersion, Webhook, WebhookId};
use tracing::{debug, instrument};
use url::Url;

use crate::resolver::Credentials;

use super::{ShopifyError, error_message};

/// Shopify Admin REST API client bound to one shop and one API version.
///
/// Cheap to clone; clones share the underlying HTTP connection pool.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
    api_version: ApiVersion,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
    api_password: SecretString,
}

#[derive(Debug, Deserialize)]
struct WebhookEnvelope {
    webhook: Webhook,
}

#[derive(Debug, Deserialize)]
struct WebhookListEnvelope {
    webhooks: Vec<Webhook>,
}

#[derive(Debug, Serialize)]
struct WebhookRequest<'a> {
    webhook: &'a Webhook,
}

impl AdminClient {
    /// Create a client for `https://<shop host>`.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Url` if the shop name does not form a valid host.
    pub fn new(credentials: &Credentials, api_version: ApiVersion) -> Result<Self, ShopifyError> {
        let base_url = Url::parse(&format!("https://{}/", credentials.host()))?;
        Ok(Self::with_base_url(credentials, api_version, base_url))
    }

    /// Create a client against an explicit base URL (e.g. a local mock server).
    #[must_use]
    pub fn with_base_url(credentials: &Credentials, api_version: ApiVersion, base_url: Url) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                base_url,
                api_key: credentials.api_key().to_owned(),
                api_password: credentials.api_password().clone(),
            }),
            api_version,
        }
    }

    /// The same shop, bound to a different API version.
    #[must_use]
    pub fn with_api_version(&self, api_version: ApiVersion) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            api_version,
        }
    }

    /// API version this client targets.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    fn endpoint(&self, resource: &str) -> Result<Url, ShopifyError> {
        let path = format!("{}/{resource}", self.api_version.admin_path());
        Ok(self.inner.base_url.join(&path)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(
            &self.inner.api_key,
            Some(self.inner.api_password.expose_secret()),
        )
    }

    /// Send a request and return the successful response.
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ShopifyError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Shopify response");

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(retry_after_secs)
                .unwrap_or(2);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let fallback = status.canonical_reason().unwrap_or("request failed");
            let body = response.text().await.unwrap_or_default();
            return Err(ShopifyError::Api {
                status: status.as_u16(),
                message: error_message(&body, fallback),
            });
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ShopifyError> {
        Ok(self.send(request).await?.json().await?)
    }

    /// List the shop's webhook subscriptions.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Shopify rejects it.
    #[instrument(skip(self), fields(api_version = %self.api_version))]
    pub async fn list_webhooks(&self) -> Result<Vec<Webhook>, ShopifyError> {
        let url = self.endpoint("webhooks.json")?;
        let envelope: WebhookListEnvelope = self.send_json(self.inner.client.get(url)).await?;
        Ok(envelope.webhooks)
    }

    /// Fetch one webhook subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Shopify rejects it
    /// (a missing webhook is an `Api` error with status 404).
    #[instrument(skip(self), fields(webhook_id = %id))]
    pub async fn get_webhook(&self, id: WebhookId) -> Result<Webhook, ShopifyError> {
        let url = self.endpoint(&format!("webhooks/{id}.json"))?;
        let envelope: WebhookEnvelope = self.send_json(self.inner.client.get(url)).await?;
        Ok(envelope.webhook)
    }

    /// Create a webhook subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Shopify rejects it.
    #[instrument(skip(self, webhook), fields(topic = %webhook.topic))]
    pub async fn create_webhook(&self, webhook: &Webhook) -> Result<Webhook, ShopifyError> {
        let url = self.endpoint("webhooks.json")?;
        let request = self.inner.client.post(url).json(&WebhookRequest { webhook });
        let envelope: WebhookEnvelope = self.send_json(request).await?;
        Ok(envelope.webhook)
    }

    /// Replace the address, topic and format of an existing subscription.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::MissingId` if `webhook.id` is `None`, or an
    /// error if the request fails or Shopify rejects it.
    #[instrument(skip(self, webhook), fields(webhook_id = ?webhook.id))]
    pub async fn update_webhook(&self, webhook: &Webhook) -> Result<Webhook, ShopifyError> {
        let id = webhook.id.ok_or(ShopifyError::MissingId)?;
        let url = self.endpoint(&format!("webhooks/{id}.json"))?;
        let request = self.inner.client.put(url).json(&WebhookRequest { webhook });
        let envelope: WebhookEnvelope = self.send_json(request).await?;
        Ok(envelope.webhook)
    }

    /// Delete a webhook subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Shopify rejects it.
    #[instrument(skip(self), fields(webhook_id = %id))]
    pub async fn delete_webhook(&self, id: WebhookId) -> Result<(), ShopifyError> {
        let url = self.endpoint(&format!("webhooks/{id}.json"))?;
        self.send(self.inner.client.delete(url)).await?;
        Ok(())
    }
}

/// Whole seconds to wait from a `Retry-After` value such as `2` or `2.0`,
/// rounding fractions up.
fn retry_after_secs(value: &str) -> Option<u64> {
    let value = value.trim();
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    let secs = whole.parse::<u64>().ok()?;

    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if fraction.bytes().all(|b| b == b'0') {
        Some(secs)
    } else {
        Some(secs.saturating_add(1))
    }
}
