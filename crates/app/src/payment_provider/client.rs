//! HTTP client for the payment provider.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, Response, Url};
use tracing::debug;

use crate::payment_provider::{
    PaymentProviderError,
    models::{CreatePaymentIntentBody, CreatedPaymentIntent, NewPaymentIntent, PaymentIntent},
};

/// Default timeout applied to every provider request.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for connecting to the payment provider.
#[derive(Debug, Clone)]
pub struct PaymentProviderConfig {
    /// API base URL, e.g. `"https://api-v2.ziina.com/api"`.
    pub base_url: String,

    /// Secret API key, sent as a bearer token.
    pub secret_key: String,

    /// Request timeout.
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct HttpPaymentProvider {
    config: PaymentProviderConfig,
    http: Client,
}

impl HttpPaymentProvider {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: PaymentProviderConfig) -> Result<Self, PaymentProviderError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// `{base}/payment_intent/{id}` with the id percent-encoded as one segment.
    fn intent_url(&self, intent_id: &str) -> Result<Url, PaymentProviderError> {
        let mut url = Url::parse(&self.url("payment_intent"))
            .map_err(|error| PaymentProviderError::InvalidBaseUrl(error.to_string()))?;

        url.path_segments_mut()
            .map_err(|()| PaymentProviderError::InvalidBaseUrl(self.config.base_url.clone()))?
            .push(intent_id);

        Ok(url)
    }
}

fn ensure_requested(
    intent_id: &str,
    intent: PaymentIntent,
) -> Result<PaymentIntent, PaymentProviderError> {
    if intent.id != intent_id {
        return Err(PaymentProviderError::IntentMismatch {
            requested: intent_id.to_string(),
            returned: intent.id,
        });
    }

    Ok(intent)
}

#[async_trait]
impl PaymentProvider for HttpPaymentProvider {
    async fn create_payment_intent(
        &self,
        intent: NewPaymentIntent,
    ) -> Result<CreatedPaymentIntent, PaymentProviderError> {
        let response = self
            .http
            .post(self.url("payment_intents"))
            .bearer_auth(&self.config.secret_key)
            .json(&CreatePaymentIntentBody::from(&intent))
            .send()
            .await?;

        let created: CreatedPaymentIntent = success(response).await?.json().await?;

        debug!(intent_id = %created.id, "created payment intent");

        Ok(created)
    }

    async fn get_payment_intent(
        &self,
        intent_id: &str,
    ) -> Result<PaymentIntent, PaymentProviderError> {
        let response = self
            .http
            .get(self.intent_url(intent_id)?)
            .bearer_auth(&self.config.secret_key)
            .send()
            .await?;

        let intent: PaymentIntent = success(response).await?.json().await?;

        ensure_requested(intent_id, intent)
    }
}

async fn success(response: Response) -> Result<Response, PaymentProviderError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(PaymentProviderError::UnexpectedResponse {
        status: status.as_u16(),
        body,
    })
}

#[automock]
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a payment intent the customer is redirected to.
    async fn create_payment_intent(
        &self,
        intent: NewPaymentIntent,
    ) -> Result<CreatedPaymentIntent, PaymentProviderError>;

    /// Fetch the current state of a payment intent.
    async fn get_payment_intent(
        &self,
        intent_id: &str,
    ) -> Result<PaymentIntent, PaymentProviderError>;
}
