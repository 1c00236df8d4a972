use std::time::Duration;

use prompt_core::RequestOptions;
use url::Url;

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Response payload as seen by the controller.
///
/// Every HTTP status lands here, including the login page a server serves
/// for an expired session; only failures without a payload become errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportPayload {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("client construction failed: {0}")]
    Client(String),
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// POSTs form-encoded options to an endpoint relative to the server base.
    async fn post_form(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<TransportPayload, TransportError>;

    /// GETs a text resource relative to the server base.
    async fn get_text(&self, endpoint: &str) -> Result<TransportPayload, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(base_url: Url, settings: TransportSettings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| TransportError::Client(err.to_string()))?;
        Ok(Self { client, base_url })
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(endpoint)
            .map_err(|err| TransportError::InvalidUrl(err.to_string()))
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn post_form(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<TransportPayload, TransportError> {
        let url = self.endpoint_url(endpoint)?;
        let form: Vec<(&str, &str)> = options.pairs().collect();
        let response = self
            .client
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        into_payload(response).await
    }

    async fn get_text(&self, endpoint: &str) -> Result<TransportPayload, TransportError> {
        let url = self.endpoint_url(endpoint)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        into_payload(response).await
    }
}

async fn into_payload(response: reqwest::Response) -> Result<TransportPayload, TransportError> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(map_reqwest_error)?;
    Ok(TransportPayload { status, body })
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout(err.to_string());
    }
    TransportError::Network(err.to_string())
}
