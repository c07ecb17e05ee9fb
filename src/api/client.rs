use std::sync::Once;
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Response, header};
use rustls::crypto::{CryptoProvider, aws_lc_rs};
use tracing::debug;
use url::Url;

use crate::{
    api::ApiClientError,
    constants::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, USER_AGENT},
    model::{Measurement, MeasurementCreate, PostMeasurement},
};

static CRYPTO_PROVIDER_INIT: Once = Once::new();

fn ensure_crypto_provider() {
    CRYPTO_PROVIDER_INIT.call_once(|| {
        let _ = CryptoProvider::install_default(aws_lc_rs::default_provider());
    });
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the API, e.g. https://api.globalping.io/v1
    pub base_url: Url,
    /// Optional bearer token for higher rate limits
    pub token: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|token| !token.is_empty());
        self
    }
}

/// Client for the measurement API.
///
/// Every call is a single request: nothing is retried, as creating a
/// measurement twice would run it twice.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiClientError> {
        ensure_crypto_provider();

        let http = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .user_agent(config.user_agent.clone())
            .use_rustls_tls()
            .build()?;

        Ok(Self { http, config })
    }

    /// Submits a new measurement and returns its id.
    pub async fn create_measurement(
        &self,
        request: &PostMeasurement,
    ) -> Result<MeasurementCreate, ApiClientError> {
        let url = self.measurements_url();
        debug!("POST {url}");

        let response = self
            .authorize(self.http.post(url))
            .json(request)
            .send()
            .await?;

        let body = read_body(response).await?;
        serde_json::from_str(&body).map_err(ApiClientError::Decode)
    }

    /// Fetches a measurement and decodes it. Result timings stay raw until asked for.
    pub async fn get_measurement(&self, id: &str) -> Result<Measurement, ApiClientError> {
        let body = self.get_measurement_json(id).await?;
        serde_json::from_str(&body).map_err(ApiClientError::Decode)
    }

    /// Fetches a measurement and returns the response body untouched.
    pub async fn get_measurement_json(&self, id: &str) -> Result<String, ApiClientError> {
        let url = self.measurement_url(id);
        debug!("GET {url}");

        let response = self
            .authorize(self.http.get(url))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        read_body(response).await
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn measurements_url(&self) -> String {
        format!(
            "{}/measurements",
            self.config.base_url.as_str().trim_end_matches('/')
        )
    }

    fn measurement_url(&self, id: &str) -> String {
        format!("{}/{}", self.measurements_url(), urlencoding::encode(id))
    }
}

/// Reads the body of a response, turning non-2xx statuses into classified errors.
///
/// The bytes are kept as sent: no charset conversion, no BOM stripping.
async fn read_body(response: Response) -> Result<String, ApiClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    debug!(%status, bytes = bytes.len(), "response received");

    if status.is_success() {
        Ok(String::from_utf8(bytes.to_vec())?)
    } else {
        Err(ApiClientError::from_error_body(
            status,
            &String::from_utf8_lossy(&bytes),
        ))
    }
}
