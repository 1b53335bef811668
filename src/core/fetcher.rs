use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use reqwest::{Client, StatusCode};
use std::collections::BTreeMap;
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Resolves the request URL: the endpoint with the configured query
/// parameters appended in key order.
pub fn endpoint_url<C: ConfigProvider + ?Sized>(config: &C) -> Result<Url> {
    let mut url = Url::parse(config.api_endpoint()).map_err(|e| {
        EtlError::InvalidConfigValueError {
            field: "api_endpoint".to_string(),
            value: config.api_endpoint().to_string(),
            reason: format!("Invalid URL format: {}", e),
        }
    })?;

    let parameters = config.query_parameters();
    if !parameters.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &parameters {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}

/// Issues the single GET of a run and returns the body of a 200 response.
pub struct HttpFetcher {
    client: Client,
    url: Url,
    headers: BTreeMap<String, String>,
}

impl HttpFetcher {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            url: endpoint_url(config)?,
            headers: config.request_headers(),
        })
    }

    pub async fn fetch(&self) -> Result<String> {
        tracing::info!("Sending GET request to {}", self.url);

        let mut request = self.client.get(self.url.clone());
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::info!("Response code: {}", status.as_u16());

        if status != StatusCode::OK {
            return Err(EtlError::FetchError {
                url: self.url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        tracing::debug!("Received {} bytes", body.len());
        Ok(body)
    }
}
