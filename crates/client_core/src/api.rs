//! HTTP access to the ANS operator backend.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{ExpenseRecord, OperatorRecord, Statistics},
    error::{ApiErrorBody, ApiException},
    protocol::{OperatorPage, OperatorsQuery},
};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Backend operations the store depends on.
#[async_trait]
pub trait AnsApi: Send + Sync {
    async fn list_operators(&self, query: &OperatorsQuery) -> Result<OperatorPage, ClientError>;
    async fn statistics(&self) -> Result<Statistics, ClientError>;
    async fn operator(&self, cnpj: &str) -> Result<OperatorRecord, ClientError>;
    async fn operator_expenses(&self, cnpj: &str) -> Result<Vec<ExpenseRecord>, ClientError>;
}

pub struct HttpAnsApi {
    http: Client,
    base_url: Url,
}

impl HttpAnsApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // parse_base_url rejects cannot-be-a-base urls, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &Url,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        debug!(%endpoint, "GET");
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ApiErrorBody>().await {
                Ok(body) => body.detail,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            };
            return Err(ClientError::Status {
                endpoint: endpoint.to_string(),
                exception: ApiException::new(status.as_u16(), detail),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| ClientError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })
    }
}

#[async_trait]
impl AnsApi for HttpAnsApi {
    async fn list_operators(&self, query: &OperatorsQuery) -> Result<OperatorPage, ClientError> {
        let endpoint = self.endpoint(&["operadoras"]);
        let request = self.http.get(endpoint.clone()).query(query);
        self.fetch_json(&endpoint, request).await
    }

    async fn statistics(&self) -> Result<Statistics, ClientError> {
        let endpoint = self.endpoint(&["estatisticas"]);
        let request = self.http.get(endpoint.clone());
        self.fetch_json(&endpoint, request).await
    }

    async fn operator(&self, cnpj: &str) -> Result<OperatorRecord, ClientError> {
        let endpoint = self.endpoint(&["operadoras", cnpj]);
        let request = self.http.get(endpoint.clone());
        self.fetch_json(&endpoint, request).await
    }

    async fn operator_expenses(&self, cnpj: &str) -> Result<Vec<ExpenseRecord>, ClientError> {
        let endpoint = self.endpoint(&["operadoras", cnpj, "despesas"]);
        let request = self.http.get(endpoint.clone());
        self.fetch_json(&endpoint, request).await
    }
}

/// Trims whitespace and trailing slashes, then requires an absolute http(s) url.
pub fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("url cannot be used as a base".into()));
    }
    Ok(url)
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
