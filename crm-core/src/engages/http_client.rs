//! Reqwest-backed engages adapter.
//!
//! Owns transport details only: URL building, timeout, status mapping and JSON
//! decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde_json::Value;

use super::{EngageCustomerChange, EngagesApi, EngagesError};

const USER_AGENT: &str = concat!("crm-core/", env!("CARGO_PKG_VERSION"));

pub struct HttpEngagesClient {
    client: Client,
    base_url: Url,
}

impl HttpEngagesClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `path` to the base URL, keeping any path prefix the base has.
    fn endpoint(&self, path: &str) -> Result<Url, EngagesError> {
        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|e| EngagesError::InvalidDomain(format!("{}: {}", raw, e)))
    }

    async fn read_json(response: Response) -> Result<Value, EngagesError> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| EngagesError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(EngagesError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&body).map_err(|e| EngagesError::Decode(e.to_string()))
    }
}

#[async_trait]
impl EngagesApi for HttpEngagesClient {
    async fn list(&self) -> Result<Value, EngagesError> {
        let response = self
            .client
            .get(self.endpoint("engages/list")?)
            .send()
            .await
            .map_err(|e| EngagesError::Transport(e.to_string()))?;

        Self::read_json(response).await
    }

    async fn send(&self, params: Value) -> Result<Value, EngagesError> {
        let response = self
            .client
            .post(self.endpoint("engages/send")?)
            .json(&params)
            .send()
            .await
            .map_err(|e| EngagesError::Transport(e.to_string()))?;

        Self::read_json(response).await
    }

    async fn change_customer(&self, change: &EngageCustomerChange) -> Result<(), EngagesError> {
        tracing::debug!(
            new_customer_id = %change.new_customer_id,
            merged = change.customer_ids.len(),
            "notifying engages service of customer merge"
        );

        let response = self
            .client
            .post(self.endpoint("engages/changeCustomer")?)
            .json(change)
            .send()
            .await
            .map_err(|e| EngagesError::Transport(e.to_string()))?;

        Self::read_json(response).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpEngagesClient {
        HttpEngagesClient::new(Url::parse(base).unwrap(), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        assert_eq!(
            client("http://engages.local/api").endpoint("engages/list").unwrap().as_str(),
            "http://engages.local/api/engages/list"
        );
        assert_eq!(
            client("http://engages.local/").endpoint("/engages/send").unwrap().as_str(),
            "http://engages.local/engages/send"
        );
    }
}
