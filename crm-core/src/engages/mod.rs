//! Client for the external engagement (messaging campaign) service.
//!
//! The service is told about customer merges so that campaign history follows
//! the surviving customer. [`EngagesApi`] is the port; [`HttpEngagesClient`]
//! talks to the real service and [`DisabledEngagesClient`] stands in when no
//! base URL is configured.

mod http_client;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::errors::CoreError;

pub use http_client::HttpEngagesClient;

/// Identifier remapping produced by a customer merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngageCustomerChange {
    pub new_customer_id: String,
    pub customer_ids: Vec<String>,
}

#[derive(Error, Debug)]
pub enum EngagesError {
    #[error("Invalid engages API domain: {0}")]
    InvalidDomain(String),

    #[error("Engages request failed: {0}")]
    Transport(String),

    #[error("Engages service responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid engages response: {0}")]
    Decode(String),
}

impl From<EngagesError> for CoreError {
    fn from(err: EngagesError) -> Self {
        CoreError::unavailable("Engages service is unavailable").with_source(err)
    }
}

#[async_trait]
pub trait EngagesApi: Send + Sync {
    /// `GET /engages/list`
    async fn list(&self) -> Result<Value, EngagesError>;

    /// `POST /engages/send`
    async fn send(&self, params: Value) -> Result<Value, EngagesError>;

    /// `POST /engages/changeCustomer`
    async fn change_customer(&self, change: &EngageCustomerChange) -> Result<(), EngagesError>;
}

/// Used when `ENGAGES_API_DOMAIN` is not set.
#[derive(Clone, Debug, Default)]
pub struct DisabledEngagesClient;

#[async_trait]
impl EngagesApi for DisabledEngagesClient {
    async fn list(&self) -> Result<Value, EngagesError> {
        Ok(Value::Array(Vec::new()))
    }

    async fn send(&self, _params: Value) -> Result<Value, EngagesError> {
        tracing::warn!("Engages service not configured; dropping send request");
        Ok(Value::Null)
    }

    async fn change_customer(&self, change: &EngageCustomerChange) -> Result<(), EngagesError> {
        tracing::warn!(
            new_customer_id = %change.new_customer_id,
            merged = change.customer_ids.len(),
            "Engages service not configured; skipping customer change notification"
        );
        Ok(())
    }
}

/// Pick the client for the configured domain.
pub fn engages_client(
    domain: Option<&str>,
    timeout: Duration,
) -> Result<Arc<dyn EngagesApi>, EngagesError> {
    match domain.map(str::trim).filter(|value| !value.is_empty()) {
        Some(domain) => {
            let base = Url::parse(domain)
                .map_err(|e| EngagesError::InvalidDomain(format!("{}: {}", domain, e)))?;
            let client = HttpEngagesClient::new(base, timeout)
                .map_err(|e| EngagesError::Transport(e.to_string()))?;
            Ok(Arc::new(client))
        }
        None => Ok(Arc::new(DisabledEngagesClient)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreErrorKind;

    #[test]
    fn test_change_serialises_camel_case() {
        let change = EngageCustomerChange {
            new_customer_id: "new".to_string(),
            customer_ids: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            serde_json::json!({ "newCustomerId": "new", "customerIds": ["a", "b"] })
        );
    }

    #[test]
    fn test_blank_domain_selects_disabled_client() {
        assert!(engages_client(None, Duration::from_secs(1)).is_ok());
        assert!(engages_client(Some("  "), Duration::from_secs(1)).is_ok());
        assert!(matches!(
            engages_client(Some("not a url"), Duration::from_secs(1)),
            Err(EngagesError::InvalidDomain(_))
        ));
    }

    #[test]
    fn test_engages_error_maps_to_unavailable() {
        let err: CoreError = EngagesError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        }
        .into();
        assert_eq!(err.kind(), CoreErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn test_disabled_client_succeeds() {
        let client = DisabledEngagesClient;
        let change = EngageCustomerChange {
            new_customer_id: "n".to_string(),
            customer_ids: vec![],
        };
        assert!(client.change_customer(&change).await.is_ok());
        assert_eq!(client.list().await.unwrap(), Value::Array(vec![]));
    }
}
