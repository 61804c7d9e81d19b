//! HTTP client for the node's GraphQL endpoint

use crate::error::{ClientError, Result};
use crate::queries::{GQL_NEXT_ARGS, GQL_PUBLISH};
use crate::types::*;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// GraphQL client for a single node endpoint
///
/// No retries are performed; every failure is returned to the caller.
///
/// # Example
///
/// ```rust,no_run
/// use shirokuma_client::{ClientConfig, GraphQlClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GraphQlClient::new(ClientConfig::for_endpoint("http://localhost:2020/graphql"))?;
///
/// let next = client.publish("00a1...", "84a1...").await?;
/// assert!(next.seq_num > 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    config: ClientConfig,
    client: Client,
}

impl GraphQlClient {
    /// Create a new client
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.endpoint.is_empty() {
            return Err(ClientError::Config("endpoint must not be empty".into()));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(ref api_key) = config.api_key {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| ClientError::Config(format!("invalid API key: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Endpoint this client talks to
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Arguments for the next entry of `public_key`'s log.
    ///
    /// With a `view_id` the node answers for the log that document lives in,
    /// without one it answers for a fresh log.
    pub async fn next_args(&self, public_key: &str, view_id: Option<&str>) -> Result<EntryArgs> {
        let variables = NextArgsVariables {
            public_key,
            view_id,
        };

        let data: NextArgsData = self.request(GQL_NEXT_ARGS, variables).await?;
        let args = data.next_args.ok_or(ClientError::MissingField("nextArgs"))?;

        tracing::trace!(
            log_id = args.log_id,
            seq_num = args.seq_num,
            "nextArgs response"
        );
        Ok(args)
    }

    /// Publish an encoded entry and operation.
    ///
    /// Returns the arguments for the following entry on the same log.
    pub async fn publish(&self, entry: &str, operation: &str) -> Result<EntryArgs> {
        let variables = PublishVariables { entry, operation };

        let data: PublishData = self.request(GQL_PUBLISH, variables).await?;
        let args = data.publish.ok_or(ClientError::MissingField("publish"))?;

        tracing::trace!(
            log_id = args.log_id,
            seq_num = args.seq_num,
            "publish response"
        );
        Ok(args)
    }

    // ==================== Helper Methods ====================

    async fn request<V: Serialize, T: DeserializeOwned>(
        &self,
        query: &str,
        variables: V,
    ) -> Result<T> {
        let body = GraphQlRequest { query, variables };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Server { status, message });
        }

        let envelope: GraphQlResponse<T> = response.json().await?;

        if !envelope.errors.is_empty() {
            let message = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ClientError::GraphQl(message));
        }

        envelope.data.ok_or(ClientError::MissingField("data"))
    }
}
