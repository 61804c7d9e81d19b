//! Types for the node's GraphQL API

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GraphQL endpoint of the node
    pub endpoint: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Optional bearer token for authenticated nodes
    pub api_key: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:2020/graphql".to_string(),
            timeout_secs: 30,
            api_key: None,
        }
    }
}

impl ClientConfig {
    /// Configuration for the given endpoint with default settings
    pub fn for_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }
}

/// Arguments needed to place the next entry in an author's log.
///
/// `backlink` and `skiplink` are absent only for the first entry of a log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryArgs {
    /// Log the entry belongs to
    #[serde(with = "u64_string")]
    pub log_id: u64,
    /// Position of the entry inside the log, starting at 1
    #[serde(with = "u64_string")]
    pub seq_num: u64,
    /// Hash of the preceding entry
    #[serde(default)]
    pub backlink: Option<String>,
    /// Hash of the skiplink entry
    #[serde(default)]
    pub skiplink: Option<String>,
}

impl EntryArgs {
    /// Arguments for the first entry of a log
    pub fn first(log_id: u64) -> Self {
        Self {
            log_id,
            seq_num: 1,
            backlink: None,
            skiplink: None,
        }
    }

    /// Whether these arguments describe the first entry of a log
    pub fn is_first(&self) -> bool {
        self.seq_num == 1 && self.backlink.is_none()
    }
}

/// Variables of the `NextArgs` query
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextArgsVariables<'a> {
    pub public_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_id: Option<&'a str>,
}

/// Variables of the `Publish` mutation
#[derive(Debug, Clone, Serialize)]
pub struct PublishVariables<'a> {
    /// Hex-encoded signed entry
    pub entry: &'a str,
    /// Hex-encoded operation
    pub operation: &'a str,
}

/// GraphQL request body
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

/// GraphQL response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorMessage>,
}

/// Single entry of a GraphQL `errors` array
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlErrorMessage {
    pub message: String,
}

/// `data` of the `NextArgs` query
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextArgsData {
    pub next_args: Option<EntryArgs>,
}

/// `data` of the `Publish` mutation
#[derive(Debug, Clone, Deserialize)]
pub struct PublishData {
    pub publish: Option<EntryArgs>,
}

/// Nodes send 64 bit integers as strings; accept both forms, emit strings.
mod u64_string {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}
