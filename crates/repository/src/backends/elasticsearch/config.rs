//! Elasticsearch client configuration.

use serde::{Deserialize, Serialize};

use crate::mapping::DynamicIndexType;

/// Authentication configuration for Elasticsearch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElasticsearchAuth {
    /// Basic username/password authentication.
    Basic {
        /// The username for basic auth.
        username: String,
        /// The password for basic auth.
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// The bearer token.
        token: String,
    },
}

/// Configuration for the Elasticsearch client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Elasticsearch node URLs (e.g., `["http://localhost:9200"]`).
    /// Currently uses the first node (single-node connection pool).
    pub nodes: Vec<String>,

    /// Index name prefix (default: `"hfs"`).
    /// Indices are named: `{prefix}_{name}`
    #[serde(default = "default_index_prefix")]
    pub index_prefix: String,

    /// Request timeout in milliseconds (default: 30000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Document type name used to key mapping responses (default: `"doc"`).
    #[serde(default = "default_mapping_type_name")]
    pub mapping_type_name: String,

    /// Optional authentication.
    #[serde(default)]
    pub auth: Option<ElasticsearchAuth>,

    /// Whether to disable certificate validation (default: false).
    /// Only use for development/testing.
    #[serde(default)]
    pub disable_certificate_validation: bool,
}

fn default_index_prefix() -> String {
    "hfs".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30000
}

fn default_mapping_type_name() -> String {
    crate::mapping::DEFAULT_TYPE_NAME.to_string()
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            nodes: vec!["http://localhost:9200".to_string()],
            index_prefix: default_index_prefix(),
            request_timeout_ms: default_request_timeout_ms(),
            mapping_type_name: default_mapping_type_name(),
            auth: None,
            disable_certificate_validation: false,
        }
    }
}

impl ElasticsearchConfig {
    /// Returns the prefixed, lowercased index name for `name`.
    pub fn index_name(&self, name: &str) -> String {
        if self.index_prefix.is_empty() {
            return name.to_lowercase();
        }
        format!("{}_{}", self.index_prefix, name.to_lowercase())
    }

    /// Describes the index `name` (prefixed) with this configuration's
    /// mapping type name and an empty local descriptor.
    pub fn index_type(&self, name: &str) -> DynamicIndexType {
        DynamicIndexType::new(self.index_name(name)).with_type_name(self.mapping_type_name.clone())
    }
}
