//! [`MappingClient`] implementation over the official Elasticsearch client.

use std::time::Duration;

use async_trait::async_trait;
use elasticsearch::Elasticsearch;
use elasticsearch::auth::Credentials;
use elasticsearch::cert::CertificateValidation;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use elasticsearch::indices::IndicesGetMappingParts;
use serde_json::Value;

use crate::error::{BackendError, RepositoryResult};
use crate::mapping::{
    ApiCallDetails, GetMappingResponse, MappingClient, ServerError, TransportFailure,
};

use super::config::{ElasticsearchAuth, ElasticsearchConfig};

const BACKEND_NAME: &str = "elasticsearch";

/// Fetches index mappings from an Elasticsearch cluster.
pub struct ElasticsearchMappingClient {
    client: Elasticsearch,
    config: ElasticsearchConfig,
}

impl std::fmt::Debug for ElasticsearchMappingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchMappingClient")
            .field("nodes", &self.config.nodes)
            .field("index_prefix", &self.config.index_prefix)
            .finish()
    }
}

impl ElasticsearchMappingClient {
    /// Creates a client from configuration.
    ///
    /// No request is issued; an unreachable cluster only shows up when a
    /// mapping is fetched.
    pub fn new(config: ElasticsearchConfig) -> RepositoryResult<Self> {
        let client = Self::build_client(&config)?;
        Ok(Self { client, config })
    }

    /// Wraps an already configured client.
    pub fn from_client(client: Elasticsearch, config: ElasticsearchConfig) -> Self {
        Self { client, config }
    }

    fn build_client(config: &ElasticsearchConfig) -> RepositoryResult<Elasticsearch> {
        let url = config
            .nodes
            .first()
            .cloned()
            .unwrap_or_else(|| "http://localhost:9200".to_string());

        let parsed_url: elasticsearch::http::Url =
            url.parse().map_err(|e| BackendError::ConnectionFailed {
                backend_name: BACKEND_NAME.to_string(),
                message: format!("Invalid URL: {}", e),
            })?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);

        let mut builder = TransportBuilder::new(conn_pool)
            .timeout(Duration::from_millis(config.request_timeout_ms));

        if config.disable_certificate_validation {
            builder = builder.cert_validation(CertificateValidation::None);
        }

        if let Some(ref auth) = config.auth {
            builder = match auth {
                ElasticsearchAuth::Basic { username, password } => {
                    builder.auth(Credentials::Basic(username.clone(), password.clone()))
                }
                ElasticsearchAuth::Bearer { token } => {
                    builder.auth(Credentials::Bearer(token.clone()))
                }
            };
        }

        let transport = builder.build().map_err(|e| BackendError::ConnectionFailed {
            backend_name: BACKEND_NAME.to_string(),
            message: format!("Failed to build transport: {}", e),
        })?;

        Ok(Elasticsearch::new(transport))
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ElasticsearchConfig {
        &self.config
    }
}

#[async_trait]
impl MappingClient for ElasticsearchMappingClient {
    async fn get_mapping(&self, index: &str, type_name: &str) -> GetMappingResponse {
        let mut api_call = ApiCallDetails::new("GET", format!("/{}/_mapping", index));

        let response = match self
            .client
            .indices()
            .get_mapping(IndicesGetMappingParts::Index(&[index]))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                api_call.original_error = Some(TransportFailure::from_error(&e));
                return GetMappingResponse::failed(api_call);
            }
        };

        let status = response.status_code();
        api_call.status_code = Some(status.as_u16());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            api_call.server_error = Some(ServerError::from_body(status.as_u16(), &body));
            return GetMappingResponse::failed(api_call);
        }

        match response.json::<Value>().await {
            Ok(body) => GetMappingResponse::from_body(api_call, &body, type_name),
            Err(e) => {
                api_call.original_error = Some(TransportFailure::from_error(&e));
                GetMappingResponse::failed(api_call)
            }
        }
    }
}
