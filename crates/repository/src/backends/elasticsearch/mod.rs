//! Elasticsearch client binding.
//!
//! Provides [`ElasticsearchMappingClient`], the [`MappingClient`](crate::mapping::MappingClient)
//! implementation used at schema setup. Only the single `GET /{index}/_mapping`
//! call is issued through it; everything else the repository does with the
//! cluster is owned by the application's own client.
//!
//! # Example
//!
//! ```ignore
//! use helios_repository::backends::elasticsearch::{ElasticsearchConfig, ElasticsearchMappingClient};
//! use helios_repository::mapping::{DynamicIndexType, resolve_mapping};
//!
//! let config = ElasticsearchConfig {
//!     nodes: vec!["http://localhost:9200".to_string()],
//!     ..Default::default()
//! };
//! let client = ElasticsearchMappingClient::new(config)?;
//! let index = DynamicIndexType::new(client.config().index_name("log_events"));
//! let resolved = resolve_mapping(&index, &client).await;
//! ```

mod client;
mod config;

pub use client::ElasticsearchMappingClient;
pub use config::{ElasticsearchAuth, ElasticsearchConfig};
