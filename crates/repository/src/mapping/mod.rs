//! Field mappings and their resolution.
//!
//! Every index type declares a local [`TypeMapping`] descriptor. At schema
//! setup the descriptor is reconciled with the mapping actually stored in the
//! cluster ([`resolve_mapping`]), and the result is handed to the
//! [`QueryParserConfiguration`] as the authoritative schema.
//!
//! # Example
//!
//! ```ignore
//! use helios_repository::mapping::{IndexType, QueryParserConfiguration, TypeMapping};
//!
//! struct LogEventIndex;
//!
//! impl IndexType for LogEventIndex {
//!     type Document = LogEvent;
//!
//!     fn index_name(&self) -> &str {
//!         "hfs_log_events"
//!     }
//!
//!     fn configure_properties(&self, mapping: TypeMapping) -> TypeMapping {
//!         mapping.keyword("id").keyword("company").date("created_utc")
//!     }
//! }
//!
//! let config = QueryParserConfiguration::new()
//!     .use_mappings(&LogEventIndex, &client)
//!     .await;
//! ```

mod descriptor;
mod parser_config;
mod resolver;
mod response;

pub use descriptor::{PropertyMapping, TypeMapping};
pub use parser_config::{AliasMap, QueryParserConfiguration};
pub use resolver::{
    DEFAULT_TYPE_NAME, DynamicIndexType, IndexType, MappingClient, MappingSource,
    ResolvedMapping, merge_mappings, resolve_mapping,
};
pub use response::{
    ApiCallDetails, GetMappingResponse, IndexMappings, ServerError, TransportFailure,
};
