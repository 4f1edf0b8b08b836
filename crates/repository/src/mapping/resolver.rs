//! Effective mapping resolution.
//!
//! Resolution runs once per index type during schema setup:
//!
//! 1. the local descriptor is built from [`IndexType::configure_properties`]
//! 2. the remote mapping is fetched through a [`MappingClient`]
//! 3. [`merge_mappings`] picks the remote mapping when one was returned for
//!    the expected index/type, and the local descriptor otherwise
//!
//! Resolution never fails. A failed fetch is logged at error level and the
//! local descriptor is used, so schema setup cannot be blocked by a transient
//! backend outage.

use async_trait::async_trait;
use serde_json::Value;

use crate::query::Document;

use super::descriptor::TypeMapping;
use super::parser_config::AliasMap;
use super::response::GetMappingResponse;

/// Default document type name used for mapping lookups.
pub const DEFAULT_TYPE_NAME: &str = "doc";

/// A typed index: the static description of where and how documents of
/// type [`IndexType::Document`] are indexed.
pub trait IndexType: Send + Sync {
    /// The document type stored in the index.
    type Document: Document;

    /// The index name (already prefixed).
    fn index_name(&self) -> &str;

    /// The document type name used as the second key of mapping responses.
    fn type_name(&self) -> &str {
        DEFAULT_TYPE_NAME
    }

    /// Declares the properties of the local mapping descriptor.
    fn configure_properties(&self, mapping: TypeMapping) -> TypeMapping;

    /// Field aliases understood by the query parser.
    fn alias_map(&self) -> AliasMap {
        AliasMap::new()
    }
}

/// The narrow client interface mapping resolution depends on.
///
/// Implementations issue exactly one request per call and report failures in
/// the returned response rather than as errors.
#[async_trait]
pub trait MappingClient: Send + Sync {
    /// Fetches the mapping of `index`.
    async fn get_mapping(&self, index: &str, type_name: &str) -> GetMappingResponse;
}

/// Where the effective mapping came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingSource {
    /// Fetched from the cluster.
    Remote,
    /// The local declarative descriptor.
    Local,
}

/// The mapping used by query construction for one index type.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMapping {
    /// The effective mapping.
    pub mapping: TypeMapping,
    /// Its origin.
    pub source: MappingSource,
}

impl ResolvedMapping {
    /// Wraps the local descriptor.
    pub fn local(mapping: TypeMapping) -> Self {
        Self {
            mapping,
            source: MappingSource::Local,
        }
    }

    /// Wraps a remote mapping.
    pub fn remote(mapping: TypeMapping) -> Self {
        Self {
            mapping,
            source: MappingSource::Remote,
        }
    }

    /// True if the remote mapping is in effect.
    pub fn is_remote(&self) -> bool {
        self.source == MappingSource::Remote
    }
}

/// Chooses the effective mapping: `remote` if present, otherwise `local`.
pub fn merge_mappings(remote: Option<TypeMapping>, local: TypeMapping) -> ResolvedMapping {
    match remote {
        Some(remote) => ResolvedMapping::remote(remote),
        None => ResolvedMapping::local(local),
    }
}

/// Resolves the effective mapping of `index_type`.
pub async fn resolve_mapping<I, C>(index_type: &I, client: &C) -> ResolvedMapping
where
    I: IndexType + ?Sized,
    C: MappingClient + ?Sized,
{
    let index = index_type.index_name();
    let type_name = index_type.type_name();
    let local = index_type.configure_properties(TypeMapping::new());

    tracing::trace!(index = %index, type_name = %type_name, "Fetching mapping");
    let response = client.get_mapping(index, type_name).await;
    tracing::trace!("{}", response.api_call.request_summary());

    if !response.is_valid() {
        tracing::error!(
            index = %index,
            "Failed to fetch mapping, using local descriptor: {}",
            response.api_call.error_message()
        );
        return ResolvedMapping::local(local);
    }

    let remote = response.into_mapping(index, type_name);
    if remote.is_none() {
        tracing::debug!(
            index = %index,
            type_name = %type_name,
            "No remote mapping returned, using local descriptor"
        );
    }

    let resolved = merge_mappings(remote, local);
    tracing::debug!(
        index = %index,
        source = ?resolved.source,
        properties = resolved.mapping.properties.len(),
        "Resolved effective mapping"
    );
    resolved
}

/// An index type described at runtime, for documents without a Rust model.
#[derive(Debug, Clone, Default)]
pub struct DynamicIndexType {
    index_name: String,
    type_name: Option<String>,
    local: TypeMapping,
    aliases: AliasMap,
}

impl DynamicIndexType {
    /// Creates an index type with an empty local descriptor.
    pub fn new(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            ..Default::default()
        }
    }

    /// Overrides the document type name.
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Sets the local descriptor.
    pub fn with_local_mapping(mut self, mapping: TypeMapping) -> Self {
        self.local = mapping;
        self
    }

    /// Sets the alias map.
    pub fn with_aliases(mut self, aliases: AliasMap) -> Self {
        self.aliases = aliases;
        self
    }
}

impl IndexType for DynamicIndexType {
    type Document = Value;

    fn index_name(&self) -> &str {
        &self.index_name
    }

    fn type_name(&self) -> &str {
        self.type_name.as_deref().unwrap_or(DEFAULT_TYPE_NAME)
    }

    fn configure_properties(&self, _mapping: TypeMapping) -> TypeMapping {
        self.local.clone()
    }

    fn alias_map(&self) -> AliasMap {
        self.aliases.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_remote() {
        let local = TypeMapping::new().keyword("id");
        let remote = TypeMapping::new().number("id", "long");

        let resolved = merge_mappings(Some(remote.clone()), local.clone());
        assert!(resolved.is_remote());
        assert_eq!(resolved.mapping, remote);

        let resolved = merge_mappings(None, local.clone());
        assert_eq!(resolved, ResolvedMapping::local(local));
    }

    #[test]
    fn test_dynamic_index_type() {
        let index = DynamicIndexType::new("logs")
            .with_type_name("event")
            .with_local_mapping(TypeMapping::new().keyword("id"))
            .with_aliases(AliasMap::new().with("identifier", "id"));

        assert_eq!(index.index_name(), "logs");
        assert_eq!(index.type_name(), "event");
        assert!(index.configure_properties(TypeMapping::new()).find("id").is_some());
        assert_eq!(index.alias_map().resolve("identifier"), "id");
        assert_eq!(DynamicIndexType::new("x").type_name(), "doc");
    }
}
