//! Query parser configuration backed by the effective mapping.

use std::collections::BTreeMap;

use super::descriptor::PropertyMapping;
use super::resolver::{IndexType, MappingClient, ResolvedMapping, resolve_mapping};

/// Maps user-facing field aliases to real field paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    aliases: BTreeMap<String, String>,
}

impl AliasMap {
    /// Creates an empty alias map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an alias.
    pub fn with(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.insert(alias, target);
        self
    }

    /// Adds an alias in place.
    pub fn insert(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.aliases.insert(alias.into(), target.into());
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns true if no alias is defined.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Resolves `field`.
    ///
    /// A full-path alias wins; otherwise the longest aliased prefix (on
    /// segment boundaries) is replaced. Unaliased fields are returned as is.
    pub fn resolve(&self, field: &str) -> String {
        if let Some(target) = self.aliases.get(field) {
            return target.clone();
        }

        let mut end = field.len();
        while let Some(pos) = field[..end].rfind('.') {
            if let Some(target) = self.aliases.get(&field[..pos]) {
                return format!("{}{}", target, &field[pos..]);
            }
            end = pos;
        }

        field.to_string()
    }
}

/// Schema knowledge handed to query parsing: field aliases plus the
/// effective mapping used for field validation and analysis-aware queries.
#[derive(Debug, Clone, Default)]
pub struct QueryParserConfiguration {
    aliases: AliasMap,
    mapping: Option<ResolvedMapping>,
}

impl QueryParserConfiguration {
    /// Creates a configuration without aliases or mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the alias map.
    pub fn use_aliases(mut self, aliases: AliasMap) -> Self {
        self.aliases = aliases;
        self
    }

    /// Sets an already resolved mapping.
    pub fn use_mapping(mut self, mapping: ResolvedMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// Resolves the mapping of `index_type` through `client` and adopts it
    /// together with the index type's alias map. Never fails.
    pub async fn use_mappings<I, C>(self, index_type: &I, client: &C) -> Self
    where
        I: IndexType + ?Sized,
        C: MappingClient + ?Sized,
    {
        let resolved = resolve_mapping(index_type, client).await;
        self.use_aliases(index_type.alias_map())
            .use_mapping(resolved)
    }

    /// The alias map.
    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    /// The effective mapping, if one was configured.
    pub fn mapping(&self) -> Option<&ResolvedMapping> {
        self.mapping.as_ref()
    }

    /// Applies aliases to a field path.
    pub fn resolve_field(&self, field: &str) -> String {
        self.aliases.resolve(field)
    }

    /// Looks up the mapping of a (possibly aliased) field path.
    pub fn field_mapping(&self, field: &str) -> Option<&PropertyMapping> {
        let resolved = self.resolve_field(field);
        self.mapping.as_ref()?.mapping.find(&resolved)
    }

    /// Returns true if the field exists in the effective mapping.
    pub fn is_known_field(&self, field: &str) -> bool {
        self.field_mapping(field).is_some()
    }

    /// Returns true if the field is analyzed (`text`).
    pub fn is_analyzed_field(&self, field: &str) -> bool {
        self.field_mapping(field)
            .is_some_and(PropertyMapping::is_analyzed)
    }
}
