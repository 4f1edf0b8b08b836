//! Declarative field mapping descriptors.
//!
//! A [`TypeMapping`] mirrors the body of an Elasticsearch `mappings` object:
//! a tree of named properties with their engine-level types. Unknown keys
//! (`dynamic`, `_source`, analyzers, ...) are preserved in `settings` so that
//! a mapping fetched from the cluster survives a round trip unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{QueryError, QueryResult};

/// The mapping of one document type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeMapping {
    /// Top-level properties.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyMapping>,

    /// Any other mapping-level setting.
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

/// The mapping of a single property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyMapping {
    /// Engine-level type (`keyword`, `text`, `date`, ...). Absent for plain objects.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,

    /// Child properties of `object` and `nested` properties.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyMapping>,

    /// Multi-fields (e.g. `name.keyword`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, PropertyMapping>,

    /// Any other property setting (`analyzer`, `format`, `enabled`, ...).
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl PropertyMapping {
    /// Creates a property of the given type.
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            field_type: Some(field_type.into()),
            ..Default::default()
        }
    }

    /// Creates an untyped object property from a child mapping.
    pub fn object(children: TypeMapping) -> Self {
        Self {
            properties: children.properties,
            settings: children.settings,
            ..Default::default()
        }
    }

    /// Creates a `nested` property from a child mapping.
    pub fn nested(children: TypeMapping) -> Self {
        Self {
            field_type: Some("nested".to_string()),
            ..Self::object(children)
        }
    }

    /// Adds a multi-field.
    pub fn with_field(mut self, name: impl Into<String>, field: PropertyMapping) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Adds a setting.
    pub fn with_setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }

    /// Returns the engine-level type.
    pub fn field_type(&self) -> Option<&str> {
        self.field_type.as_deref()
    }

    /// Returns true for `text` properties (analyzed, not usable in `term`).
    pub fn is_analyzed(&self) -> bool {
        self.field_type() == Some("text")
    }
}

impl TypeMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property.
    pub fn property(mut self, name: impl Into<String>, property: PropertyMapping) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    /// Adds a `keyword` property.
    pub fn keyword(self, name: impl Into<String>) -> Self {
        self.property(name, PropertyMapping::new("keyword"))
    }

    /// Adds a `text` property with a `keyword` multi-field.
    pub fn text(self, name: impl Into<String>) -> Self {
        self.property(
            name,
            PropertyMapping::new("text")
                .with_field("keyword", PropertyMapping::new("keyword")),
        )
    }

    /// Adds a `date` property.
    pub fn date(self, name: impl Into<String>) -> Self {
        self.property(name, PropertyMapping::new("date"))
    }

    /// Adds a `boolean` property.
    pub fn boolean(self, name: impl Into<String>) -> Self {
        self.property(name, PropertyMapping::new("boolean"))
    }

    /// Adds a numeric property (`long`, `integer`, `double`, ...).
    pub fn number(self, name: impl Into<String>, number_type: &str) -> Self {
        self.property(name, PropertyMapping::new(number_type))
    }

    /// Adds an object property configured by `configure`.
    pub fn object<F>(self, name: impl Into<String>, configure: F) -> Self
    where
        F: FnOnce(TypeMapping) -> TypeMapping,
    {
        self.property(name, PropertyMapping::object(configure(TypeMapping::new())))
    }

    /// Adds a nested property configured by `configure`.
    pub fn nested<F>(self, name: impl Into<String>, configure: F) -> Self
    where
        F: FnOnce(TypeMapping) -> TypeMapping,
    {
        self.property(name, PropertyMapping::nested(configure(TypeMapping::new())))
    }

    /// Adds a mapping-level setting (e.g. `dynamic`).
    pub fn with_setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }

    /// Returns true if the mapping declares nothing at all.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.settings.is_empty()
    }

    /// Looks up a dotted field path, descending through object/nested
    /// properties and multi-fields.
    pub fn find(&self, path: &str) -> Option<&PropertyMapping> {
        let mut segments = path.split('.');
        let mut current = self.properties.get(segments.next()?)?;
        for segment in segments {
            current = current
                .properties
                .get(segment)
                .or_else(|| current.fields.get(segment))?;
        }
        Some(current)
    }

    /// Renders the mapping as Elasticsearch JSON.
    ///
    /// Fails when a setting reuses a structural key (`properties`, or `type`
    /// / `fields` on a property), which would silently overwrite the declared
    /// structure once flattened.
    pub fn to_json(&self) -> QueryResult<Value> {
        check_settings("", &self.settings, &["properties"])?;
        check_children("", &self.properties)?;
        Ok(serde_json::to_value(self)?)
    }
}

fn check_settings(path: &str, settings: &Map<String, Value>, reserved: &[&str]) -> QueryResult<()> {
    match reserved.iter().find(|key| settings.contains_key(**key)) {
        Some(key) => Err(QueryError::Serialization {
            message: if path.is_empty() {
                format!("mapping setting '{}' shadows the mapping structure", key)
            } else {
                format!("setting '{}' of '{}' shadows the mapping structure", key, path)
            },
        }),
        None => Ok(()),
    }
}

fn check_children(parent: &str, children: &BTreeMap<String, PropertyMapping>) -> QueryResult<()> {
    for (name, property) in children {
        let path = if parent.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", parent, name)
        };
        check_settings(&path, &property.settings, &["type", "properties", "fields"])?;
        check_children(&path, &property.properties)?;
        check_children(&path, &property.fields)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> TypeMapping {
        TypeMapping::new()
            .keyword("id")
            .text("message")
            .date("created_utc")
            .object("data", |d| d.keyword("company").number("value", "long"))
            .nested("tags", |t| t.keyword("name"))
    }

    #[test]
    fn test_builder_json() {
        assert_eq!(
            sample().to_json().unwrap(),
            json!({
                "properties": {
                    "created_utc": { "type": "date" },
                    "data": { "properties": {
                        "company": { "type": "keyword" },
                        "value": { "type": "long" }
                    } },
                    "id": { "type": "keyword" },
                    "message": {
                        "type": "text",
                        "fields": { "keyword": { "type": "keyword" } }
                    },
                    "tags": {
                        "type": "nested",
                        "properties": { "name": { "type": "keyword" } }
                    }
                }
            })
        );
    }

    #[test]
    fn test_find_paths() {
        let mapping = sample();
        assert_eq!(mapping.find("id").and_then(|p| p.field_type()), Some("keyword"));
        assert_eq!(
            mapping.find("data.value").and_then(|p| p.field_type()),
            Some("long")
        );
        assert_eq!(
            mapping.find("message.keyword").and_then(|p| p.field_type()),
            Some("keyword")
        );
        assert!(mapping.find("message").unwrap().is_analyzed());
        assert!(mapping.find("data.missing").is_none());
        assert!(mapping.find("").is_none());
    }

    #[test]
    fn test_unknown_settings_survive_round_trip() {
        let raw = json!({
            "dynamic": "strict",
            "_source": { "enabled": true },
            "properties": {
                "created": { "type": "date", "format": "epoch_millis" }
            }
        });

        let mapping: TypeMapping = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(mapping.settings["dynamic"], "strict");
        assert_eq!(mapping.properties["created"].settings["format"], "epoch_millis");
        assert_eq!(mapping.to_json().unwrap(), raw);
    }

    #[test]
    fn test_shadowing_setting_is_rejected() {
        let err = TypeMapping::new()
            .keyword("id")
            .with_setting("properties", json!({}))
            .to_json()
            .unwrap_err();
        assert!(matches!(err, QueryError::Serialization { .. }));

        let err = TypeMapping::new()
            .object("data", |d| {
                d.property("company", PropertyMapping::new("keyword").with_setting("type", json!("text")))
            })
            .to_json()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "query serialization failed: setting 'type' of 'data.company' shadows the mapping structure"
        );
    }

    #[test]
    fn test_is_empty() {
        assert!(TypeMapping::new().is_empty());
        assert!(!TypeMapping::new().with_setting("dynamic", json!(false)).is_empty());
    }
}
