//! Response model for the remote "get mapping" call.
//!
//! Clients report every outcome through a [`GetMappingResponse`] instead of a
//! `Result`: transport failures, server errors and unparseable bodies all end
//! up in [`ApiCallDetails`], which also carries what is needed to log the
//! request.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use super::descriptor::TypeMapping;

/// Mappings of one index, keyed by document type name.
pub type IndexMappings = HashMap<String, TypeMapping>;

/// A failure raised before a usable response was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    /// Short type name of the underlying error.
    pub kind: String,
    /// Error message.
    pub message: String,
}

impl TransportFailure {
    /// Captures an error's type name and message.
    pub fn from_error<E: std::error::Error>(err: &E) -> Self {
        let full = std::any::type_name::<E>();
        // Keep the last path segment, ignoring generic arguments.
        let base = full.split('<').next().unwrap_or(full);
        let kind = base.rsplit("::").next().unwrap_or(base);
        Self {
            kind: kind.to_string(),
            message: err.to_string(),
        }
    }
}

/// An error reported by the server in a response body.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerError {
    /// HTTP status reported by the server.
    pub status: u16,
    /// The `error` payload, or the raw body if it was not JSON.
    pub error: Value,
}

impl ServerError {
    /// Parses an Elasticsearch error body (`{"error": ..., "status": ...}`).
    pub fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(mut map)) => {
                let status = map
                    .get("status")
                    .and_then(Value::as_u64)
                    .and_then(|s| u16::try_from(s).ok())
                    .unwrap_or(status);
                let error = map.remove("error").unwrap_or(Value::Object(map));
                Self { status, error }
            }
            Ok(other) => Self {
                status,
                error: other,
            },
            Err(_) => Self {
                status,
                error: Value::String(body.to_string()),
            },
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Value::String(s) => write!(f, "({}) {}", self.status, s),
            other => write!(f, "({}) {}", self.status, other),
        }
    }
}

/// Details of one request/response exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCallDetails {
    /// HTTP method.
    pub method: String,
    /// Path and query of the request.
    pub path: String,
    /// Request body, if any.
    pub request_body: Option<Vec<u8>>,
    /// HTTP status, if a response was received.
    pub status_code: Option<u16>,
    /// Failure raised by the transport or while reading the response.
    pub original_error: Option<TransportFailure>,
    /// Error reported by the server.
    pub server_error: Option<ServerError>,
}

impl ApiCallDetails {
    /// Creates details for a request that has not completed yet.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            request_body: None,
            status_code: None,
            original_error: None,
            server_error: None,
        }
    }

    /// True if a 2xx response was received and no error was recorded.
    pub fn is_valid(&self) -> bool {
        self.original_error.is_none()
            && self.server_error.is_none()
            && self
                .status_code
                .is_some_and(|status| (200..300).contains(&status))
    }

    /// Request line plus body, as written to the trace log.
    pub fn request_summary(&self) -> String {
        match &self.request_body {
            Some(body) => format!(
                "{} {}\r\n{}\r\n",
                self.method,
                self.path,
                String::from_utf8_lossy(body)
            ),
            None => format!("{} {}\r\n", self.method, self.path),
        }
    }

    /// Human readable description of what went wrong.
    pub fn error_message(&self) -> String {
        let mut lines = Vec::new();

        if let Some(ref original) = self.original_error {
            let status = self
                .status_code
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            lines.push(format!(
                "Original: ({} - {}) {}",
                status, original.kind, original.message
            ));
        }

        if let Some(ref server) = self.server_error {
            lines.push(format!("Server: {}", server));
        }

        if lines.is_empty() {
            match self.status_code {
                Some(status) if !(200..300).contains(&status) => {
                    lines.push(format!("Unexpected status code {}.", status))
                }
                _ => lines.push("Unknown error.".to_string()),
            }
        }

        lines.join("\n")
    }
}

/// Response to a "get mapping" request.
#[derive(Debug, Clone, PartialEq)]
pub struct GetMappingResponse {
    /// The exchange.
    pub api_call: ApiCallDetails,
    /// Mappings keyed by index name, then by type name.
    pub indices: HashMap<String, IndexMappings>,
}

impl GetMappingResponse {
    /// A response carrying no mappings; the error lives in `api_call`.
    pub fn failed(api_call: ApiCallDetails) -> Self {
        Self {
            api_call,
            indices: HashMap::new(),
        }
    }

    /// Builds a response from a successful body.
    ///
    /// Accepts both the typeless shape (`{index: {mappings: {...}}}`), whose
    /// mapping is filed under `type_name`, and the legacy typed shape
    /// (`{index: {mappings: {type_name: {...}}}}`). An index with an empty
    /// mappings object contributes nothing. A body that cannot be parsed makes
    /// the response invalid.
    pub fn from_body(mut api_call: ApiCallDetails, body: &Value, type_name: &str) -> Self {
        match parse_indices(body, type_name) {
            Ok(indices) => Self { api_call, indices },
            Err(e) => {
                api_call.original_error = Some(TransportFailure::from_error(&e));
                Self::failed(api_call)
            }
        }
    }

    /// True if the exchange succeeded.
    pub fn is_valid(&self) -> bool {
        self.api_call.is_valid()
    }

    /// Returns the mapping for `index` / `type_name`.
    pub fn mapping(&self, index: &str, type_name: &str) -> Option<&TypeMapping> {
        self.indices.get(index)?.get(type_name)
    }

    /// Takes the mapping for `index` / `type_name`.
    pub fn into_mapping(mut self, index: &str, type_name: &str) -> Option<TypeMapping> {
        self.indices.remove(index)?.remove(type_name)
    }
}

fn parse_indices(
    body: &Value,
    type_name: &str,
) -> Result<HashMap<String, IndexMappings>, serde_json::Error> {
    let entries: HashMap<String, Value> = serde_json::from_value(body.clone())?;
    let mut indices = HashMap::new();

    for (index, entry) in entries {
        let mappings = entry.get("mappings").cloned().unwrap_or(Value::Null);
        if mappings.is_null() {
            continue;
        }

        let mapping_body = if is_typed_map(&mappings, type_name) {
            // Another document type is not the mapping we asked for
            match mappings.get(type_name) {
                Some(typed) => typed.clone(),
                None => continue,
            }
        } else {
            mappings
        };

        let mapping: TypeMapping = serde_json::from_value(mapping_body)?;

        if mapping.is_empty() {
            continue;
        }

        let mut by_type = IndexMappings::new();
        by_type.insert(type_name.to_string(), mapping);
        indices.insert(index, by_type);
    }

    Ok(indices)
}

/// True for the legacy `{type: {...}}` shape: no top-level `properties`, and
/// either the requested type is a key or some entry is itself a mapping body.
fn is_typed_map(mappings: &Value, type_name: &str) -> bool {
    let Some(map) = mappings.as_object() else {
        return false;
    };
    if map.contains_key("properties") {
        return false;
    }
    map.contains_key(type_name)
        || map
            .values()
            .any(|v| v.as_object().is_some_and(|body| body.contains_key("properties")))
}
