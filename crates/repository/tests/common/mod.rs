//! Shared fixtures for the integration tests.
//!
//! - [`LogEvent`] / [`LogEventIndex`]: a typed document and its index
//! - [`FakeMappingClient`]: a [`MappingClient`] returning a canned response
//! - [`CaptureLayer`]: a tracing layer recording emitted events

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use helios_repository::mapping::{
    AliasMap, ApiCallDetails, GetMappingResponse, IndexType, MappingClient, ServerError,
    TransportFailure, TypeMapping,
};
use helios_repository::query::{Document, FieldPath};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

pub const LOG_EVENT_INDEX: &str = "hfs_log_events";

// ============================================================================
// Documents
// ============================================================================

/// A soft-deletable log event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub id: String,
    pub company: String,
    pub message: String,
    pub created_utc: String,
    pub is_deleted: bool,
}

impl Document for LogEvent {
    const SUPPORTS_SOFT_DELETES: bool = true;
}

impl LogEvent {
    pub const ID: FieldPath<LogEvent> = FieldPath::new("id");
    pub const COMPANY: FieldPath<LogEvent> = FieldPath::new("company");
    pub const MESSAGE: FieldPath<LogEvent> = FieldPath::new("message");
    pub const CREATED_UTC: FieldPath<LogEvent> = FieldPath::new("created_utc");
    pub const DATA: FieldPath<LogEvent> = FieldPath::new("data");
}

/// The index holding [`LogEvent`] documents.
pub struct LogEventIndex;

impl IndexType for LogEventIndex {
    type Document = LogEvent;

    fn index_name(&self) -> &str {
        LOG_EVENT_INDEX
    }

    fn configure_properties(&self, mapping: TypeMapping) -> TypeMapping {
        mapping
            .keyword("id")
            .keyword("company")
            .text("message")
            .date("created_utc")
            .boolean("is_deleted")
            .object("data", |data| data.keyword("user"))
    }

    fn alias_map(&self) -> AliasMap {
        AliasMap::new().with("user", "data.user")
    }
}

// ============================================================================
// Mapping client
// ============================================================================

/// Returns the same canned response for every request and counts requests.
pub struct FakeMappingClient {
    response: GetMappingResponse,
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, String)>>,
}

impl FakeMappingClient {
    pub fn new(response: GetMappingResponse) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A 200 response whose body is `body`.
    pub fn with_body(index: &str, body: Value) -> Self {
        Self::new(GetMappingResponse::from_body(ok_call(index), &body, "doc"))
    }

    /// A transport failure (no response received).
    pub fn unreachable(index: &str) -> Self {
        let err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let mut api_call = ApiCallDetails::new("GET", mapping_path(index));
        api_call.original_error = Some(TransportFailure::from_error(&err));
        Self::new(GetMappingResponse::failed(api_call))
    }

    /// A non-2xx response carrying an error body.
    pub fn server_error(index: &str, status: u16, body: &str) -> Self {
        let mut api_call = ApiCallDetails::new("GET", mapping_path(index));
        api_call.status_code = Some(status);
        api_call.server_error = Some(ServerError::from_body(status, body));
        Self::new(GetMappingResponse::failed(api_call))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MappingClient for FakeMappingClient {
    async fn get_mapping(&self, index: &str, type_name: &str) -> GetMappingResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((index.to_string(), type_name.to_string()));
        self.response.clone()
    }
}

/// Never answers.
pub struct HangingMappingClient;

#[async_trait]
impl MappingClient for HangingMappingClient {
    async fn get_mapping(&self, _index: &str, _type_name: &str) -> GetMappingResponse {
        std::future::pending().await
    }
}

pub fn mapping_path(index: &str) -> String {
    format!("/{}/_mapping", index)
}

pub fn ok_call(index: &str) -> ApiCallDetails {
    let mut api_call = ApiCallDetails::new("GET", mapping_path(index));
    api_call.status_code = Some(200);
    api_call
}

// ============================================================================
// Log capture
// ============================================================================

/// One captured tracing event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
}

/// Tracing layer that records every event it sees.
#[derive(Clone, Default)]
pub struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level)
            .collect()
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.0,
        });
    }
}
