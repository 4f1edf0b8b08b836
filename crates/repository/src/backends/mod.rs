//! Search engine client bindings.
//!
//! Each backend is behind its own feature flag and implements
//! [`MappingClient`](crate::mapping::MappingClient).

#[cfg(feature = "elasticsearch")]
pub mod elasticsearch;
