//! Plainpack Core - shared types for the manifest conversion pipeline
//!
//! This crate provides the foundational types used throughout Plainpack:
//! - `Manifest`: one parsed YAML document with kind/name accessors
//! - `SecretRecord` / `ConfigMapRecord`: lenient views over Kubernetes payloads
//! - `ConvertContext`: the state converters read from and publish into
//! - `DiagnosticSink` / `OutputSink`: the narrow write seams of a converter

pub mod context;
pub mod error;
pub mod resource;

pub use context::{ConvertContext, DiagnosticSink, OutputSink};
pub use error::{CoreError, Result};
pub use resource::{ConfigMapRecord, Manifest, Metadata, SecretRecord};
