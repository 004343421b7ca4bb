//! Plainpack Convert - operator custom resources to plain manifests
//!
//! This crate turns custom-resource manifests into plain, portable
//! Kubernetes resources. Each [`Converter`] claims a set of manifest kinds
//! and rewrites them against the shared [`ConvertContext`]; the
//! [`Pipeline`] dispatches kinds to converters in priority order.
//!
//! The built-in converter handles trust-manager style `Bundle` resources:
//! it merges certificate material from Secrets, ConfigMaps, inline text and
//! the system trust roots into one PEM blob, published as a synthetic
//! ConfigMap.
//!
//! # Example
//!
//! ```
//! use plainpack_convert::Pipeline;
//! use plainpack_core::{ConvertContext, Manifest};
//!
//! let manifests = Manifest::parse_all(
//!     "kind: Bundle\nmetadata:\n  name: ca1\nspec:\n  sources:\n    - inLine: PEM\n",
//! )
//! .unwrap();
//!
//! let mut ctx = ConvertContext::new();
//! let summary = Pipeline::with_defaults().run(&manifests, &mut ctx);
//!
//! assert_eq!(summary.produced, ["ca1"]);
//! assert!(ctx.warnings.is_empty());
//! ```
//!
//! [`ConvertContext`]: plainpack_core::ConvertContext

pub mod ca;
pub mod converter;
pub mod error;
pub mod trust;

// Re-exports
pub use converter::{Converter, Pipeline, RunSummary};
pub use error::{ConvertError, Result};
pub use trust::{
    AssembledBundle, Bundle, BundleSource, DEFAULT_TARGET_KEY, Resolution, SourceKeyRef,
    TrustBundleConverter, assemble, publish_assembled, resolve_source,
};
