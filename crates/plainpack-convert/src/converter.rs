//! Converter registry and pipeline run loop
//!
//! A converter claims one or more manifest kinds and rewrites them into
//! plain resources through the shared context. Converters run in priority
//! order; lower numbers run first, so a stage that produces Secrets can be
//! ordered before one that reads them. A converter that fails degrades to
//! a warning and the run keeps going.

use std::collections::BTreeMap;

use plainpack_core::{ConfigMapRecord, ConvertContext, DiagnosticSink, Manifest, SecretRecord};

use crate::error::Result;
use crate::trust::TrustBundleConverter;

/// A stage that rewrites custom resources of specific kinds.
pub trait Converter {
    /// Short identifier used in warnings and listings.
    fn name(&self) -> &'static str;

    /// Manifest kinds this converter claims.
    fn kinds(&self) -> &'static [&'static str];

    /// Lower runs earlier.
    fn priority(&self) -> i32;

    fn convert(&self, manifests: &[Manifest], ctx: &mut ConvertContext) -> Result<()>;
}

/// Outcome of a pipeline run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Kind -> number of manifests handed to a converter.
    pub converted: BTreeMap<String, usize>,

    /// Manifests no converter claimed; they are already plain.
    pub passthrough: Vec<Manifest>,

    /// Names of synthetic ConfigMaps produced during the run.
    pub produced: Vec<String>,
}

/// Ordered set of converters over one manifest collection.
pub struct Pipeline {
    converters: Vec<Box<dyn Converter>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    /// Pipeline with every built-in converter registered.
    pub fn with_defaults() -> Self {
        let mut pipeline = Self::new();
        pipeline.register(Box::new(TrustBundleConverter));
        pipeline
    }

    pub fn register(&mut self, converter: Box<dyn Converter>) {
        self.converters.push(converter);
        self.converters.sort_by_key(|converter| converter.priority());
    }

    pub fn converters(&self) -> impl Iterator<Item = &dyn Converter> {
        self.converters.iter().map(Box::as_ref)
    }

    /// Run every registered converter over the manifest set.
    ///
    /// Plain Secret and ConfigMap manifests seed the context before any
    /// converter runs, so converters can reference them by name. A failing
    /// converter becomes a warning; the run never aborts half way.
    pub fn run(&self, manifests: &[Manifest], ctx: &mut ConvertContext) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut by_kind: BTreeMap<&str, Vec<Manifest>> = BTreeMap::new();

        for manifest in manifests {
            match manifest.kind() {
                Some("Secret") => {
                    if let Some(name) = manifest.name() {
                        ctx.secrets
                            .insert(name.to_string(), SecretRecord::from_manifest(manifest));
                    }
                    summary.passthrough.push(manifest.clone());
                }
                Some("ConfigMap") => {
                    if let Some(name) = manifest.name() {
                        ctx.configmaps
                            .insert(name.to_string(), ConfigMapRecord::from_manifest(manifest));
                    }
                    summary.passthrough.push(manifest.clone());
                }
                Some(kind) if self.claims(kind) => {
                    by_kind.entry(kind).or_default().push(manifest.clone());
                }
                _ => summary.passthrough.push(manifest.clone()),
            }
        }

        for converter in &self.converters {
            for kind in converter.kinds() {
                let Some(batch) = by_kind.get(*kind) else {
                    continue;
                };
                match converter.convert(batch, ctx) {
                    Ok(()) => {
                        *summary.converted.entry((*kind).to_string()).or_default() += batch.len();
                    }
                    Err(error) => ctx.warn(format!(
                        "converter '{}' failed on kind '{}': {}",
                        converter.name(),
                        kind,
                        error
                    )),
                }
            }
        }

        summary.produced = ctx.produced().to_vec();
        summary
    }

    fn claims(&self, kind: &str) -> bool {
        self.converters
            .iter()
            .any(|converter| converter.kinds().contains(&kind))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
