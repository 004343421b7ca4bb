//! Trust bundle conversion
//!
//! Resolves trust-manager style `Bundle` resources into a single
//! concatenated PEM blob, published as a synthetic ConfigMap. Certificate
//! material comes from referenced Secrets, referenced ConfigMaps, inline
//! text, or the system trust roots, merged in declaration order.
//!
//! Resolution is best effort: a source that cannot be resolved degrades to
//! a warning and the rest of the bundle still assembles. A bundle where
//! nothing resolves is skipped with a single warning.

use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;

use plainpack_core::{
    ConfigMapRecord, ConvertContext, DiagnosticSink, Manifest, OutputSink, SecretRecord,
};

use crate::ca;
use crate::converter::Converter;
use crate::error::Result;

/// Target key used when the Bundle does not configure one.
pub const DEFAULT_TARGET_KEY: &str = "ca-certificates.crt";

/// Runs after secret-producing stages, before configmap consumers.
const TRUST_BUNDLE_PRIORITY: i32 = 200;

/// A parsed Bundle specification.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub name: String,
    /// Key of the single entry in the output ConfigMap.
    pub target_key: String,
    /// Declaration order decides concatenation order.
    pub sources: Vec<BundleSource>,
}

impl Bundle {
    /// Extract the bundle view from a manifest, tolerating missing or
    /// malformed fields the way the rest of the pipeline does.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let spec = manifest.value().get("spec");
        let target_key = spec
            .and_then(|s| s.get("target"))
            .and_then(|t| t.get("configMap"))
            .and_then(|c| c.get("key"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_TARGET_KEY)
            .to_string();
        let sources = spec
            .and_then(|s| s.get("sources"))
            .and_then(Value::as_sequence)
            .map(|entries| entries.iter().map(BundleSource::classify).collect())
            .unwrap_or_default();

        Self {
            name: manifest.name().unwrap_or("?").to_string(),
            target_key,
            sources,
        }
    }
}

/// Reference to one key of a named Secret or ConfigMap.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceKeyRef {
    pub name: String,
    pub key: String,
}

/// One entry of `spec.sources`; exactly one recognized field wins.
#[derive(Debug, Clone, PartialEq)]
pub enum BundleSource {
    /// `useDefaultCAs: true`, the system trust roots.
    DefaultCas,
    /// `secret: {name, key}`
    Secret(SourceKeyRef),
    /// `configMap: {name, key}`
    ConfigMap(SourceKeyRef),
    /// `inLine: <pem text>`
    Inline(String),
    /// Anything else; contributes nothing and warns about nothing.
    Unknown,
}

/// Lenient wire shape of a source entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawSource {
    // camelCase would give `useDefaultCas`; the wire key capitalizes CAs
    #[serde(rename = "useDefaultCAs")]
    use_default_cas: Option<bool>,
    secret: Option<SourceKeyRef>,
    config_map: Option<SourceKeyRef>,
    in_line: Option<String>,
}

impl BundleSource {
    /// Classify a raw YAML entry. Field priority mirrors resolution order;
    /// `useDefaultCAs: false` falls through to the other fields.
    pub fn classify(entry: &Value) -> Self {
        let raw: RawSource = serde_yaml::from_value(entry.clone()).unwrap_or_default();
        if raw.use_default_cas == Some(true) {
            BundleSource::DefaultCas
        } else if let Some(secret) = raw.secret {
            BundleSource::Secret(secret)
        } else if let Some(config_map) = raw.config_map {
            BundleSource::ConfigMap(config_map)
        } else if let Some(text) = raw.in_line {
            BundleSource::Inline(text)
        } else {
            BundleSource::Unknown
        }
    }
}

/// Outcome of resolving a single source.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// PEM text to contribute.
    Text(String),
    /// Human-readable warning; the source contributes nothing.
    Diagnostic(String),
    /// Empty or unrecognized source; no contribution, no warning.
    Skip,
}

/// Resolve one source against the known Secrets and ConfigMaps.
pub fn resolve_source(
    source: &BundleSource,
    secrets: &BTreeMap<String, SecretRecord>,
    configmaps: &BTreeMap<String, ConfigMapRecord>,
    bundle_name: &str,
) -> Resolution {
    resolve_source_with(source, secrets, configmaps, bundle_name, ca::load_default_cas)
}

fn resolve_source_with(
    source: &BundleSource,
    secrets: &BTreeMap<String, SecretRecord>,
    configmaps: &BTreeMap<String, ConfigMapRecord>,
    bundle_name: &str,
    default_cas: fn() -> Option<String>,
) -> Resolution {
    match source {
        BundleSource::DefaultCas => match default_cas() {
            Some(cas) => Resolution::Text(cas),
            None => Resolution::Diagnostic(format!(
                "Bundle '{bundle_name}': useDefaultCAs requested but no system CA bundle found"
            )),
        },
        BundleSource::Secret(source_ref) => {
            // An absent Secret reads as an empty record, same diagnostic
            // as an existing Secret lacking the key.
            let value = secrets
                .get(&source_ref.name)
                .and_then(|secret| secret.lookup(&source_ref.key));
            match value {
                Some(text) => Resolution::Text(text),
                None => Resolution::Diagnostic(format!(
                    "Bundle '{bundle_name}': secret '{}' key '{}' not found",
                    source_ref.name, source_ref.key
                )),
            }
        }
        BundleSource::ConfigMap(source_ref) => {
            let value = configmaps
                .get(&source_ref.name)
                .and_then(|configmap| configmap.get(&source_ref.key));
            match value {
                Some(text) => Resolution::Text(text.to_string()),
                None => Resolution::Diagnostic(format!(
                    "Bundle '{bundle_name}': configMap '{}' key '{}' not found",
                    source_ref.name, source_ref.key
                )),
            }
        }
        BundleSource::Inline(text) if !text.is_empty() => Resolution::Text(text.clone()),
        BundleSource::Inline(_) | BundleSource::Unknown => Resolution::Skip,
    }
}

/// Result of assembling one bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledBundle {
    /// Synthetic ConfigMap; absent when nothing resolved.
    pub output: Option<ConfigMapRecord>,
    /// Warnings accumulated across sources, plus the skip warning.
    pub diagnostics: Vec<String>,
    /// Number of sources that contributed text.
    pub source_count: usize,
}

/// Assemble a bundle from its sources in declaration order.
pub fn assemble(
    bundle: &Bundle,
    secrets: &BTreeMap<String, SecretRecord>,
    configmaps: &BTreeMap<String, ConfigMapRecord>,
) -> AssembledBundle {
    assemble_with(bundle, secrets, configmaps, ca::load_default_cas)
}

fn assemble_with(
    bundle: &Bundle,
    secrets: &BTreeMap<String, SecretRecord>,
    configmaps: &BTreeMap<String, ConfigMapRecord>,
    default_cas: fn() -> Option<String>,
) -> AssembledBundle {
    let mut parts: Vec<String> = Vec::new();
    let mut diagnostics: Vec<String> = Vec::new();

    for source in &bundle.sources {
        match resolve_source_with(source, secrets, configmaps, &bundle.name, default_cas) {
            Resolution::Text(text) if !text.is_empty() => parts.push(text),
            Resolution::Text(_) => {}
            Resolution::Diagnostic(message) => diagnostics.push(message),
            Resolution::Skip => {}
        }
    }

    if parts.is_empty() {
        diagnostics.push(format!(
            "Bundle '{}': no sources resolved — skipped",
            bundle.name
        ));
        return AssembledBundle {
            output: None,
            diagnostics,
            source_count: 0,
        };
    }

    // Strip per-part trailing newlines so no source injects blank lines at
    // the boundaries, rejoin with single newlines, end with exactly one.
    let merged = parts
        .iter()
        .map(|part| part.trim_end_matches('\n'))
        .collect::<Vec<_>>()
        .join("\n")
        + "\n";

    let output = ConfigMapRecord::synthetic(&bundle.name, bundle.target_key.clone(), merged);
    AssembledBundle {
        output: Some(output),
        diagnostics,
        source_count: parts.len(),
    }
}

/// Publish an assembled bundle into the shared sinks.
pub fn publish_assembled<S>(bundle_name: &str, assembled: AssembledBundle, sink: &mut S)
where
    S: DiagnosticSink + OutputSink,
{
    if let Some(output) = assembled.output {
        tracing::info!(
            bundle = %bundle_name,
            sources = assembled.source_count,
            "generated trust bundle"
        );
        sink.publish(bundle_name, output);
    }
    for message in assembled.diagnostics {
        sink.warn(message);
    }
}

/// Converter for trust-manager style `Bundle` resources.
pub struct TrustBundleConverter;

impl Converter for TrustBundleConverter {
    fn name(&self) -> &'static str {
        "trust-bundle"
    }

    fn kinds(&self) -> &'static [&'static str] {
        &["Bundle"]
    }

    fn priority(&self) -> i32 {
        TRUST_BUNDLE_PRIORITY
    }

    fn convert(&self, manifests: &[Manifest], ctx: &mut ConvertContext) -> Result<()> {
        for manifest in manifests {
            let bundle = Bundle::from_manifest(manifest);
            let assembled = assemble(&bundle, &ctx.secrets, &ctx.configmaps);
            publish_assembled(&bundle.name, assembled, ctx);
        }
        Ok(())
    }
}
