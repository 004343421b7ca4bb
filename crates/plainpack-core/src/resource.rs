//! Typed views over Kubernetes-shaped manifests
//!
//! Manifests travel through the pipeline as loosely-typed YAML documents.
//! The records here are the narrow views converters need: every field is
//! optional or defaulted, because operator tooling routinely emits partial
//! objects and the pipeline must keep going anyway.

use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

/// A single parsed YAML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    value: Value,
}

impl Manifest {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Parse a (possibly multi-document) YAML string.
    pub fn parse_all(text: &str) -> Result<Vec<Manifest>> {
        let mut docs = Vec::new();
        for document in serde_yaml::Deserializer::from_str(text) {
            let value = Value::deserialize(document)?;
            // `---` separators around empty documents parse as null
            if value.is_null() {
                continue;
            }
            docs.push(Manifest::new(value));
        }
        Ok(docs)
    }

    /// Read and parse every document in a YAML file.
    pub fn load_file(path: &Path) -> Result<Vec<Manifest>> {
        let text = std::fs::read_to_string(path)?;
        Self::parse_all(&text)
    }

    /// The `kind` field, when present and a string.
    pub fn kind(&self) -> Option<&str> {
        self.value.get("kind").and_then(Value::as_str)
    }

    /// The `metadata.name` field, when present and a string.
    pub fn name(&self) -> Option<&str> {
        self.value
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Serialize back to a YAML document.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.value)?)
    }

    /// Deserialize the whole document into a typed record, falling back to
    /// the record's default when the document does not fit.
    pub fn as_record<T: DeserializeOwned + Default>(&self) -> T {
        serde_yaml::from_value(self.value.clone()).unwrap_or_default()
    }
}

/// Metadata subset the pipeline cares about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub name: String,
}

/// Secret payloads as the pipeline sees them.
///
/// Kubernetes Secrets carry plain text under `stringData` and base64 text
/// under `data`; both can be present for different keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecretRecord {
    pub string_data: BTreeMap<String, String>,
    pub data: BTreeMap<String, String>,
}

impl SecretRecord {
    /// Lenient view over a Secret manifest; a malformed document reads as
    /// an empty record.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        manifest.as_record()
    }

    /// Value for `key`: `stringData` wins, then `data` after base64
    /// decoding. A value that does not decode cleanly is returned raw.
    pub fn lookup(&self, key: &str) -> Option<String> {
        if let Some(plain) = self.string_data.get(key) {
            return Some(plain.clone());
        }
        self.data.get(key).map(|raw| decode_base64_lenient(raw))
    }
}

/// Kubernetes tooling wraps long base64 values, so whitespace is stripped
/// before decoding. A value that still fails to decode, or decodes to
/// non-UTF-8 bytes, is used as-is.
fn decode_base64_lenient(raw: &str) -> String {
    let compact: String = raw.split_whitespace().collect();
    match base64::engine::general_purpose::STANDARD.decode(compact.as_bytes()) {
        Ok(bytes) => String::from_utf8(bytes).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}

/// A ConfigMap in either of its two pipeline representations: the full
/// object with a nested `data` mapping, or a flat key/value mapping.
///
/// Synthetic outputs produced by converters use this shape too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigMapRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    /// `Some` whenever the record carries a `data` field, even an empty one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, String>>,

    /// Remaining top-level keys, the flat representation.
    #[serde(flatten)]
    pub flat: BTreeMap<String, Value>,
}

impl ConfigMapRecord {
    /// Lenient view over a ConfigMap manifest; a malformed document reads
    /// as an empty record.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        manifest.as_record()
    }

    /// Value for `key`. The nested `data` mapping wins whenever the field
    /// is present, even when empty; only records without it are read flat.
    pub fn get(&self, key: &str) -> Option<&str> {
        match &self.data {
            Some(data) => data.get(key).map(String::as_str),
            None => self.flat.get(key).and_then(Value::as_str),
        }
    }

    /// Build a synthetic single-key record, the output shape of converters.
    pub fn synthetic(name: &str, key: String, value: String) -> Self {
        let mut data = BTreeMap::new();
        data.insert(key, value);
        Self {
            metadata: Some(Metadata {
                name: name.to_string(),
            }),
            data: Some(data),
            flat: BTreeMap::new(),
        }
    }

    /// Full `v1/ConfigMap` manifest, ready to be written out.
    pub fn to_manifest(&self) -> Result<Manifest> {
        let mut mapping = Mapping::new();
        mapping.insert("apiVersion".into(), "v1".into());
        mapping.insert("kind".into(), "ConfigMap".into());
        if let Some(metadata) = &self.metadata {
            mapping.insert("metadata".into(), serde_yaml::to_value(metadata)?);
        }
        if let Some(data) = &self.data {
            mapping.insert("data".into(), serde_yaml::to_value(data)?);
        }
        for (key, value) in &self.flat {
            mapping.insert(Value::String(key.clone()), value.clone());
        }
        Ok(Manifest::new(Value::Mapping(mapping)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(text: &str) -> Manifest {
        Manifest::parse_all(text).unwrap().remove(0)
    }

    #[test]
    fn test_parse_all_multi_document() {
        let docs = Manifest::parse_all(
            "kind: Secret\nmetadata:\n  name: a\n---\nkind: ConfigMap\nmetadata:\n  name: b\n",
        )
        .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].kind(), Some("Secret"));
        assert_eq!(docs[0].name(), Some("a"));
        assert_eq!(docs[1].kind(), Some("ConfigMap"));
        assert_eq!(docs[1].name(), Some("b"));
    }

    #[test]
    fn test_parse_all_skips_empty_documents() {
        let docs = Manifest::parse_all("---\nkind: Secret\n---\n").unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_missing_kind_and_name() {
        let doc = manifest("spec: {}\n");
        assert_eq!(doc.kind(), None);
        assert_eq!(doc.name(), None);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.yaml");
        std::fs::write(&path, "kind: Secret\nmetadata:\n  name: tls\n").unwrap();

        let docs = Manifest::load_file(&path).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name(), Some("tls"));
    }

    #[test]
    fn test_secret_lookup_prefers_string_data() {
        let record = SecretRecord::from_manifest(&manifest(
            "kind: Secret\nstringData:\n  ca.crt: plain\ndata:\n  ca.crt: UEVNLUE=\n",
        ));

        assert_eq!(record.lookup("ca.crt"), Some("plain".to_string()));
    }

    #[test]
    fn test_secret_lookup_decodes_data() {
        let record = SecretRecord::from_manifest(&manifest(
            "kind: Secret\ndata:\n  ca.crt: UEVNLUE=\n",
        ));

        assert_eq!(record.lookup("ca.crt"), Some("PEM-A".to_string()));
    }

    #[test]
    fn test_secret_lookup_decodes_wrapped_base64() {
        let record = SecretRecord::from_manifest(&manifest(
            "kind: Secret\ndata:\n  ca.crt: \"UEVN\\nLUE=\"\n",
        ));

        assert_eq!(record.lookup("ca.crt"), Some("PEM-A".to_string()));
    }

    #[test]
    fn test_secret_lookup_keeps_raw_on_invalid_base64() {
        let record = SecretRecord::from_manifest(&manifest(
            "kind: Secret\ndata:\n  ca.crt: not-base64!!\n",
        ));

        assert_eq!(record.lookup("ca.crt"), Some("not-base64!!".to_string()));
    }

    #[test]
    fn test_secret_lookup_keeps_raw_on_non_utf8() {
        // base64 of the single byte 0xFF
        let record =
            SecretRecord::from_manifest(&manifest("kind: Secret\ndata:\n  ca.crt: /w==\n"));

        assert_eq!(record.lookup("ca.crt"), Some("/w==".to_string()));
    }

    #[test]
    fn test_secret_lookup_missing_key() {
        let record = SecretRecord::from_manifest(&manifest("kind: Secret\ndata: {}\n"));
        assert_eq!(record.lookup("ca.crt"), None);
    }

    #[test]
    fn test_configmap_nested_data_wins() {
        let record = ConfigMapRecord::from_manifest(&manifest(
            "kind: ConfigMap\ndata:\n  ca.crt: nested\nca.crt: flat\n",
        ));

        assert_eq!(record.get("ca.crt"), Some("nested"));
    }

    #[test]
    fn test_configmap_empty_data_never_reads_flat() {
        let record =
            ConfigMapRecord::from_manifest(&manifest("kind: ConfigMap\ndata: {}\nca.crt: flat\n"));

        assert_eq!(record.get("ca.crt"), None);
    }

    #[test]
    fn test_configmap_flat_form() {
        let record = ConfigMapRecord::from_manifest(&manifest("ca.crt: flat\n"));
        assert_eq!(record.get("ca.crt"), Some("flat"));
    }

    #[test]
    fn test_configmap_flat_non_string_value() {
        let record = ConfigMapRecord::from_manifest(&manifest("ca.crt: [1, 2]\n"));
        assert_eq!(record.get("ca.crt"), None);
    }

    #[test]
    fn test_synthetic_to_manifest() {
        let record =
            ConfigMapRecord::synthetic("ca1", "ca-certificates.crt".to_string(), "PEM\n".to_string());
        let manifest = record.to_manifest().unwrap();

        assert_eq!(manifest.kind(), Some("ConfigMap"));
        assert_eq!(manifest.name(), Some("ca1"));
        let yaml = manifest.to_yaml().unwrap();
        assert!(yaml.contains("apiVersion: v1"));
        assert!(yaml.contains("ca-certificates.crt"));
    }
}
