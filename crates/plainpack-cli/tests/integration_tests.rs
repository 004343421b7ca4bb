//! Integration tests for CLI commands

use serde::Deserialize;
use serde_yaml::Value;
use std::process::Command;

/// Helper to run plainpack command
fn plainpack(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_plainpack"))
        .args(args)
        .output()
        .expect("Failed to execute plainpack")
}

/// Get the fixtures path
fn fixtures_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures")
}

fn parse_documents(text: &str) -> Vec<Value> {
    serde_yaml::Deserializer::from_str(text)
        .map(|document| Value::deserialize(document).expect("stdout should be valid YAML"))
        .collect()
}

fn find_by_name<'a>(documents: &'a [Value], name: &str) -> Option<&'a Value> {
    documents
        .iter()
        .find(|document| document["metadata"]["name"].as_str() == Some(name))
}

mod convert_command {
    use super::*;

    #[test]
    fn test_convert_to_stdout() {
        let output = plainpack(&["convert", "-f", &format!("{}/trust-demo", fixtures_path())]);

        assert!(output.status.success(), "Expected success for demo fixtures");

        let stdout = String::from_utf8_lossy(&output.stdout);
        let documents = parse_documents(&stdout);
        let bundle = find_by_name(&documents, "app-trust").expect("synthetic ConfigMap on stdout");

        assert_eq!(bundle["kind"].as_str(), Some("ConfigMap"));
        assert_eq!(
            bundle["data"]["ca-certificates.crt"].as_str(),
            Some("PEM-A\nPEM-B\nPEM-C\n")
        );
    }

    #[test]
    fn test_convert_reports_warnings_on_stderr() {
        let output = plainpack(&["convert", "-f", &format!("{}/trust-demo", fixtures_path())]);

        // best effort: a broken bundle warns but the run still succeeds
        assert!(output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Bundle 'broken-trust': configMap 'missing-roots' key 'nope' not found"));
        assert!(stderr.contains("Bundle 'broken-trust': no sources resolved — skipped"));

        // warnings never leak into the YAML stream
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(!stdout.contains("broken-trust"));
    }

    #[test]
    fn test_convert_to_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");

        let output = plainpack(&[
            "convert",
            "-f",
            &format!("{}/trust-demo", fixtures_path()),
            "-o",
            out.to_str().unwrap(),
        ]);

        assert!(output.status.success());
        assert!(out.join("configmap-app-trust.yaml").exists());

        let written = std::fs::read_to_string(out.join("configmap-app-trust.yaml")).unwrap();
        assert!(written.contains("kind: ConfigMap"));
        assert!(written.contains("ca-certificates.crt"));
    }

    #[test]
    fn test_convert_all_includes_passthrough() {
        let output = plainpack(&[
            "convert",
            "-f",
            &format!("{}/trust-demo", fixtures_path()),
            "--all",
        ]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        let documents = parse_documents(&stdout);

        assert!(find_by_name(&documents, "tls-roots").is_some());
        assert!(find_by_name(&documents, "extra-roots").is_some());
        assert!(find_by_name(&documents, "app-trust").is_some());
    }

    #[test]
    fn test_convert_missing_path_fails() {
        let output = plainpack(&["convert", "-f", "does-not-exist"]);
        assert!(!output.status.success());
    }
}

mod converters_command {
    use super::*;

    #[test]
    fn test_lists_trust_bundle() {
        let output = plainpack(&["converters"]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("trust-bundle"));
        assert!(stdout.contains("Bundle"));
    }
}
