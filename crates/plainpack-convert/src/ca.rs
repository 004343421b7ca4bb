//! System default CA bundle discovery
//!
//! `useDefaultCAs` sources pull the host trust roots. Lookup is an ordered
//! chain of strategies, first success wins: the platform trust store, then
//! well-known bundle files. Every step is best effort; a miss means trying
//! the next strategy, never an error.

use base64::Engine as _;
use std::fs;
use std::path::Path;

/// Well-known CA bundle locations, probed in order.
/// macOS, Debian/Ubuntu, Alpine, RHEL/Fedora.
const CA_BUNDLE_PATHS: &[&str] = &[
    "/etc/ssl/cert.pem",
    "/etc/ssl/certs/ca-certificates.crt",
    "/etc/ssl/certs/ca-bundle.crt",
];

/// Concatenated PEM text of the system default CAs, if discoverable.
pub fn load_default_cas() -> Option<String> {
    let strategies: &[fn() -> Option<String>] = &[native_trust_store, well_known_paths];
    strategies.iter().find_map(|strategy| strategy())
}

/// Certificates from the platform trust store, re-wrapped as PEM.
fn native_trust_store() -> Option<String> {
    let certs = rustls_native_certs::load_native_certs().ok()?;
    if certs.is_empty() {
        return None;
    }
    let mut pem = String::new();
    for cert in &certs {
        wrap_certificate(cert.as_ref(), &mut pem);
    }
    Some(pem)
}

/// First readable well-known bundle file wins.
fn well_known_paths() -> Option<String> {
    CA_BUNDLE_PATHS
        .iter()
        .find_map(|path| read_bundle(Path::new(path)))
}

fn read_bundle(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) if !text.is_empty() => Some(text),
        _ => None,
    }
}

/// One DER certificate as a PEM `CERTIFICATE` block with a 64-column body.
fn wrap_certificate(der: &[u8], out: &mut String) {
    let encoded = base64::engine::general_purpose::STANDARD.encode(der);
    out.push_str("-----BEGIN CERTIFICATE-----\n");
    let mut rest = encoded.as_str();
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(rest.len().min(64));
        out.push_str(line);
        out.push('\n');
        rest = tail;
    }
    out.push_str("-----END CERTIFICATE-----\n");
}
