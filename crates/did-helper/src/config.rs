use std::path::PathBuf;

use clap::Parser;
use did_helper_keys::SourceDescriptor;

use crate::output::OutputFormat;

/// Path the certificate is served under, relative to the host URL.
pub const CERT_URL_PATH: &str = "/.well-known/tls.crt";

/// Derive a DID from a key or certificate and emit it as a document.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "did-helper", version)]
pub struct Config {
    /// PKCS#12 keystore, used when no PEM path is given.
    #[arg(long)]
    pub keystore_path: Option<PathBuf>,

    /// Password of the keystore.
    #[arg(long, default_value = "")]
    pub keystore_password: String,

    /// PEM private key (PKCS#8, PKCS#1 or SEC1).
    #[arg(long)]
    pub key_path: Option<PathBuf>,

    /// PEM certificate.
    #[arg(long)]
    pub cert_path: Option<PathBuf>,

    /// DID method: key, jwk or web.
    #[arg(long, default_value = "key")]
    pub did_type: String,

    /// Expected key algorithm: P-256, P-384 or ED-25519.
    #[arg(long)]
    pub key_type: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub output_format: OutputFormat,

    /// Write the document to this file instead of printing it.
    #[arg(long)]
    pub output_file: Option<PathBuf>,

    /// Serve the document and certificate over HTTP.
    #[arg(long)]
    pub run_server: bool,

    #[arg(long, default_value_t = 8080)]
    pub server_port: u16,

    /// Base URL the DID is hosted at. Required for did:web.
    #[arg(long)]
    pub host_url: Option<String>,

    /// `x5u` of the embedded JWK. Defaults to the certificate route under
    /// the host URL.
    #[arg(long)]
    pub cert_url: Option<String>,
}

impl Config {
    /// Sources to load key material from. PEM paths take precedence over
    /// the keystore.
    pub fn sources(&self) -> Vec<SourceDescriptor> {
        if self.key_path.is_some() || self.cert_path.is_some() {
            self.key_path
                .iter()
                .cloned()
                .map(SourceDescriptor::PemPrivateKey)
                .chain(
                    self.cert_path
                        .iter()
                        .cloned()
                        .map(SourceDescriptor::PemCertificate),
                )
                .collect()
        } else {
            self.keystore_path
                .iter()
                .map(|path| SourceDescriptor::Keystore {
                    path: path.clone(),
                    password: self.keystore_password.clone(),
                })
                .collect()
        }
    }

    pub fn cert_url(&self) -> Option<String> {
        if let Some(url) = self.cert_url.as_deref().filter(|url| !url.is_empty()) {
            return Some(url.to_string());
        }

        let host = self.host_url.as_deref().filter(|url| !url.is_empty())?;
        let host = host.strip_suffix('/').unwrap_or(host);
        Some(format!("{host}{CERT_URL_PATH}"))
    }

    /// Whether the document is served rather than written or printed.
    pub fn serves(&self) -> bool {
        self.run_server && self.output_file.is_none()
    }
}
