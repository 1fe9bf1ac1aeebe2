use std::path::PathBuf;

use did_helper_core::{Classified, ErrorKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode keystore {path}: {reason}")]
    KeystoreDecode { path: PathBuf, reason: String },
    #[error("invalid PEM: {0}")]
    PemFormat(String),
    #[error("failed to parse DER certificate: {0}")]
    CertParse(#[from] x509_cert::der::Error),
    #[error("unsupported private key format (not PKCS#8, PKCS#1 or SEC1)")]
    UnsupportedKeyFormat,
}

impl Classified for LoadError {
    fn kind(&self) -> ErrorKind {
        match self {
            LoadError::Io { .. } => ErrorKind::Io,
            LoadError::KeystoreDecode { .. }
            | LoadError::PemFormat(_)
            | LoadError::CertParse(_) => ErrorKind::Format,
            LoadError::UnsupportedKeyFormat => ErrorKind::Unsupported,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("unsupported curve: {0}")]
    UnsupportedCurve(String),
    #[error("unsupported key algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("no key loaded")]
    MissingKey,
}

impl Classified for ClassifyError {
    fn kind(&self) -> ErrorKind {
        match self {
            ClassifyError::UnsupportedCurve(_) | ClassifyError::UnsupportedAlgorithm(_) => {
                ErrorKind::Unsupported
            }
            ClassifyError::InvalidKey(_) => ErrorKind::Format,
            ClassifyError::MissingKey => ErrorKind::Config,
        }
    }
}
