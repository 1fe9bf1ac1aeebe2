use std::path::PathBuf;

use did_helper_core::{Classified, ErrorKind};
use did_helper_keys::LoadError;
use did_helper_server::ServeError;
use thiserror::Error;

use crate::derive::{DeriveError, UnsupportedDidType};

/// Process exit status, one per failing stage.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    Config = 1,
    UnsupportedDidType = 2,
    Derive = 3,
    Marshal = 4,
    Jwk = 5,
    Load = 6,
    Write = 7,
    Serve = 8,
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(value: ExitStatus) -> Self {
        std::process::ExitCode::from(value as u8)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    UnsupportedDidType(#[from] UnsupportedDidType),
    #[error("failed to derive did: {0}")]
    Derive(#[source] DeriveError),
    #[error("failed to serialize document: {0}")]
    Marshal(#[source] serde_json::Error),
    #[error("failed to generate JWK: {0}")]
    Jwk(#[source] DeriveError),
    #[error("failed to load key material: {0}")]
    Load(#[from] LoadError),
    #[error("serving needs a certificate, none was loaded")]
    MissingCertificate,
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Serve(#[from] ServeError),
}

impl Error {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Error::Config(_) => ExitStatus::Config,
            Error::UnsupportedDidType(_) => ExitStatus::UnsupportedDidType,
            Error::Derive(_) => ExitStatus::Derive,
            Error::Marshal(_) => ExitStatus::Marshal,
            Error::Jwk(_) => ExitStatus::Jwk,
            Error::Load(_) | Error::MissingCertificate => ExitStatus::Load,
            Error::Write { .. } => ExitStatus::Write,
            Error::Serve(_) => ExitStatus::Serve,
        }
    }
}

impl Classified for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) | Error::MissingCertificate => ErrorKind::Config,
            Error::UnsupportedDidType(_) => ErrorKind::Unsupported,
            Error::Derive(e) | Error::Jwk(e) => e.kind(),
            Error::Marshal(_) => ErrorKind::Encoding,
            Error::Load(e) => e.kind(),
            Error::Write { .. } | Error::Serve(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_distinct() {
        let statuses = [
            ExitStatus::Success,
            ExitStatus::Config,
            ExitStatus::UnsupportedDidType,
            ExitStatus::Derive,
            ExitStatus::Marshal,
            ExitStatus::Jwk,
            ExitStatus::Load,
            ExitStatus::Write,
            ExitStatus::Serve,
        ];

        for (i, status) in statuses.iter().enumerate() {
            assert_eq!(*status as u8, i as u8);
        }
    }

    #[test]
    fn test_unsupported_did_type() {
        let err = Error::from(UnsupportedDidType("peer".to_string()));
        assert_eq!(err.exit_status(), ExitStatus::UnsupportedDidType);
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert_eq!(err.to_string(), "did type peer is not supported");
    }
}
