//! Picks the key a DID method needs and runs its encoder.

use std::{fmt::Display, str::FromStr};

use did_helper_core::{Classified, ErrorKind, did::Did, document::JwkValue};
use did_helper_keys::{Algorithm, ClassifyError, KeyMaterial, PublicKey};
use did_helper_method_jwk::{JwkEncoder, JwkError};
use did_helper_method_key::DidKeyError;
use did_helper_method_web::DidWebError;
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DidMethod {
    Key,
    Jwk,
    Web,
}

impl DidMethod {
    pub fn needs_key_material(self) -> bool {
        !matches!(self, DidMethod::Web)
    }
}

impl Display for DidMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DidMethod::Key => did_helper_method_key::NAME,
            DidMethod::Jwk => did_helper_method_jwk::NAME,
            DidMethod::Web => did_helper_method_web::NAME,
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("did type {0} is not supported")]
pub struct UnsupportedDidType(pub String);

impl FromStr for DidMethod {
    type Err = UnsupportedDidType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "key" => Ok(DidMethod::Key),
            "jwk" => Ok(DidMethod::Jwk),
            "web" => Ok(DidMethod::Web),
            other => Err(UnsupportedDidType(other.to_string())),
        }
    }
}

#[derive(Error, Debug)]
pub enum DeriveError {
    #[error(transparent)]
    Classify(#[from] ClassifyError),
    #[error(transparent)]
    Key(#[from] DidKeyError),
    #[error(transparent)]
    Jwk(#[from] JwkError),
    #[error(transparent)]
    Web(#[from] DidWebError),
    #[error("expected a {expected} key but found {found}")]
    KeyTypeMismatch {
        expected: Algorithm,
        found: Algorithm,
    },
}

impl Classified for DeriveError {
    fn kind(&self) -> ErrorKind {
        match self {
            DeriveError::Classify(e) => e.kind(),
            DeriveError::Key(e) => e.kind(),
            DeriveError::Jwk(e) => e.kind(),
            DeriveError::Web(e) => e.kind(),
            DeriveError::KeyTypeMismatch { .. } => ErrorKind::Unsupported,
        }
    }
}

/// Derives DIDs and JWKs from a single set of loaded key material.
pub struct Deriver<'a> {
    pub material: &'a KeyMaterial,
    /// Algorithm the classified key must have, if any.
    pub expected: Option<Algorithm>,
}

impl<'a> Deriver<'a> {
    pub fn new(material: &'a KeyMaterial) -> Self {
        Self {
            material,
            expected: None,
        }
    }

    /// Sets the expected algorithm from a key type name such as `P-256`.
    pub fn expect_key_type(mut self, name: &str) -> Result<Self, DeriveError> {
        self.expected = Some(did_helper_method_key::parse_key_type(name)?);
        Ok(self)
    }

    pub fn did(&self, method: DidMethod, host_url: Option<&str>) -> Result<Did, DeriveError> {
        match method {
            DidMethod::Key => {
                let key = self.check(self.material.classify_private_first()?)?;
                Ok(did_helper_method_key::to_did(&key))
            }
            DidMethod::Jwk => {
                let key = self.check(self.material.classify_certificate_first()?)?;
                Ok(JwkEncoder::default().to_did(&key)?)
            }
            DidMethod::Web => Ok(did_helper_method_web::from_url(host_url.unwrap_or_default())?),
        }
    }

    /// Public JWK of the certificate, or of the private key when no
    /// certificate was loaded.
    pub fn jwk(&self, cert_url: Option<String>) -> Result<JwkValue, DeriveError> {
        let key = self.check(self.material.classify_certificate_first()?)?;
        Ok(JwkEncoder::new(cert_url).to_jwk_value(&key)?)
    }

    fn check(&self, key: PublicKey) -> Result<PublicKey, DeriveError> {
        match self.expected {
            Some(expected) if expected != key.algorithm() => Err(DeriveError::KeyTypeMismatch {
                expected,
                found: key.algorithm(),
            }),
            _ => Ok(key),
        }
    }
}
