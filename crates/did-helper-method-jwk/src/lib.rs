//! did-helper implementation of [did:jwk](https://github.com/quartzjer/did-jwk/blob/main/spec.md).

use std::collections::BTreeMap;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use did_helper_core::{Classified, ErrorKind, did::Did, document::JwkValue};
use did_helper_keys::PublicKey;
use jose_jwk::Jwk;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

mod thumbprint;

pub use thumbprint::thumbprint;

pub const NAME: &str = "jwk";

/// Builds JWKs and `did:jwk` identifiers from classified public keys.
///
/// Keys come in as [PublicKey], so private members can never reach the
/// output.
#[derive(Debug, Default, Clone)]
pub struct JwkEncoder {
    /// Advisory `x5u` value, not checked for reachability.
    pub cert_url: Option<String>,
}

impl JwkEncoder {
    pub fn new(cert_url: Option<String>) -> Self {
        Self { cert_url }
    }

    /// Public JWK with `kid` set to its RFC 7638 thumbprint and `x5u` set
    /// to the configured certificate URL.
    pub fn to_jwk_value(&self, key: &PublicKey) -> Result<JwkValue, JwkError> {
        let mut value = JwkValue::from(identified_jwk(key)?);
        value.x5u = self.cert_url.clone();
        Ok(value)
    }

    /// `did:jwk` over the public members and `kid`. The certificate URL is
    /// left out so the identifier does not depend on where it is hosted.
    pub fn to_did(&self, key: &PublicKey) -> Result<Did, JwkError> {
        let jwk = identified_jwk(key)?;

        let value = serde_json::to_value(&jwk).map_err(JwkError::Serialization)?;
        let canonical: BTreeMap<String, Value> =
            serde_json::from_value(value).map_err(JwkError::Serialization)?;
        let json = serde_json::to_vec(&canonical).map_err(JwkError::Serialization)?;

        let did = Did::new(NAME, URL_SAFE_NO_PAD.encode(json));
        info!("Created did {}", did);
        Ok(did)
    }
}

/// Converts a public key to its JWK form, without `kid`.
pub fn to_jwk(key: &PublicKey) -> Result<Jwk, JwkError> {
    let jwk_str = match key {
        PublicKey::P256(key) => key.to_jwk_string(),
        PublicKey::P384(key) => key.to_jwk_string(),
        PublicKey::Ed25519(key) => serde_json::json!({
            "kty": "OKP",
            "crv": "Ed25519",
            "x": URL_SAFE_NO_PAD.encode(key.as_bytes()),
        })
        .to_string(),
    };

    serde_json::from_str(&jwk_str).map_err(|e| JwkError::Conversion(e.to_string()))
}

fn identified_jwk(key: &PublicKey) -> Result<Jwk, JwkError> {
    let mut jwk = to_jwk(key)?;
    jwk.prm.kid = Some(thumbprint(&jwk)?);
    Ok(jwk)
}

/// Decodes the JWK embedded in a `did:jwk`.
pub fn parse(did: &Did) -> Result<Jwk, JwkError> {
    if did.method_name.0 != NAME {
        return Err(JwkError::WrongMethod(did.to_string()));
    }

    let json = URL_SAFE_NO_PAD.decode(&did.method_id.0)?;
    serde_json::from_slice(&json).map_err(JwkError::Serialization)
}

#[derive(Error, Debug)]
pub enum JwkError {
    #[error("failed to convert key to JWK: {0}")]
    Conversion(String),
    #[error("failed to serialize JWK: {0}")]
    Serialization(serde_json::Error),
    #[error("not a did:jwk: {0}")]
    WrongMethod(String),
    #[error("failed to decode base64url: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl Classified for JwkError {
    fn kind(&self) -> ErrorKind {
        match self {
            JwkError::Conversion(_) => ErrorKind::Unsupported,
            JwkError::Serialization(_) | JwkError::Decode(_) => ErrorKind::Encoding,
            JwkError::WrongMethod(_) => ErrorKind::Format,
        }
    }
}
