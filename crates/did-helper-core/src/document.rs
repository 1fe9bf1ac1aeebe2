use jose_jwk::Jwk;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::did::Did;

/// Base context of every [DID document](https://www.w3.org/TR/did-core/#json-ld).
pub const DID_CONTEXT_V1: &str = "https://www.w3.org/ns/did/v1";

/// Verification method type used for embedded JWKs.
pub const JSON_WEB_KEY_2020: &str = "JsonWebKey2020";

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "@context")]
    pub context: Option<Vec<String>>,
    pub issuer_did: Option<Vec<String>>,
    pub id: Did,
    pub verification_method: Option<Vec<VerificationMethodMap>>,
}

impl Document {
    /// Minimal document naming the DID and the DID context.
    pub fn issuer(did: Did) -> Self {
        Self {
            context: None,
            issuer_did: Some(vec![DID_CONTEXT_V1.to_string()]),
            id: did,
            verification_method: None,
        }
    }

    /// Document with a single `JsonWebKey2020` verification method
    /// controlled by the DID itself.
    pub fn with_jwk(did: Did, jwk: JwkValue) -> Self {
        let method = VerificationMethodMap {
            id: did.clone(),
            typ: JSON_WEB_KEY_2020.to_string(),
            controller: did.clone(),
            public_key_jwk: Some(jwk),
        };

        Self {
            context: Some(vec![DID_CONTEXT_V1.to_string()]),
            issuer_did: None,
            id: did,
            verification_method: Some(vec![method]),
        }
    }
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethodMap {
    pub id: Did,
    #[serde(rename = "type")]
    pub typ: String,
    pub controller: Did,
    pub public_key_jwk: Option<JwkValue>,
}

/// Public JWK plus the optional `x5u` certificate URL, which [Jwk] does
/// not model.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JwkValue {
    #[serde(flatten)]
    pub jwk: Jwk,
    pub x5u: Option<String>,
}

impl From<Jwk> for JwkValue {
    fn from(jwk: Jwk) -> Self {
        Self { jwk, x5u: None }
    }
}
