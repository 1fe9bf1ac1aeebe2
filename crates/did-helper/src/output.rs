//! Output documents built around a derived DID.

use clap::ValueEnum;
use did_helper_core::{
    did::Did,
    document::{Document, JwkValue},
};

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `{"issuerDid":[..],"id":"<did>"}`, compact.
    #[default]
    Json,
    /// `DID=<did>`.
    Env,
    /// DID document with a `JsonWebKey2020` verification method, pretty printed.
    #[value(name = "json_jwk", alias = "json-jwk")]
    JsonJwk,
}

impl OutputFormat {
    pub fn needs_jwk(self) -> bool {
        matches!(self, OutputFormat::JsonJwk)
    }
}

pub fn json(did: Did) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Document::issuer(did))
}

pub fn env(did: &Did) -> String {
    format!("DID={did}")
}

pub fn json_jwk(did: Did, jwk: JwkValue) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Document::with_jwk(did, jwk))
}
