use std::collections::BTreeMap;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jose_jwk::Jwk;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::JwkError;

/// [RFC 7638](https://www.rfc-editor.org/rfc/rfc7638) SHA-256 thumbprint,
/// base64url encoded without padding.
pub fn thumbprint(jwk: &Jwk) -> Result<String, JwkError> {
    let value = serde_json::to_value(jwk).map_err(JwkError::Serialization)?;

    let members: &[&str] = match value.get("kty").and_then(Value::as_str) {
        Some("EC") => &["crv", "kty", "x", "y"],
        Some("OKP") => &["crv", "kty", "x"],
        Some("RSA") => &["e", "kty", "n"],
        Some("oct") => &["k", "kty"],
        other => {
            return Err(JwkError::Conversion(format!(
                "no thumbprint members for key type {other:?}"
            )));
        }
    };

    // Required members only, lexicographic order, no whitespace.
    let mut canonical = BTreeMap::new();
    for member in members {
        let v = value
            .get(*member)
            .ok_or_else(|| JwkError::Conversion(format!("JWK is missing `{member}`")))?;
        canonical.insert(*member, v);
    }

    let json = serde_json::to_vec(&canonical).map_err(JwkError::Serialization)?;
    Ok(URL_SAFE_NO_PAD.encode(Sha256::digest(json)))
}
