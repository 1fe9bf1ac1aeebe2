use std::path::PathBuf;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use did_helper_keys::{KeyMaterial, PublicKey, SourceDescriptor};
use did_helper_method_jwk::{JwkEncoder, JwkError, parse, thumbprint, to_jwk};
use serde_json::{Value, json};
use tracing_test::traced_test;

const P256_KID: &str = "WdxI7fjC4t0sxMOx3kdt6aeO0kBOQ8tAaixd2gK7SuU";
const P256_DID: &str = "did:jwk:eyJjcnYiOiJQLTI1NiIsImtpZCI6IldkeEk3ZmpDNHQwc3hNT3gza2R0NmFlTzBrQk9ROHRBYWl4ZDJnSzdTdVUiLCJrdHkiOiJFQyIsIngiOiJMblZuekJvcGNHeGgwZXJ3M3IzQ0tCM0MxSVJ2Tmp0Wm8zUzVaQ1pONTJJIiwieSI6IlJmNzhsWDVNUWFjTUhUenFQc1JqUHN2dTlUeUM0bFJLV0MtME1NRm1YZVUifQ";

const P384_KID: &str = "9mKHT2fa-gIG4LV_xokrKc5qNCwpgvbL_IepxlUyMgQ";
const P384_DID: &str = "did:jwk:eyJjcnYiOiJQLTM4NCIsImtpZCI6IjltS0hUMmZhLWdJRzRMVl94b2tyS2M1cU5Dd3BndmJMX0llcHhsVXlNZ1EiLCJrdHkiOiJFQyIsIngiOiJXbzBXdU1XZk9sUUNRMGp3OV9SM0xqN2EzNllHcHZJaEw5Q29PaXhsbm5aYV9ETXJYZXEzTURVcElTUl95d3lDIiwieSI6Ii05a1pUOWFEc25uSU5KY25zdnBiWnVoSW5LTkhwS2NuUGp0b05ZOEdEYnlsQlBUQjYzTjMwZ3VVaXZTNzNQLVcifQ";

const ED25519_KID: &str = "NO0P6BA0JhViLM5aWzEscIkcGvbf7BMlCjK-go6ptY0";
const ED25519_DID: &str = "did:jwk:eyJjcnYiOiJFZDI1NTE5Iiwia2lkIjoiTk8wUDZCQTBKaFZpTE01YVd6RXNjSWtjR3ZiZjdCTWxDakstZ282cHRZMCIsImt0eSI6Ik9LUCIsIngiOiJVSFVjc2dVWTh0MmtpazJwX2ZUM01sVXNZby1adndnNUl3amVvQkZfbURzIn0";

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata")
        .join(name)
}

fn key(name: &str) -> PublicKey {
    KeyMaterial::load(&SourceDescriptor::PemPrivateKey(testdata(name)))
        .unwrap()
        .classify_private_first()
        .unwrap()
}

fn cert(name: &str) -> PublicKey {
    KeyMaterial::load(&SourceDescriptor::PemCertificate(testdata(name)))
        .unwrap()
        .classify_certificate_first()
        .unwrap()
}

#[test]
fn test_p256_jwk() {
    let jwk = to_jwk(&key("p256-pkcs8.pem")).unwrap();
    assert_eq!(
        serde_json::to_value(&jwk).unwrap(),
        json!({
            "crv": "P-256",
            "kty": "EC",
            "x": "LnVnzBopcGxh0erw3r3CKB3C1IRvNjtZo3S5ZCZN52I",
            "y": "Rf78lX5MQacMHTzqPsRjPsvu9TyC4lRKWC-0MMFmXeU",
        })
    );
    assert_eq!(thumbprint(&jwk).unwrap(), P256_KID);
}

#[test]
fn test_p384_jwk() {
    let jwk = to_jwk(&key("p384-pkcs8.pem")).unwrap();
    let value = serde_json::to_value(&jwk).unwrap();
    assert_eq!(value["crv"], "P-384");
    assert_eq!(
        value["x"],
        "Wo0WuMWfOlQCQ0jw9_R3Lj7a36YGpvIhL9CoOixlnnZa_DMrXeq3MDUpISR_ywyC"
    );
    assert_eq!(
        value["y"],
        "-9kZT9aDsnnINJcnsvpbZuhInKNHpKcnPjtoNY8GDbylBPTB63N30guUivS73P-W"
    );
    assert_eq!(thumbprint(&jwk).unwrap(), P384_KID);
}

#[test]
fn test_ed25519_jwk() {
    let jwk = to_jwk(&key("ed25519-pkcs8.pem")).unwrap();
    assert_eq!(
        serde_json::to_value(&jwk).unwrap(),
        json!({
            "crv": "Ed25519",
            "kty": "OKP",
            "x": "UHUcsgUY8t2kik2p_fT3MlUsYo-Zvwg5IwjeoBF_mDs",
        })
    );
    assert_eq!(thumbprint(&jwk).unwrap(), ED25519_KID);
}

#[test]
#[traced_test]
fn test_did_jwk() {
    let encoder = JwkEncoder::default();

    let did = encoder.to_did(&key("p256-pkcs8.pem")).unwrap();
    assert_eq!(did.to_string(), P256_DID);
    assert!(logs_contain(&format!("Created did {P256_DID}")));

    let did = encoder.to_did(&key("p384-pkcs8.pem")).unwrap();
    assert_eq!(did.to_string(), P384_DID);

    let did = encoder.to_did(&key("ed25519-pkcs8.pem")).unwrap();
    assert_eq!(did.to_string(), ED25519_DID);
}

#[test]
fn test_did_jwk_from_certificate() {
    let encoder = JwkEncoder::default();
    assert_eq!(
        encoder.to_did(&cert("p256-cert.pem")).unwrap().to_string(),
        P256_DID
    );
    assert_eq!(
        encoder.to_did(&cert("ed25519-cert.pem")).unwrap().to_string(),
        ED25519_DID
    );
}

#[test]
fn test_did_jwk_ignores_cert_url() {
    let with_url = JwkEncoder::new(Some("https://example.com/.well-known/tls.crt".to_string()));
    let did = with_url.to_did(&key("p256-pkcs8.pem")).unwrap();
    assert_eq!(did.to_string(), P256_DID);
}

#[test]
fn test_did_jwk_payload() {
    let did = JwkEncoder::default()
        .to_did(&key("ed25519-pkcs8.pem"))
        .unwrap();

    assert!(!did.method_id.0.contains('='));

    let payload = URL_SAFE_NO_PAD.decode(&did.method_id.0).unwrap();
    let value: Value = serde_json::from_slice(&payload).unwrap();
    assert_eq!(
        value,
        json!({
            "crv": "Ed25519",
            "kid": ED25519_KID,
            "kty": "OKP",
            "x": "UHUcsgUY8t2kik2p_fT3MlUsYo-Zvwg5IwjeoBF_mDs",
        })
    );
    assert!(value.get("d").is_none());
}

#[test]
fn test_parse() {
    let did = JwkEncoder::default().to_did(&key("p256-pkcs8.pem")).unwrap();
    let jwk = parse(&did).unwrap();
    assert_eq!(jwk.prm.kid.as_deref(), Some(P256_KID));
    assert_eq!(thumbprint(&jwk).unwrap(), P256_KID);
}

#[test]
fn test_parse_wrong_method() {
    let did = "did:key:z6MkjsLEdaTzCkJBqS615zr3KwE2Zc17aSL5Ve28okKdkCCz"
        .parse()
        .unwrap();
    assert!(matches!(parse(&did), Err(JwkError::WrongMethod(_))));
}

#[test]
fn test_jwk_value() {
    let url = "https://example.com/.well-known/tls.crt";
    let value = JwkEncoder::new(Some(url.to_string()))
        .to_jwk_value(&key("p384-pkcs8.pem"))
        .unwrap();

    assert_eq!(value.x5u.as_deref(), Some(url));
    assert_eq!(value.jwk.prm.kid.as_deref(), Some(P384_KID));

    let json = serde_json::to_value(&value).unwrap();
    assert_eq!(json["x5u"], url);
    assert_eq!(json["kid"], P384_KID);
    assert_eq!(json["kty"], "EC");
}
