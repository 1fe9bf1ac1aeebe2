use std::path::PathBuf;

use did_helper_core::{Classified, ErrorKind};
use did_helper_keys::{
    Algorithm, ClassifyError, KeyMaterial, KeySource, LoadError, PrivateKeyFormat, PublicKey,
    SourceDescriptor, classify_public_key_der,
};
use tracing_test::traced_test;

const P256_PUBLIC: &str = "032e7567cc1a29706c61d1eaf0debdc2281dc2d4846f363b59a374b964264de762";
const P384_PUBLIC: &str = "025a8d16b8c59f3a54024348f0f7f4772e3edadfa606a6f2212fd0a83a2c659e765afc332b5deab730352921247fcb0c82";
const ED25519_PUBLIC: &str = "50751cb20518f2dda48a4da9fdf4f732552c628f99bf08392308dea0117f983b";

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata")
        .join(name)
}

fn pem_key(name: &str) -> KeyMaterial {
    KeyMaterial::load(&SourceDescriptor::PemPrivateKey(testdata(name))).unwrap()
}

fn pem_cert(name: &str) -> KeyMaterial {
    KeyMaterial::load(&SourceDescriptor::PemCertificate(testdata(name))).unwrap()
}

fn keystore(name: &str, password: &str) -> Result<KeyMaterial, LoadError> {
    KeyMaterial::load(&SourceDescriptor::Keystore {
        path: testdata(name),
        password: password.to_string(),
    })
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[test]
fn test_classify_p256_pkcs8() {
    let public = pem_key("p256-pkcs8.pem").classify_private_first().unwrap();
    assert_eq!(public.algorithm(), Algorithm::P256);

    let bytes = public.to_bytes();
    assert_eq!(bytes.as_ref().len(), 33);
    assert_eq!(hex(bytes.as_ref()), P256_PUBLIC);
}

#[test]
fn test_classify_p256_sec1() {
    let material = pem_key("p256-sec1.pem");
    assert_eq!(
        material.private_key.as_ref().unwrap().format(),
        PrivateKeyFormat::Sec1
    );

    let public = material.classify_private_first().unwrap();
    assert_eq!(hex(public.to_bytes().as_ref()), P256_PUBLIC);
}

#[test]
fn test_classify_p384() {
    let public = pem_key("p384-pkcs8.pem").classify_private_first().unwrap();
    assert_eq!(public.algorithm(), Algorithm::P384);

    let bytes = public.to_bytes();
    assert_eq!(bytes.as_ref().len(), 49);
    assert_eq!(hex(bytes.as_ref()), P384_PUBLIC);
}

#[test]
fn test_classify_ed25519() {
    let public = pem_key("ed25519-pkcs8.pem").classify_private_first().unwrap();
    assert_eq!(public.algorithm(), Algorithm::Ed25519);
    assert_eq!(hex(public.to_bytes().as_ref()), ED25519_PUBLIC);
}

#[test]
fn test_classify_certificates() {
    let public = pem_cert("p256-cert.pem").classify_certificate_first().unwrap();
    assert_eq!(hex(public.to_bytes().as_ref()), P256_PUBLIC);

    let public = pem_cert("p384-cert.pem").classify_certificate_first().unwrap();
    assert_eq!(hex(public.to_bytes().as_ref()), P384_PUBLIC);

    let public = pem_cert("ed25519-cert.pem").classify_certificate_first().unwrap();
    assert_eq!(hex(public.to_bytes().as_ref()), ED25519_PUBLIC);
}

#[test]
fn test_classify_public_key_der() {
    let block = pem::parse(std::fs::read(testdata("p256-public.pem")).unwrap()).unwrap();
    assert_eq!(block.tag(), "PUBLIC KEY");

    let public = classify_public_key_der(block.contents()).unwrap();
    assert_eq!(hex(public.to_bytes().as_ref()), P256_PUBLIC);
}

#[test]
fn test_certificate_fallback() {
    // No private key loaded, so did:key falls back to the certificate.
    let public = pem_cert("p256-cert.pem").classify_private_first().unwrap();
    assert_eq!(public.algorithm(), Algorithm::P256);
}

#[test]
fn test_rsa_unsupported() {
    for name in ["rsa-pkcs1.pem", "rsa-pkcs8.pem"] {
        let err = pem_key(name).classify_private_first().unwrap_err();
        assert_eq!(err, ClassifyError::UnsupportedAlgorithm("RSA".to_string()));
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }
}

#[test]
fn test_unsupported_curve() {
    let err = pem_key("secp256k1-pkcs8.pem")
        .classify_private_first()
        .unwrap_err();
    assert_eq!(err, ClassifyError::UnsupportedCurve("secp256k1".to_string()));
}

#[test]
fn test_no_key() {
    let err = KeyMaterial::default().classify_private_first().unwrap_err();
    assert_eq!(err, ClassifyError::MissingKey);
}

#[test]
fn test_public_key_bytes_roundtrip() {
    let public = pem_key("p384-pkcs8.pem").classify_private_first().unwrap();
    let bytes = public.to_bytes();

    let parsed = PublicKey::from_bytes(Algorithm::P384, bytes.as_ref()).unwrap();
    assert_eq!(parsed, public);
}

#[test]
fn test_keystore() {
    let material = keystore("p256.p12", "changeit").unwrap();

    let key = material.private_key.as_ref().unwrap();
    assert_eq!(key.source(), KeySource::Keystore);
    assert_eq!(key.format(), PrivateKeyFormat::Pkcs8);

    let cert = material.certificate.as_ref().unwrap();
    assert_eq!(cert.source, KeySource::Keystore);

    let from_key = material.classify_private_first().unwrap();
    let from_cert = material.classify_certificate_first().unwrap();
    assert_eq!(from_key, from_cert);
    assert_eq!(hex(from_key.to_bytes().as_ref()), P256_PUBLIC);
}

#[test]
fn test_keystore_ed25519() {
    let material = keystore("ed25519.p12", "changeit").unwrap();
    let public = material.classify_private_first().unwrap();
    assert_eq!(hex(public.to_bytes().as_ref()), ED25519_PUBLIC);
}

#[test]
#[traced_test]
fn test_keystore_wrong_password() {
    let err = keystore("p256.p12", "wrong").unwrap_err();
    assert!(matches!(err, LoadError::KeystoreDecode { .. }));
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(logs_contain("Was not able to decode the keystore"));
}

#[test]
fn test_keystore_garbage() {
    let err = keystore("garbage.p12", "changeit").unwrap_err();
    assert!(matches!(err, LoadError::KeystoreDecode { .. }));
}

#[test]
fn test_missing_file() {
    let err = keystore("does-not-exist.p12", "changeit").unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert_eq!(err.kind(), ErrorKind::Io);

    let err = KeyMaterial::load(&SourceDescriptor::PemPrivateKey(testdata("missing.pem")))
        .unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn test_load_all_merges() {
    let material = KeyMaterial::load_all(&[
        SourceDescriptor::PemPrivateKey(testdata("p256-pkcs8.pem")),
        SourceDescriptor::PemCertificate(testdata("p256-cert.pem")),
    ])
    .unwrap();

    assert_eq!(
        material.private_key.as_ref().unwrap().source(),
        KeySource::PemKey
    );
    assert_eq!(material.certificate.as_ref().unwrap().source, KeySource::PemCert);
}

#[test]
fn test_load_all_fails_fast() {
    let err = KeyMaterial::load_all(&[
        SourceDescriptor::PemPrivateKey(testdata("p256-pkcs8.pem")),
        SourceDescriptor::PemCertificate(testdata("garbage.pem")),
    ])
    .unwrap_err();

    assert!(matches!(err, LoadError::PemFormat(_)));
}
