use std::{fmt::Display, str::FromStr};

use ed25519_dalek::{SigningKey, VerifyingKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use pkcs8::{
    AlgorithmIdentifierRef, DecodePrivateKey, DecodePublicKey, ObjectIdentifier, PrivateKeyInfo,
    SubjectPublicKeyInfoRef,
};
use x509_cert::{Certificate, der::Encode};

use crate::{ClassifyError, KeyMaterial, PrivateKeyDer, PrivateKeyFormat};

const ID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const ID_ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");
const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const SECP384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
const SECP256K1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.10");

/// Key algorithms that can be turned into a DID.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Algorithm {
    P256,
    P384,
    Ed25519,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::P256, Algorithm::P384, Algorithm::Ed25519];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::P256 => "P-256",
            Algorithm::P384 => "P-384",
            Algorithm::Ed25519 => "Ed25519",
        }
    }

    /// Length of [PublicKeyBytes] for this algorithm.
    pub fn public_key_len(self) -> usize {
        match self {
            Algorithm::P256 => 33,
            Algorithm::P384 => 49,
            Algorithm::Ed25519 => 32,
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ClassifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "P-256" | "P256" => Ok(Algorithm::P256),
            "P-384" | "P384" => Ok(Algorithm::P384),
            "ED-25519" | "ED25519" => Ok(Algorithm::Ed25519),
            _ => Err(ClassifyError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

/// Public half of a classified key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    P256(p256::PublicKey),
    P384(p384::PublicKey),
    Ed25519(VerifyingKey),
}

impl PublicKey {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            PublicKey::P256(_) => Algorithm::P256,
            PublicKey::P384(_) => Algorithm::P384,
            PublicKey::Ed25519(_) => Algorithm::Ed25519,
        }
    }

    /// Compressed SEC1 point for EC keys, the raw 32 bytes for Ed25519.
    pub fn to_bytes(&self) -> PublicKeyBytes {
        let bytes: Box<[u8]> = match self {
            PublicKey::P256(key) => key.to_encoded_point(true).as_bytes().into(),
            PublicKey::P384(key) => key.to_encoded_point(true).as_bytes().into(),
            PublicKey::Ed25519(key) => key.to_bytes().into(),
        };
        PublicKeyBytes(bytes)
    }

    /// Inverse of [PublicKey::to_bytes].
    pub fn from_bytes(algorithm: Algorithm, bytes: &[u8]) -> Result<Self, ClassifyError> {
        if bytes.len() != algorithm.public_key_len() {
            return Err(ClassifyError::InvalidKey(format!(
                "{algorithm} public key must be {} bytes, got {}",
                algorithm.public_key_len(),
                bytes.len()
            )));
        }

        match algorithm {
            Algorithm::P256 | Algorithm::P384 if !matches!(bytes[0], 0x02 | 0x03) => Err(
                ClassifyError::InvalidKey("EC public key is not a compressed point".to_string()),
            ),
            Algorithm::P256 => p256::PublicKey::from_sec1_bytes(bytes)
                .map(PublicKey::P256)
                .map_err(invalid),
            Algorithm::P384 => p384::PublicKey::from_sec1_bytes(bytes)
                .map(PublicKey::P384)
                .map_err(invalid),
            Algorithm::Ed25519 => VerifyingKey::try_from(bytes)
                .map(PublicKey::Ed25519)
                .map_err(invalid),
        }
    }
}

/// Encoded public key, see [PublicKey::to_bytes].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyBytes(Box<[u8]>);

impl AsRef<[u8]> for PublicKeyBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl KeyMaterial {
    /// Classifies the private key, falling back to the certificate when no
    /// private key was loaded.
    pub fn classify_private_first(&self) -> Result<PublicKey, ClassifyError> {
        match (&self.private_key, &self.certificate) {
            (Some(key), _) => classify_private_key(key),
            (None, Some(cert)) => classify_certificate(&cert.certificate),
            (None, None) => Err(ClassifyError::MissingKey),
        }
    }

    /// Classifies the certificate's public key, falling back to the private
    /// key when no certificate was loaded.
    pub fn classify_certificate_first(&self) -> Result<PublicKey, ClassifyError> {
        match (&self.certificate, &self.private_key) {
            (Some(cert), _) => classify_certificate(&cert.certificate),
            (None, Some(key)) => classify_private_key(key),
            (None, None) => Err(ClassifyError::MissingKey),
        }
    }
}

pub fn classify_private_key(key: &PrivateKeyDer) -> Result<PublicKey, ClassifyError> {
    let der = key.as_der();

    match key.format() {
        PrivateKeyFormat::Pkcs8 => {
            let info = PrivateKeyInfo::try_from(der).map_err(invalid)?;

            match identify(&info.algorithm)? {
                Algorithm::P256 => p256::SecretKey::from_pkcs8_der(der)
                    .map(|secret| PublicKey::P256(secret.public_key()))
                    .map_err(invalid),
                Algorithm::P384 => p384::SecretKey::from_pkcs8_der(der)
                    .map(|secret| PublicKey::P384(secret.public_key()))
                    .map_err(invalid),
                Algorithm::Ed25519 => SigningKey::from_pkcs8_der(der)
                    .map(|signing| PublicKey::Ed25519(signing.verifying_key()))
                    .map_err(invalid),
            }
        }
        PrivateKeyFormat::Pkcs1 => Err(ClassifyError::UnsupportedAlgorithm("RSA".to_string())),
        PrivateKeyFormat::Sec1 => {
            let ec = sec1::EcPrivateKey::try_from(der).map_err(invalid)?;
            let curve = ec
                .parameters
                .and_then(|params| params.named_curve())
                .ok_or_else(|| ClassifyError::UnsupportedCurve("unspecified".to_string()))?;

            match named_curve(curve)? {
                Curve::P256 => p256::SecretKey::from_sec1_der(der)
                    .map(|secret| PublicKey::P256(secret.public_key()))
                    .map_err(invalid),
                Curve::P384 => p384::SecretKey::from_sec1_der(der)
                    .map(|secret| PublicKey::P384(secret.public_key()))
                    .map_err(invalid),
            }
        }
    }
}

pub fn classify_certificate(cert: &Certificate) -> Result<PublicKey, ClassifyError> {
    let spki = cert
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| ClassifyError::InvalidKey(e.to_string()))?;

    classify_public_key_der(&spki)
}

/// Classifies a DER encoded `SubjectPublicKeyInfo`.
pub fn classify_public_key_der(spki: &[u8]) -> Result<PublicKey, ClassifyError> {
    let info = SubjectPublicKeyInfoRef::try_from(spki).map_err(invalid)?;

    match identify(&info.algorithm)? {
        Algorithm::P256 => p256::PublicKey::from_public_key_der(spki)
            .map(PublicKey::P256)
            .map_err(invalid),
        Algorithm::P384 => p384::PublicKey::from_public_key_der(spki)
            .map(PublicKey::P384)
            .map_err(invalid),
        Algorithm::Ed25519 => VerifyingKey::from_public_key_der(spki)
            .map(PublicKey::Ed25519)
            .map_err(invalid),
    }
}

fn identify(algorithm: &AlgorithmIdentifierRef<'_>) -> Result<Algorithm, ClassifyError> {
    match algorithm.oid {
        oid if oid == ID_EC_PUBLIC_KEY => {
            let curve = algorithm
                .parameters_oid()
                .map_err(|_| ClassifyError::UnsupportedCurve("unspecified".to_string()))?;
            Ok(match named_curve(curve)? {
                Curve::P256 => Algorithm::P256,
                Curve::P384 => Algorithm::P384,
            })
        }
        oid if oid == ID_ED25519 => Ok(Algorithm::Ed25519),
        oid if oid == RSA_ENCRYPTION => Err(ClassifyError::UnsupportedAlgorithm("RSA".to_string())),
        oid => Err(ClassifyError::UnsupportedAlgorithm(oid.to_string())),
    }
}

enum Curve {
    P256,
    P384,
}

fn named_curve(curve: ObjectIdentifier) -> Result<Curve, ClassifyError> {
    match curve {
        oid if oid == SECP256R1 => Ok(Curve::P256),
        oid if oid == SECP384R1 => Ok(Curve::P384),
        oid if oid == SECP256K1 => Err(ClassifyError::UnsupportedCurve("secp256k1".to_string())),
        oid => Err(ClassifyError::UnsupportedCurve(oid.to_string())),
    }
}

fn invalid(e: impl Display) -> ClassifyError {
    ClassifyError::InvalidKey(e.to_string())
}
