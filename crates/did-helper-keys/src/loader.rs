use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

use p12_keystore::KeyStore;
use p256::elliptic_curve::zeroize::Zeroizing;
use tracing::{debug, warn};
use x509_cert::{
    Certificate,
    der::{Decode, EncodePem, pem::LineEnding},
};

use crate::LoadError;

/// Where a piece of [KeyMaterial] came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeySource {
    Keystore,
    PemCert,
    PemKey,
}

/// A key or certificate source to load from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    /// PKCS#12 archive holding a private key and its certificate.
    Keystore { path: PathBuf, password: String },
    /// PEM file holding a single `CERTIFICATE` block.
    PemCertificate(PathBuf),
    /// PEM file holding a PKCS#8, PKCS#1 or SEC1 private key.
    PemPrivateKey(PathBuf),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PrivateKeyFormat {
    Pkcs8,
    Pkcs1,
    Sec1,
}

/// Order in which private key DER is tried. The first structure that
/// parses wins; PEM labels are not consulted.
pub const PRIVATE_KEY_DECODE_ORDER: [PrivateKeyFormat; 3] = [
    PrivateKeyFormat::Pkcs8,
    PrivateKeyFormat::Pkcs1,
    PrivateKeyFormat::Sec1,
];

impl PrivateKeyFormat {
    /// Whether `der` is a well-formed structure of this format.
    pub fn accepts(self, der: &[u8]) -> bool {
        match self {
            PrivateKeyFormat::Pkcs8 => pkcs8::PrivateKeyInfo::try_from(der).is_ok(),
            PrivateKeyFormat::Pkcs1 => pkcs1::RsaPrivateKey::try_from(der).is_ok(),
            PrivateKeyFormat::Sec1 => sec1::EcPrivateKey::try_from(der).is_ok(),
        }
    }

    /// Detects the format of `der` following [PRIVATE_KEY_DECODE_ORDER].
    pub fn detect(der: &[u8]) -> Option<Self> {
        PRIVATE_KEY_DECODE_ORDER
            .into_iter()
            .find(|format| format.accepts(der))
    }
}

/// DER encoded private key whose outer structure has been validated.
pub struct PrivateKeyDer {
    format: PrivateKeyFormat,
    der: Zeroizing<Vec<u8>>,
    source: KeySource,
}

impl PrivateKeyDer {
    pub fn format(&self) -> PrivateKeyFormat {
        self.format
    }

    pub fn source(&self) -> KeySource {
        self.source
    }

    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
}

impl Debug for PrivateKeyDer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKeyDer")
            .field("format", &self.format)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct LoadedCertificate {
    pub certificate: Certificate,
    pub source: KeySource,
}

impl LoadedCertificate {
    /// Re-encodes the certificate as a `CERTIFICATE` PEM block.
    pub fn to_pem(&self) -> Result<String, x509_cert::der::Error> {
        self.certificate.to_pem(LineEnding::LF)
    }
}

/// Private key and/or certificate loaded for a single derivation.
#[derive(Debug, Default)]
pub struct KeyMaterial {
    pub private_key: Option<PrivateKeyDer>,
    pub certificate: Option<LoadedCertificate>,
}

impl KeyMaterial {
    pub fn load(descriptor: &SourceDescriptor) -> Result<Self, LoadError> {
        match descriptor {
            SourceDescriptor::Keystore { path, password } => load_keystore(path, password),
            SourceDescriptor::PemCertificate(path) => Ok(Self {
                private_key: None,
                certificate: Some(load_pem_certificate(path)?),
            }),
            SourceDescriptor::PemPrivateKey(path) => Ok(Self {
                private_key: Some(load_pem_private_key(path)?),
                certificate: None,
            }),
        }
    }

    /// Loads every descriptor, later sources filling what earlier ones left
    /// empty. Fails on the first source that fails.
    pub fn load_all(descriptors: &[SourceDescriptor]) -> Result<Self, LoadError> {
        let mut material = Self::default();

        for descriptor in descriptors {
            let loaded = Self::load(descriptor)?;
            material.private_key = material.private_key.or(loaded.private_key);
            material.certificate = material.certificate.or(loaded.certificate);
        }

        Ok(material)
    }

    pub fn is_empty(&self) -> bool {
        self.private_key.is_none() && self.certificate.is_none()
    }
}

fn read(path: &Path) -> Result<Vec<u8>, LoadError> {
    fs::read(path).map_err(|source| {
        warn!("Was not able to read the file {}: {}", path.display(), source);
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

pub fn load_keystore(path: &Path, password: &str) -> Result<KeyMaterial, LoadError> {
    let bytes = read(path)?;

    decode_keystore(&bytes, password).map_err(|reason| {
        warn!("Was not able to decode the keystore {}: {}", path.display(), reason);
        LoadError::KeystoreDecode {
            path: path.to_path_buf(),
            reason,
        }
    })
}

/// Decodes a PKCS#12 archive. Both the private key and its certificate
/// must be present.
pub fn decode_keystore(bytes: &[u8], password: &str) -> Result<KeyMaterial, String> {
    let keystore = KeyStore::from_pkcs12(bytes, password).map_err(|e| e.to_string())?;

    let (alias, chain) = keystore
        .private_key_chain()
        .ok_or_else(|| "keystore holds no private key entry".to_string())?;
    debug!("Using keystore entry {}", alias);

    let der = Zeroizing::new(chain.key().to_vec());
    if !PrivateKeyFormat::Pkcs8.accepts(&der) {
        return Err("keystore private key is not PKCS#8".to_string());
    }

    let leaf = chain
        .chain()
        .first()
        .ok_or_else(|| "keystore holds no certificate".to_string())?;
    let certificate = Certificate::from_der(leaf.as_der()).map_err(|e| e.to_string())?;

    Ok(KeyMaterial {
        private_key: Some(PrivateKeyDer {
            format: PrivateKeyFormat::Pkcs8,
            der,
            source: KeySource::Keystore,
        }),
        certificate: Some(LoadedCertificate {
            certificate,
            source: KeySource::Keystore,
        }),
    })
}

pub fn load_pem_certificate(path: &Path) -> Result<LoadedCertificate, LoadError> {
    decode_pem_certificate(&read(path)?).inspect_err(|e| {
        warn!("Was not able to decode the certificate {}: {}", path.display(), e);
    })
}

/// Decodes the first PEM block of `bytes`, which must be a `CERTIFICATE`.
pub fn decode_pem_certificate(bytes: &[u8]) -> Result<LoadedCertificate, LoadError> {
    let block = pem::parse(bytes)
        .map_err(|e| LoadError::PemFormat(format!("failed to find PEM block: {e}")))?;

    if block.tag() != "CERTIFICATE" {
        return Err(LoadError::PemFormat(format!(
            "unexpected PEM block type: {}",
            block.tag()
        )));
    }

    let certificate = Certificate::from_der(block.contents())?;

    Ok(LoadedCertificate {
        certificate,
        source: KeySource::PemCert,
    })
}

pub fn load_pem_private_key(path: &Path) -> Result<PrivateKeyDer, LoadError> {
    decode_pem_private_key(&read(path)?).inspect_err(|e| {
        warn!("Was not able to decode the private key {}: {}", path.display(), e);
    })
}

/// Decodes the first PEM block of `bytes` as a private key, trying the
/// formats in [PRIVATE_KEY_DECODE_ORDER].
pub fn decode_pem_private_key(bytes: &[u8]) -> Result<PrivateKeyDer, LoadError> {
    let block = pem::parse(bytes)
        .map_err(|e| LoadError::PemFormat(format!("failed to find PEM block: {e}")))?;
    let der = Zeroizing::new(block.into_contents());

    let format = PrivateKeyFormat::detect(&der).ok_or(LoadError::UnsupportedKeyFormat)?;
    debug!("Decoded private key as {:?}", format);

    Ok(PrivateKeyDer {
        format,
        der,
        source: KeySource::PemKey,
    })
}
