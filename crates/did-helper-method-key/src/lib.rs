//! did-helper implementation of [did:key](https://w3c-ccg.github.io/did-method-key/).
//!
//! A `did:key` is the multibase (base58-btc) encoding of the key's multicodec
//! varint followed by its public key bytes.

use did_helper_core::{Classified, ErrorKind, did::Did};
use did_helper_keys::{Algorithm, PublicKey};
use multibase::Base;
use thiserror::Error;
use tracing::info;

mod codec;
mod parser;

pub use codec::Multicodec;
pub use parser::DidKeyParser;

pub const NAME: &str = "key";

/// Encodes a public key as a `did:key`.
pub fn to_did(key: &PublicKey) -> Did {
    let did = encode(key.algorithm(), key.to_bytes().as_ref());
    info!("Created did {}", did);
    did
}

/// Encodes already extracted public key bytes. Deterministic: identical
/// input always yields the same DID.
pub fn encode(algorithm: Algorithm, public_key: &[u8]) -> Did {
    let code = algorithm.code();

    let mut inner = Vec::with_capacity(code.len() + public_key.len());
    inner.extend(code);
    inner.extend_from_slice(public_key);

    Did::new(NAME, multibase::encode(Base::Base58Btc, inner))
}

/// Parses a configured key type name, such as `P-256` or `ED-25519`.
pub fn parse_key_type(name: &str) -> Result<Algorithm, DidKeyError> {
    name.parse()
        .map_err(|_| DidKeyError::UnsupportedKeyType(name.to_string()))
}

#[derive(Error, Debug)]
pub enum DidKeyError {
    #[error("unsupported did:key type: {0}")]
    UnsupportedKeyType(String),
    #[error("not a did:key: {0}")]
    WrongMethod(String),
    #[error("failed to decode multibase: {0}")]
    Decode(#[from] multibase::Error),
    #[error("did:key must be base58-btc encoded")]
    WrongBase,
    #[error("codec not supported")]
    CodecNotSupported,
    #[error(transparent)]
    InvalidKey(#[from] did_helper_keys::ClassifyError),
}

impl Classified for DidKeyError {
    fn kind(&self) -> ErrorKind {
        match self {
            DidKeyError::UnsupportedKeyType(_) | DidKeyError::CodecNotSupported => {
                ErrorKind::Unsupported
            }
            DidKeyError::WrongMethod(_) | DidKeyError::WrongBase | DidKeyError::InvalidKey(_) => {
                ErrorKind::Format
            }
            DidKeyError::Decode(_) => ErrorKind::Encoding,
        }
    }
}
