use did_helper_core::did::Did;
use did_helper_keys::{Algorithm, PublicKey};
use multibase::Base;

use crate::{DidKeyError, Multicodec, NAME};

/// Decodes a `did:key` back into its public key.
pub struct DidKeyParser {
    algorithms: Vec<Algorithm>,
}

impl Default for DidKeyParser {
    fn default() -> Self {
        Self {
            algorithms: Algorithm::ALL.to_vec(),
        }
    }
}

impl DidKeyParser {
    pub fn parse(&self, did: &Did) -> Result<PublicKey, DidKeyError> {
        if did.method_name.0 != NAME {
            return Err(DidKeyError::WrongMethod(did.to_string()));
        }

        let (base, inner) = multibase::decode(&did.method_id.0)?;
        if base != Base::Base58Btc {
            return Err(DidKeyError::WrongBase);
        }

        for algorithm in self.algorithms.iter() {
            let code = algorithm.code();
            if let Some(bytes) = inner.strip_prefix(code.as_slice()) {
                return Ok(PublicKey::from_bytes(*algorithm, bytes)?);
            }
        }

        Err(DidKeyError::CodecNotSupported)
    }
}
