//! did-helper implementation of [did:web](https://w3c-ccg.github.io/did-method-web/).
//!
//! Pure string transformation from a base URL to its `did:web`. No network
//! access is performed.

use did_helper_core::{Classified, ErrorKind, did::Did};
use thiserror::Error;
use tracing::info;
use url::Url;

pub const NAME: &str = "web";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DidWebError {
    #[error("host URL is required for did:web")]
    MissingHost,
    #[error("invalid host URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Classified for DidWebError {
    fn kind(&self) -> ErrorKind {
        match self {
            DidWebError::MissingHost => ErrorKind::Config,
            DidWebError::InvalidUrl(_) => ErrorKind::Format,
        }
    }
}

/// Maps a base URL to `did:web:<host>[:<segment>...]`.
///
/// Only the hostname is kept, so any port in `url` is dropped. Characters
/// outside the DID `idchar` set are percent-encoded.
pub fn from_url(url: &str) -> Result<Did, DidWebError> {
    if url.is_empty() {
        return Err(DidWebError::MissingHost);
    }

    let url = Url::parse(url)?;
    let host = url.host_str().ok_or(DidWebError::MissingHost)?;

    let mut id = encode_segment(host);

    let path = url.path();
    if path != "/" {
        let segments: Vec<String> = path.split('/').map(encode_segment).collect();
        id.push_str(segments.join(":").trim_end_matches(':'));
    }

    let did = Did::new(NAME, id);
    info!("Created did {}", did);
    Ok(did)
}

// idchar = ALPHA / DIGIT / "." / "-" / "_" / pct-encoded
fn encode_segment(segment: &str) -> String {
    let raw = urlencoding::decode_binary(segment.as_bytes());
    urlencoding::encode_binary(&raw).replace('~', "%7E")
}
