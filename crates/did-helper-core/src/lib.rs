//! Core types for the did-helper DID methods.

pub mod did;
pub mod document;

/// Coarse error taxonomy shared by every did-helper crate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A file could not be read or written.
    Io,
    /// Malformed PEM, DER or PKCS#12 input.
    Format,
    /// Algorithm, curve or DID type not recognized.
    Unsupported,
    /// JSON, base64 or multibase serialization failed.
    Encoding,
    /// A required parameter is missing or invalid.
    Config,
}

/// Errors that can be placed in the [ErrorKind] taxonomy.
pub trait Classified {
    fn kind(&self) -> ErrorKind;
}
