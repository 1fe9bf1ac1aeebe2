//! Loads key material from PKCS#12 keystores and PEM files, and classifies
//! the loaded keys into the algorithms did-helper can encode.
//!
//! ```no_run
//! use did_helper_keys::{Algorithm, KeyMaterial, SourceDescriptor};
//!
//! let material = KeyMaterial::load(&SourceDescriptor::PemPrivateKey("key.pem".into())).unwrap();
//! let public = material.classify_private_first().unwrap();
//!
//! assert_eq!(public.algorithm(), Algorithm::P256);
//! ```

mod classify;
mod error;
mod loader;

pub use classify::*;
pub use error::*;
pub use loader::*;
