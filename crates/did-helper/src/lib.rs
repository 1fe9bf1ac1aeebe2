//! Derive [DIDs](https://www.w3.org/TR/did-core/) from keys and certificates.
//!
//! Key material is loaded from a PKCS#12 keystore or PEM files, classified,
//! and encoded as a `did:key` or `did:jwk`. A `did:web` is built from the
//! host URL alone.
//!
//! ## Example
//!
//! ```no_run
//! use clap::Parser;
//! use did_helper::Config;
//!
//! let config = Config::parse_from(["did-helper", "--key-path", "key.pem"]);
//! let prepared = did_helper::prepare(&config).unwrap();
//!
//! assert!(prepared.did.to_string().starts_with("did:key:"));
//! ```

use std::fs;

use did_helper_keys::KeyMaterial;
use did_helper_server::ServedContent;
use tracing::info;

pub mod config;
pub mod derive;
mod error;
pub mod output;

pub use config::Config;
pub use error::{Error, ExitStatus};

use crate::{
    core::did::Did,
    derive::{DidMethod, Deriver},
    output::OutputFormat,
};

pub mod core {
    pub use did_helper_core::*;
}

pub mod keys {
    pub use did_helper_keys::*;
}

pub mod methods {
    pub mod jwk {
        pub use did_helper_method_jwk::*;
    }

    pub mod key {
        pub use did_helper_method_key::*;
    }

    pub mod web {
        pub use did_helper_method_web::*;
    }
}

pub mod server {
    pub use did_helper_server::*;
}

/// A derived DID and its rendered document.
#[derive(Debug)]
pub struct Prepared {
    pub did: Did,
    pub document: String,
    pub material: KeyMaterial,
}

/// Loads what the configuration needs, derives the DID and renders the
/// document. Nothing is written or served.
pub fn prepare(config: &Config) -> Result<Prepared, Error> {
    let method: DidMethod = config.did_type.parse()?;

    let needs_keys = method.needs_key_material()
        || config.output_format.needs_jwk()
        || config.serves();

    let material = if needs_keys {
        load_material(config)?
    } else {
        KeyMaterial::default()
    };

    let mut deriver = Deriver::new(&material);
    if let Some(key_type) = config.key_type.as_deref() {
        deriver = deriver.expect_key_type(key_type).map_err(Error::Derive)?;
    }

    let did = deriver
        .did(method, config.host_url.as_deref())
        .map_err(Error::Derive)?;

    let document = match config.output_format {
        OutputFormat::Json => output::json(did.clone()).map_err(Error::Marshal)?,
        OutputFormat::Env => output::env(&did),
        OutputFormat::JsonJwk => {
            let jwk = deriver.jwk(config.cert_url()).map_err(Error::Jwk)?;
            output::json_jwk(did.clone(), jwk).map_err(Error::Marshal)?
        }
    };

    Ok(Prepared {
        did,
        document,
        material,
    })
}

fn load_material(config: &Config) -> Result<KeyMaterial, Error> {
    let sources = config.sources();
    if sources.is_empty() {
        return Err(Error::Config(
            "no key source, set --key-path, --cert-path or --keystore-path".to_string(),
        ));
    }

    Ok(KeyMaterial::load_all(&sources)?)
}

/// Runs the tool: writes the document to the output file, serves it, or
/// prints it to stdout.
pub async fn run(config: Config) -> Result<(), Error> {
    let prepared = prepare(&config)?;

    if let Some(path) = &config.output_file {
        fs::write(path, &prepared.document).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;
        info!("Wrote {} to {}", prepared.did, path.display());
    } else if config.run_server {
        let content = served_content(prepared)?;
        let listener = did_helper_server::bind(config.server_port).await?;
        let router = did_helper_server::create_router(content);
        did_helper_server::serve(listener, router, did_helper_server::shutdown_signal()).await?;
    } else {
        println!("{}", prepared.document);
    }

    Ok(())
}

fn served_content(prepared: Prepared) -> Result<ServedContent, Error> {
    let certificate = prepared
        .material
        .certificate
        .as_ref()
        .ok_or(Error::MissingCertificate)?
        .to_pem()
        .map_err(|e| Error::Load(e.into()))?;

    Ok(ServedContent {
        document: prepared.document.into(),
        certificate: certificate.into(),
    })
}
