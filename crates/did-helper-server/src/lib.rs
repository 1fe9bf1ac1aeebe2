//! Static DID HTTP server, using [axum](https://github.com/tokio-rs/axum).
//!
//! Two read-only routes are served from memory:
//!
//! - `GET /did.json`, the assembled DID document.
//! - `GET /.well-known/tls.crt`, the PEM certificate the DID was derived from.
//!
//! Content is fixed when the router is created, so every request returns
//! identical bytes.

use std::{future::IntoFuture, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{Method, Uri, header},
    response::IntoResponse,
    routing::get,
};
use thiserror::Error;
use tokio::{net::TcpListener, sync::Notify};
use tracing::{info, warn};

pub const DOCUMENT_PATH: &str = "/did.json";
pub const CERTIFICATE_PATH: &str = "/.well-known/tls.crt";

pub const DOCUMENT_CONTENT_TYPE: &str = "application/json";
pub const CERTIFICATE_CONTENT_TYPE: &str = "application/x-x509-ca-cert";

/// How long in-flight requests may take to finish once shutdown begins.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Bytes served by the router.
#[derive(Debug, Clone)]
pub struct ServedContent {
    pub document: Bytes,
    pub certificate: Bytes,
}

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },
    #[error("server failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("graceful shutdown did not finish within {0:?}")]
    ShutdownTimeout(Duration),
}

pub fn create_router(content: ServedContent) -> Router {
    Router::new()
        .route(DOCUMENT_PATH, get(handle_document))
        .route(CERTIFICATE_PATH, get(handle_certificate))
        .with_state(Arc::new(content))
}

async fn handle_document(
    method: Method,
    uri: Uri,
    State(content): State<Arc<ServedContent>>,
) -> impl IntoResponse {
    info!(path = %uri.path(), %method, "Request received");
    (
        [(header::CONTENT_TYPE, DOCUMENT_CONTENT_TYPE)],
        content.document.clone(),
    )
}

async fn handle_certificate(
    method: Method,
    uri: Uri,
    State(content): State<Arc<ServedContent>>,
) -> impl IntoResponse {
    info!(path = %uri.path(), %method, "Request received");
    (
        [(header::CONTENT_TYPE, CERTIFICATE_CONTENT_TYPE)],
        content.certificate.clone(),
    )
}

/// Binds every interface on `port`.
pub async fn bind(port: u16) -> Result<TcpListener, ServeError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { port, source })
}

/// Serves `router` until `shutdown` resolves, then waits up to
/// [SHUTDOWN_TIMEOUT] for in-flight requests.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    serve_with_timeout(listener, router, shutdown, SHUTDOWN_TIMEOUT).await
}

/// Like [serve], with the drain bounded by `drain_timeout`. Connections
/// still open after it are abandoned.
pub async fn serve_with_timeout<F>(
    listener: TcpListener,
    router: Router,
    shutdown: F,
    drain_timeout: Duration,
) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Listening on {}", listener.local_addr()?);

    let draining = Arc::new(Notify::new());

    let signal = {
        let draining = draining.clone();
        async move {
            shutdown.await;
            info!("Shutting down");
            draining.notify_one();
        }
    };

    let server = axum::serve(listener, router)
        .with_graceful_shutdown(signal)
        .into_future();
    let mut server = std::pin::pin!(server);

    tokio::select! {
        res = &mut server => return res.map_err(ServeError::Io),
        _ = draining.notified() => {}
    }

    match tokio::time::timeout(drain_timeout, server).await {
        Ok(res) => res.map_err(ServeError::Io),
        Err(_) => {
            warn!("Server did not shut down within {:?}", drain_timeout);
            Err(ServeError::ShutdownTimeout(drain_timeout))
        }
    }
}

/// Resolves on SIGINT, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
