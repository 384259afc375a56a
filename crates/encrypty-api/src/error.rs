//! Listener lifecycle errors for the gateway host.

use std::net::SocketAddr;

use thiserror::Error;

/// Result alias for gateway hosting operations.
pub type ApiServerResult<T> = Result<T, ApiServerError>;

/// Failures binding or running the gateway listener.
#[derive(Debug, Error)]
pub enum ApiServerError {
    /// The listener could not claim its address.
    #[error("failed to bind gateway listener")]
    Bind {
        /// Address requested by configuration.
        addr: SocketAddr,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The accept loop stopped with an error.
    #[error("gateway listener stopped unexpectedly")]
    Serve {
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}
