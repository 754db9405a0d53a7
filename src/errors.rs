use std::io;

use thiserror::Error;

use crate::transport::EnvDiagnostics;

/// Fatal startup errors raised while acquiring the transport.
///
/// Every variant carries an [`EnvDiagnostics`] snapshot so the operator sees
/// the full environment picture on stderr: the usual cause is a
/// misconfigured environment, not a logic bug.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("middleware endpoint unavailable at {path}: {source}")]
    Connect {
        path: String,
        #[source]
        source: io::Error,
        diagnostics: Box<EnvDiagnostics>,
    },
    #[error("subscribe handshake failed on {topic}: {source}")]
    Handshake {
        topic: String,
        #[source]
        source: io::Error,
        diagnostics: Box<EnvDiagnostics>,
    },
}

impl TransportError {
    /// The environment snapshot captured when the error was raised.
    pub fn diagnostics(&self) -> &EnvDiagnostics {
        match self {
            TransportError::Connect { diagnostics, .. } => diagnostics,
            TransportError::Handshake { diagnostics, .. } => diagnostics,
        }
    }
}

/// Recoverable per-message emission errors.
///
/// Caught inside the bridge loop: the failing message is dropped, the error
/// is logged, and the next message is processed normally.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("JSON encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("sink write failed: {0}")]
    Io(#[from] io::Error),
}
