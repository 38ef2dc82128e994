//! Error types for device sessions

use std::convert::Infallible;

use inj_catalog::{CatalogError, Vocabulary};
use thiserror::Error;

use crate::state::SessionState;

/// Errors that can occur while opening or driving a session
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Operation attempted outside the open state
    #[error("cannot {operation}: session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// Symbol or number outside its closed vocabulary
    #[error(transparent)]
    InvalidValue(#[from] CatalogError),

    /// Driver name did not resolve
    #[error("unknown driver: {0}")]
    UnknownDriver(String),

    /// Adapter lacks the capability the operation needs
    #[error("capability error: {0}")]
    Capability(String),

    /// Driver reported a failure; message is the driver's own text
    #[error("driver error: {0}")]
    Driver(String),

    /// Driver returned a code outside its own vocabulary
    #[error("protocol violation: driver reported {vocabulary} code {code}")]
    ProtocolViolation { vocabulary: Vocabulary, code: i32 },
}

impl From<Infallible> for SessionError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Result alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
