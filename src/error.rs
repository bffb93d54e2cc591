//! Service error taxonomy.
//!
//! | Variant       | HTTP |
//! |---------------|------|
//! | `Validation`  | 400  |
//! | `Lookup`      | 400  |
//! | `Retrieval`   | 500  |
//! | `Persistence` | 500  |
//!
//! The message is the generic text returned to callers; the store error is
//! only logged.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("{0}")]
    Lookup(&'static str),

    #[error("{message}")]
    Retrieval {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{message}")]
    Persistence {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ServiceError {
    pub fn retrieval(message: &'static str, source: StoreError) -> Self {
        tracing::error!(error = %source, "{}", message);
        Self::Retrieval { message, source }
    }

    pub fn persistence(message: &'static str, source: StoreError) -> Self {
        tracing::error!(error = %source, "{}", message);
        Self::Persistence { message, source }
    }

    /// Whether the failure is the caller's fault (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Lookup(_))
    }
}
