//! Error types
//!
//! The gateway distinguishes exactly two user-visible error classes:
//! parameter errors (malformed or missing caller input, detected before any
//! downstream call) and system errors (node, transport, or serialization
//! failures). Both map onto the response envelope codes.

use thiserror::Error;

/// Envelope code for a successful response.
pub const CODE_SUCCESS: i64 = 0;
/// Envelope code for a parameter error.
pub const CODE_PARAM_ERROR: i64 = 1;
/// Envelope code for a system or downstream error.
pub const CODE_SYSTEM_ERROR: i64 = 500;

/// User-visible gateway error.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    /// Malformed or missing caller input. Never triggers a downstream call.
    #[error("{0}")]
    Param(String),

    /// Downstream node, transport, or serialization failure.
    #[error("{0}")]
    System(String),
}

impl GatewayError {
    pub fn param(msg: impl Into<String>) -> Self {
        GatewayError::Param(msg.into())
    }

    pub fn system(msg: impl Into<String>) -> Self {
        GatewayError::System(msg.into())
    }

    /// The response envelope code for this error class.
    pub fn code(&self) -> i64 {
        match self {
            GatewayError::Param(_) => CODE_PARAM_ERROR,
            GatewayError::System(_) => CODE_SYSTEM_ERROR,
        }
    }
}

impl From<anyhow::Error> for GatewayError {
    fn from(err: anyhow::Error) -> Self {
        GatewayError::System(format!("{:#}", err))
    }
}
