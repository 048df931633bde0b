//! # Error Handling
//!
//! Error types for the plugin bridge.
//!
//! ## Error Hierarchy
//!
//! ```text
//! Error
//! │
//! ├── Dispatch Errors (resolved by the gateway, no handler runs)
//! │   ├── ArgumentsMissing          - No argument mapping supplied
//! │   ├── RequiredArgumentMissing   - A declared required key is absent
//! │   └── MethodNotImplemented      - No handler registered for the name
//! │
//! ├── Claim Errors (profile mapping defects)
//! │   └── ClaimTypeMismatch         - Claim present with the wrong type
//! │
//! ├── Handler Errors (opaque, passed through verbatim)
//! │   └── Handler                   - Native SDK error (code + details)
//! │
//! └── Internal                      - Unreachable-by-contract paths
//! ```
//!
//! ## Wire Shape
//!
//! The scripting side receives errors as a structured payload:
//!
//! ```text
//! { "kind": "requiredArgumentMissing", "message": "...", "missingKey": "clientId" }
//! ```
//!
//! [`Error::payload`] produces that shape. Handler-originated errors keep
//! their SDK error code as the `kind` and carry their provider details
//! unchanged; the gateway never rewrites them.

use serde_json::Value;
use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the plugin bridge
///
/// Dispatch errors are produced by the gateway during validation; claim
/// errors by the profile mapper; handler errors originate in the native
/// SDK and pass through the gateway untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ========================================================================
    // Dispatch Errors
    // ========================================================================
    /// No argument mapping was supplied with the method call
    #[error("No arguments were supplied with the method call.")]
    ArgumentsMissing,

    /// A required argument key was absent from the mapping
    #[error("Required argument '{0}' is missing.")]
    RequiredArgumentMissing(String),

    /// No handler is registered for the invoked method name
    #[error("Method '{0}' is not implemented.")]
    MethodNotImplemented(String),

    // ========================================================================
    // Claim Errors
    // ========================================================================
    /// A claim was present but carried a value of the wrong type
    ///
    /// This is a contract violation by the token decoder upstream, not a
    /// recoverable runtime condition.
    #[error("Claim '{key}' has type {found}, expected {expected}.")]
    ClaimTypeMismatch {
        /// Claim key that failed the typed extraction
        key: String,
        /// Type the caller asked for
        expected: &'static str,
        /// Type actually found in the mapping
        found: &'static str,
    },

    // ========================================================================
    // Handler Errors
    // ========================================================================
    /// An error produced by a method handler (i.e. by the native SDK)
    #[error("{message}")]
    Handler {
        /// SDK-defined error code, forwarded as the wire `kind`
        code: String,
        /// Human-readable description
        message: String,
        /// Provider-specific details, forwarded unchanged
        details: Option<Value>,
    },

    // ========================================================================
    // Internal Errors
    // ========================================================================
    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build a handler-originated error without details
    pub fn handler(code: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Handler {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// The wire discriminant for this error
    ///
    /// Handler errors keep their SDK error code; everything else uses a
    /// fixed kind string.
    pub fn kind(&self) -> &str {
        match self {
            Error::ArgumentsMissing => "argumentsMissing",
            Error::RequiredArgumentMissing(_) => "requiredArgumentMissing",
            Error::MethodNotImplemented(_) => "methodNotImplemented",
            Error::ClaimTypeMismatch { .. } => "claimTypeMismatch",
            Error::Handler { code, .. } => code,
            Error::Internal(_) => "internal",
        }
    }

    /// The structured payload delivered to the scripting side
    pub fn payload(&self) -> Value {
        let mut payload = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        match self {
            Error::RequiredArgumentMissing(key) => {
                payload["missingKey"] = Value::String(key.clone());
            }
            Error::Handler {
                details: Some(details),
                ..
            } => {
                payload["details"] = details.clone();
            }
            _ => {}
        }
        payload
    }
}

// ============================================================================
// TESTS
// ============================================================================
