//! Exactly-once resolution of a method invocation.
//!
//! Every invocation owns one [`Responder`]. Whoever holds it (the gateway
//! during validation, the handler afterwards) resolves it at most once;
//! the completion callback behind it fires exactly once on every path.

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{Error, Result};

/// Outcome of a single method invocation.
pub type InvocationResult = Result<Value>;

/// Boxed completion callback supplied by the method-call transport.
pub type Completion = Box<dyn FnOnce(InvocationResult) + Send + 'static>;

/// Handler error code resolved when an invocation is dropped unresolved.
pub const HANDLER_UNRESOLVED: &str = "handler.unresolved";

/// Single-use wrapper around an invocation's completion callback.
///
/// The callback sits in a take-once slot: the first [`resolve`](Self::resolve)
/// consumes it, a second is dropped with an error log. If a handler lets
/// the responder fall out of scope without resolving, the drop guard
/// resolves the completion with a [`HANDLER_UNRESOLVED`] error instead of
/// leaving the caller waiting forever.
pub struct Responder {
    method: String,
    completion: Mutex<Option<Completion>>,
}

impl Responder {
    /// Wrap a completion callback for the named method.
    pub fn new(
        method: impl Into<String>,
        completion: impl FnOnce(InvocationResult) + Send + 'static,
    ) -> Self {
        Self {
            method: method.into(),
            completion: Mutex::new(Some(Box::new(completion))),
        }
    }

    /// Method name this invocation targets.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Deliver the invocation's result through the completion callback.
    ///
    /// Only the first resolution reaches the caller.
    pub fn resolve(&self, result: InvocationResult) {
        match self.completion.lock().take() {
            Some(completion) => completion(result),
            None => {
                tracing::error!(
                    method = %self.method,
                    "invocation already resolved; dropping duplicate resolution"
                );
            }
        }
    }
}

impl Drop for Responder {
    fn drop(&mut self) {
        if let Some(completion) = self.completion.get_mut().take() {
            tracing::error!(
                method = %self.method,
                "invocation dropped without resolving"
            );
            completion(Err(Error::Handler {
                code: HANDLER_UNRESOLVED.into(),
                message: format!(
                    "Handler for '{}' completed without resolving the invocation.",
                    self.method
                ),
                details: None,
            }));
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
