//! # Method Dispatch
//!
//! Validates and routes named method invocations arriving from the
//! plugin's method-call channel.
//!
//! ## Invocation Lifecycle
//!
//! ```text
//! RECEIVED ──► VALIDATING ──► DISPATCHED ──► (handler resolves) ──► RESOLVED
//!                  │
//!                  └──► REJECTED (argumentsMissing / requiredArgumentMissing /
//!                                 methodNotImplemented)
//! ```
//!
//! Validation is synchronous; the handler stage may suspend while the
//! native SDK runs (e.g. a browser-based auth flow). Every invocation
//! resolves its completion exactly once, on every path: rejection resolves
//! before any handler runs, and dispatch hands the [`Responder`] to the
//! handler verbatim without ever touching the result.
//!
//! The gateway holds no per-invocation state. Its method registry is built
//! once and never mutated, so concurrent invocations are fully
//! independent.

mod arguments;
mod responder;

pub use arguments::{web_auth, MethodArgument};
pub use responder::{Completion, InvocationResult, Responder, HANDLER_UNRESOLVED};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::Error;

/// Argument mapping carried by a method invocation.
pub type ArgumentMap = serde_json::Map<String, Value>;

/// A handler for one registered method.
///
/// Receives the full argument mapping (validated against the method's
/// required keys, but otherwise untouched) and the invocation's responder.
/// The handler owns the resolution from here: success and error results
/// both pass through the gateway unchanged.
#[async_trait]
pub trait MethodHandler: Send + Sync {
    /// Execute the method and resolve the invocation.
    async fn handle(&self, arguments: ArgumentMap, responder: Responder);
}

struct MethodSpec {
    /// Required argument keys, in declaration order.
    required: Vec<MethodArgument>,
    handler: Arc<dyn MethodHandler>,
}

/// Builder for a [`MethodDispatchGateway`].
///
/// Registering a method binds its handler and its required-argument
/// declaration in one step; a method cannot end up in the requirement
/// table without a handler behind it.
#[derive(Default)]
pub struct GatewayBuilder {
    methods: HashMap<String, MethodSpec>,
}

impl GatewayBuilder {
    /// Register a handler for a method name with its required arguments.
    pub fn method(
        mut self,
        name: impl Into<String>,
        required: &[MethodArgument],
        handler: impl MethodHandler + 'static,
    ) -> Self {
        self.methods.insert(
            name.into(),
            MethodSpec {
                required: required.to_vec(),
                handler: Arc::new(handler),
            },
        );
        self
    }

    /// Finalize the registry.
    pub fn build(self) -> MethodDispatchGateway {
        MethodDispatchGateway {
            methods: self.methods,
        }
    }
}

/// Routes named invocations to registered handlers.
pub struct MethodDispatchGateway {
    methods: HashMap<String, MethodSpec>,
}

impl MethodDispatchGateway {
    /// Start building a gateway.
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::default()
    }

    /// Registered method names, sorted for deterministic iteration.
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Handle one method invocation.
    ///
    /// `arguments` is whatever the transport delivered: an object mapping,
    /// something malformed, or nothing at all. The completion is resolved
    /// exactly once, immediately on a validation failure and by the
    /// handler (or its drop guard) otherwise.
    pub async fn handle(
        &self,
        method: &str,
        arguments: Option<Value>,
        completion: impl FnOnce(InvocationResult) + Send + 'static,
    ) {
        let invocation = Uuid::new_v4();
        let responder = Responder::new(method, completion);

        let arguments = match arguments {
            Some(Value::Object(map)) => map,
            _ => {
                tracing::warn!(%invocation, method, "method call carried no argument mapping");
                responder.resolve(Err(Error::ArgumentsMissing));
                return;
            }
        };

        let Some(spec) = self.methods.get(method) else {
            tracing::warn!(%invocation, method, "no handler registered for method");
            responder.resolve(Err(Error::MethodNotImplemented(method.to_string())));
            return;
        };

        // Only the first missing key is reported, in declaration order.
        if let Some(missing) = spec
            .required
            .iter()
            .find(|argument| !arguments.contains_key(argument.key()))
        {
            tracing::warn!(%invocation, method, missing = missing.key(), "required argument missing");
            responder.resolve(Err(Error::RequiredArgumentMissing(missing.key().to_string())));
            return;
        }

        tracing::debug!(%invocation, method, "dispatching method call");
        spec.handler.handle(arguments, responder).await;
    }

    /// Future-returning convenience over [`handle`](Self::handle).
    pub async fn call(&self, method: &str, arguments: Option<Value>) -> InvocationResult {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.handle(method, arguments, move |result| {
            let _ = tx.send(result);
        })
        .await;
        rx.await.unwrap_or_else(|_| {
            Err(Error::Internal(
                "completion channel closed without a resolution".into(),
            ))
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
