//! # Auth Bridge Core
//!
//! The platform-side core of the cross-platform authentication plugin: it
//! sits between the plugin's method-call channel and the native
//! authentication SDK.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        AUTH BRIDGE MODULES                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   scripting side ──(method, arguments, completion)──►                   │
//! │                                                                         │
//! │  ┌──────────────────────────┐        ┌──────────────────────────────┐   │
//! │  │   MethodDispatchGateway  │        │     ClaimsProfileMapper      │   │
//! │  │                          │        │                              │   │
//! │  │  - argument validation   │        │  - claims → UserProfile      │   │
//! │  │  - per-method routing    │        │  - UserProfile → mapping     │   │
//! │  │  - exactly-once resolve  │        │  - custom-claim derivation   │   │
//! │  └────────────┬─────────────┘        └──────────────┬───────────────┘   │
//! │               │                                     │                   │
//! │               ▼                                     ▼                   │
//! │      registered handlers                 token decoder / native SDK     │
//! │      (native auth SDK)                   (external collaborators)       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types and the structured wire payload
//! - [`claims`] - Typed access to decoded token claims
//! - [`profile`] - The canonical [`UserProfile`] record and its two-way
//!   claim mapping
//! - [`gateway`] - Method-call validation, routing and resolution
//!
//! The authentication handshake itself (token acquisition, redirects,
//! storage) and the method-call transport live outside this crate; the
//! bridge only routes method calls and converts profiles.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod claims;
pub mod error;
pub mod gateway;
pub mod profile;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use error::{Error, Result};
pub use gateway::{
    ArgumentMap, InvocationResult, MethodArgument, MethodDispatchGateway, MethodHandler, Responder,
};
pub use profile::UserProfile;

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of the bridge core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================================
// TESTS
// ============================================================================
