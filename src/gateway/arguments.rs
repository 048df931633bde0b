//! Recognized method-call argument keys and the web-auth requirement table.

use std::fmt;

/// Argument keys a method can declare as required
///
/// Validation only ever reasons about keys from this closed set; everything
/// else in the mapping passes through to the handler untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodArgument {
    /// OAuth client identifier, sent as `clientId`
    ClientId,
    /// Tenant domain, sent as `domain`
    Domain,
}

impl MethodArgument {
    /// The key under which the argument appears in the mapping.
    pub const fn key(self) -> &'static str {
        match self {
            MethodArgument::ClientId => "clientId",
            MethodArgument::Domain => "domain",
        }
    }
}

impl fmt::Display for MethodArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Method names and argument requirements for the web-auth surface.
///
/// This table is configuration, not behavior: registration wires each
/// method name to its handler together with the declaration below.
pub mod web_auth {
    use super::MethodArgument;

    /// Launches the browser-based authorize flow.
    pub const AUTHORIZE: &str = "webAuth.authorize";

    /// Clears the browser session.
    pub const CLEAR_SESSION: &str = "webAuth.clearSession";

    /// Arguments every web-auth method requires, in declaration order.
    pub const REQUIRED_ARGUMENTS: [MethodArgument; 2] =
        [MethodArgument::ClientId, MethodArgument::Domain];
}
