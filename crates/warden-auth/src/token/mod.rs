//! Signed-token creation and validation.
//!
//! The issuer and verifier are pure: neither touches the session store or
//! the revocation service. The orchestrator layers those checks explicitly
//! so callers can compose verification differently if needed.

mod claims;
mod issuer;
mod verifier;

pub use claims::Claims;
pub use issuer::{SignedToken, TokenIssuer};
pub use verifier::TokenVerifier;
