//! # bms-token
//!
//! Stateless bearer token issuance and validation.
//!
//! Tokens are HS256-signed JWTs carrying the principal's id, identifier
//! and role. They are self-contained: once issued, a token stays valid
//! until its expiry and cannot be revoked server-side. Lifetimes should
//! be chosen with that in mind.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod claims;
pub mod error;
pub mod manager;

pub use claims::BearerClaims;
pub use error::{TokenError, TokenResult};
pub use manager::{SigningSecret, TokenManager};
