//! # bms-auth
//!
//! Authentication engine for the bookstore management system: password
//! hashing and verification, the typestate login flow, TOTP second
//! factor, credential transports, login throttling, role-based route
//! authorization and the service facade that ties them together.
//!
//! The facade owns no storage of its own. Credential, session and
//! pending-challenge stores are injected behind provider traits, so the
//! same engine runs against the in-memory providers in tests and
//! whatever a deployment wires in.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod flow;
pub mod gate;
pub mod password;
pub mod service;
pub mod throttle;
pub mod totp;
pub mod transport;

pub use error::{AuthError, AuthResult};
pub use flow::{states, LoginFlow, PasswordVerified};
pub use gate::AuthorizationGate;
pub use password::{PasswordHasherService, PasswordPolicy};
pub use service::{AuthService, LoginOutcome};
pub use throttle::{LoginThrottle, NoopThrottle, SlidingWindowThrottle, ThrottleDecision};
pub use totp::{MfaEnrollment, OtpAlgorithm, TotpConfig, TotpVerifier};
pub use transport::{
    build_transport, AuthContext, AuthTransport, BearerTransport, IssuedCredential,
    SessionTransport,
};
