//! # bms-crypto
//!
//! Cryptographic primitives for the BMS authentication core, backed by
//! aws-lc-rs and the thread-local CSPRNG.
//!
//! This crate covers the three primitive needs of the login protocol:
//! secure random material (session identifiers, pending-MFA tickets, TOTP
//! secrets), keyed HMAC for one-time-code derivation, and constant-time
//! comparison for code checks.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod hmac;
pub mod random;
pub mod verify;

pub use hmac::{hmac_sha1, hmac_sha256, hmac_sha512};
pub use random::{
    generate_otp_secret, generate_session_id, generate_ticket_id, random_alphanumeric,
    random_bytes,
};
pub use verify::constant_time_eq;
