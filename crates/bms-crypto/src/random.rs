//! Cryptographically secure random generation.
//!
//! This module provides secure random material for:
//! - Session identifiers (opaque server-side credentials)
//! - Pending-MFA ticket identifiers
//! - TOTP shared secrets
//!
//! All functions use the thread-local random number generator, which is
//! cryptographically secure by default.

use rand::distr::{Alphanumeric, SampleString};
use rand::Rng;

/// Byte length of generated TOTP secrets (160 bits, the RFC 4226 minimum).
pub const OTP_SECRET_LENGTH: usize = 20;

/// Generates a cryptographically secure random byte array.
///
/// # Arguments
///
/// * `len` - Number of random bytes to generate
#[must_use]
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes[..]);
    bytes
}

/// Generates a cryptographically secure random string.
///
/// The string contains alphanumeric characters (a-z, A-Z, 0-9) and is
/// suitable for opaque credentials.
///
/// # Arguments
///
/// * `len` - Length of the string to generate
#[must_use]
pub fn random_alphanumeric(len: usize) -> String {
    let mut rng = rand::rng();
    Alphanumeric.sample_string(&mut rng, len)
}

/// Generates a secure random session identifier.
///
/// Creates a 32-character alphanumeric identifier. The identifier has
/// approximately 190 bits of entropy (log2(62^32)), well beyond the
/// minimum for an unguessable credential.
#[must_use]
pub fn generate_session_id() -> String {
    random_alphanumeric(32)
}

/// Generates a secure random pending-MFA ticket identifier.
///
/// Creates a 24-character alphanumeric identifier. Tickets are short-lived
/// and single-use, so 24 characters (~142 bits) is ample.
#[must_use]
pub fn generate_ticket_id() -> String {
    random_alphanumeric(24)
}

/// Generates a fresh TOTP shared secret.
///
/// Returns [`OTP_SECRET_LENGTH`] raw bytes; callers encode for display.
#[must_use]
pub fn generate_otp_secret() -> Vec<u8> {
    random_bytes(OTP_SECRET_LENGTH)
}
