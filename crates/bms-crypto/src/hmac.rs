//! Keyed HMAC computation.
//!
//! Backs the one-time-code derivation in the MFA engine. SHA-1 is kept
//! for RFC 6238 interoperability only; authenticator apps default to it.

use aws_lc_rs::hmac;

/// Computes HMAC-SHA1 over `data` with `key`.
///
/// SHA-1 HMAC remains the interoperable default for TOTP; it is not used
/// anywhere else in the system.
#[must_use]
pub fn hmac_sha1(key: &[u8], data: &[u8]) -> Vec<u8> {
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, key);
    hmac::sign(&key, data).as_ref().to_vec()
}

/// Computes HMAC-SHA256 over `data` with `key`.
#[must_use]
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let key = hmac::Key::new(hmac::HMAC_SHA256, key);
    hmac::sign(&key, data).as_ref().to_vec()
}

/// Computes HMAC-SHA512 over `data` with `key`.
#[must_use]
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> Vec<u8> {
    let key = hmac::Key::new(hmac::HMAC_SHA512, key);
    hmac::sign(&key, data).as_ref().to_vec()
}
