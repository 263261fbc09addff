//! Time-based one-time password (TOTP) engine.
//!
//! Implements RFC 6238 on top of RFC 4226 dynamic truncation: HMAC-SHA1
//! over the big-endian time-step counter, 6 decimal digits, 30 second
//! steps, and a one-step look-around to absorb clock drift. Secrets are
//! 160-bit random values exchanged as unpadded RFC 4648 base32.

use serde::Serialize;

use crate::error::{AuthError, AuthResult};

/// OTP hash algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpAlgorithm {
    /// HMAC-SHA1 (default, what authenticator apps expect).
    Sha1,
    /// HMAC-SHA256.
    Sha256,
    /// HMAC-SHA512.
    Sha512,
}

impl OtpAlgorithm {
    /// Returns the algorithm name as it appears in provisioning URIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }
}

/// TOTP configuration.
#[derive(Debug, Clone)]
pub struct TotpConfig {
    /// Number of digits in the code.
    pub digits: u8,
    /// Time step in seconds.
    pub period: u32,
    /// Hash algorithm.
    pub algorithm: OtpAlgorithm,
    /// Number of steps to check before/after the current one.
    pub look_around: u32,
}

impl Default for TotpConfig {
    fn default() -> Self {
        Self {
            digits: 6,
            period: 30,
            algorithm: OtpAlgorithm::Sha1,
            look_around: 1,
        }
    }
}

impl TotpConfig {
    /// Creates a new TOTP configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of digits.
    #[must_use]
    pub const fn digits(mut self, digits: u8) -> Self {
        self.digits = digits;
        self
    }

    /// Sets the time step in seconds.
    #[must_use]
    pub const fn period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }

    /// Sets the hash algorithm.
    #[must_use]
    pub const fn algorithm(mut self, algorithm: OtpAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the look-around window.
    #[must_use]
    pub const fn look_around(mut self, steps: u32) -> Self {
        self.look_around = steps;
        self
    }
}

/// Generates a new 160-bit secret, base32-encoded without padding.
#[must_use]
pub fn generate_secret() -> String {
    base32::encode(
        base32::Alphabet::Rfc4648 { padding: false },
        &bms_crypto::generate_otp_secret(),
    )
}

/// Decodes a base32 secret back to raw bytes.
///
/// Accepts both cases and ignores padding. Returns `None` if the input
/// is not valid base32.
#[must_use]
pub fn decode_secret(secret: &str) -> Option<Vec<u8>> {
    let normalized = secret.trim_end_matches('=').to_ascii_uppercase();
    base32::decode(base32::Alphabet::Rfc4648 { padding: false }, &normalized)
}

/// Builds an `otpauth://` provisioning URI for authenticator apps.
#[must_use]
pub fn provisioning_uri(secret: &str, issuer: &str, account: &str, config: &TotpConfig) -> String {
    format!(
        "otpauth://totp/{}:{}?secret={}&issuer={}&algorithm={}&digits={}&period={}",
        urlencoding::encode(issuer),
        urlencoding::encode(account),
        secret,
        urlencoding::encode(issuer),
        config.algorithm.as_str(),
        config.digits,
        config.period,
    )
}

/// A freshly generated, not yet confirmed authenticator enrollment.
///
/// Nothing is persisted at this point. The secret becomes active only
/// after the caller proves possession by confirming with a valid code.
#[derive(Debug, Clone, Serialize)]
pub struct MfaEnrollment {
    /// Base32-encoded secret for manual entry.
    pub secret: String,
    /// `otpauth://` URI for QR provisioning.
    pub provisioning_uri: String,
}

impl MfaEnrollment {
    /// Generates a new enrollment for an account.
    #[must_use]
    pub fn generate(issuer: &str, account: &str, config: &TotpConfig) -> Self {
        let secret = generate_secret();
        let provisioning_uri = provisioning_uri(&secret, issuer, account, config);
        Self {
            secret,
            provisioning_uri,
        }
    }
}

/// TOTP code verifier.
pub struct TotpVerifier;

impl TotpVerifier {
    /// Verifies a code against the current time.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidMfaCode`] if the code does not match
    /// any step within the look-around window.
    pub fn verify(secret: &[u8], code: &str, config: &TotpConfig) -> AuthResult<()> {
        Self::verify_at(secret, code, Self::unix_now()?, config)
    }

    /// Verifies a code against an explicit Unix timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidMfaCode`] if the code does not match
    /// any step within the look-around window.
    pub fn verify_at(
        secret: &[u8],
        code: &str,
        unix_time: u64,
        config: &TotpConfig,
    ) -> AuthResult<()> {
        let current_counter = unix_time / u64::from(config.period);

        for offset in 0..=config.look_around {
            if Self::check_counter(
                secret,
                current_counter.saturating_add(u64::from(offset)),
                code,
                config,
            ) {
                return Ok(());
            }

            if offset > 0
                && Self::check_counter(
                    secret,
                    current_counter.saturating_sub(u64::from(offset)),
                    code,
                    config,
                )
            {
                return Ok(());
            }
        }

        Err(AuthError::InvalidMfaCode)
    }

    /// Generates the code for the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if time cannot be determined.
    pub fn generate(secret: &[u8], config: &TotpConfig) -> AuthResult<String> {
        Ok(Self::generate_at(secret, Self::unix_now()?, config))
    }

    /// Generates the code for an explicit Unix timestamp.
    #[must_use]
    pub fn generate_at(secret: &[u8], unix_time: u64, config: &TotpConfig) -> String {
        let counter = unix_time / u64::from(config.period);
        Self::code_at_counter(secret, counter, config.digits, config.algorithm)
    }

    /// Generates the code for a raw step counter.
    #[must_use]
    pub fn code_at_counter(
        secret: &[u8],
        counter: u64,
        digits: u8,
        algorithm: OtpAlgorithm,
    ) -> String {
        let hmac = Self::compute_hmac(secret, counter, algorithm);
        let code = Self::truncate(&hmac, digits);
        format!("{:0width$}", code, width = digits as usize)
    }

    fn check_counter(secret: &[u8], counter: u64, code: &str, config: &TotpConfig) -> bool {
        let expected = Self::code_at_counter(secret, counter, config.digits, config.algorithm);
        bms_crypto::constant_time_eq(code.as_bytes(), expected.as_bytes())
    }

    fn compute_hmac(secret: &[u8], counter: u64, algorithm: OtpAlgorithm) -> Vec<u8> {
        let counter_bytes = counter.to_be_bytes();

        match algorithm {
            OtpAlgorithm::Sha1 => bms_crypto::hmac_sha1(secret, &counter_bytes),
            OtpAlgorithm::Sha256 => bms_crypto::hmac_sha256(secret, &counter_bytes),
            OtpAlgorithm::Sha512 => bms_crypto::hmac_sha512(secret, &counter_bytes),
        }
    }

    fn truncate(hmac: &[u8], digits: u8) -> u32 {
        let offset = (hmac.last().unwrap_or(&0) & 0x0f) as usize;
        let code = u32::from_be_bytes([
            hmac.get(offset).copied().unwrap_or(0) & 0x7f,
            hmac.get(offset + 1).copied().unwrap_or(0),
            hmac.get(offset + 2).copied().unwrap_or(0),
            hmac.get(offset + 3).copied().unwrap_or(0),
        ]);
        code % 10_u32.pow(u32::from(digits))
    }

    fn unix_now() -> AuthResult<u64> {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|e| AuthError::Internal(e.to_string()))
    }
}
