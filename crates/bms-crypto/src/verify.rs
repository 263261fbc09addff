//! Constant-time comparison.

/// Compares two byte slices in constant time.
///
/// The comparison time depends only on the length of the inputs, not on
/// where they differ. Length mismatch returns early; length is not secret
/// for the values compared here (one-time codes of fixed width).
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
