//! Byte/encoding helpers (Component A). Hex and UTF-8 are convenience
//! encodings layered on top of the byte buffer, which is the only type that
//! crosses cryptographic API boundaries.

use crate::error::{Error, Result};

/// Decodes a hex string to bytes. Tolerant of case, rejects odd length and
/// non-hex characters.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>> {
    if s.len() % 2 != 0 {
        return Err(Error::InvalidEncoding("hex string must have even length"));
    }
    hex::decode(s).map_err(|_| Error::InvalidEncoding("malformed hex string"))
}

/// Encodes bytes as lowercase hex.
pub fn bytes_to_hex(b: &[u8]) -> String {
    hex::encode(b)
}

/// Encodes a UTF-8 string as bytes.
pub fn utf8_to_bytes(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

/// Decodes bytes as UTF-8.
pub fn bytes_to_utf8(b: &[u8]) -> Result<String> {
    String::from_utf8(b.to_vec()).map_err(|_| Error::InvalidEncoding("bytes are not valid UTF-8"))
}

/// XORs `a` and `b` in place. Panics if the lengths differ — this is a
/// programmer-error precondition, never triggered by untrusted input since
/// every caller in this crate derives both buffers from the same length.
pub fn xor_bytes(a: &mut [u8], b: &[u8]) {
    assert_eq!(a.len(), b.len(), "xor_bytes requires equal-length buffers");
    a.iter_mut().zip(b.iter()).for_each(|(x, y)| *x ^= *y);
}

/// Returns true iff every byte in `b` is zero.
pub fn is_all_zero(b: &[u8]) -> bool {
    b.iter().all(|&x| x == 0)
}
