//! HKDF built on SM3 (RFC 5869 extract-then-expand), using `HMAC-SM3` as the
//! underlying PRF.

use super::hmac::hmac_sm3;

const HASH_LEN: usize = 32;

/// `HKDF-Extract(salt, ikm)`.
pub fn extract(salt: &[u8], ikm: &[u8]) -> [u8; HASH_LEN] {
    let zero_salt = [0u8; HASH_LEN];
    let salt = if salt.is_empty() { &zero_salt } else { salt };
    hmac_sm3(salt, ikm)
}

/// `HKDF-Expand(prk, info, length)`.
pub fn expand(prk: &[u8], info: &[u8], length: usize) -> Vec<u8> {
    let n = length.div_ceil(HASH_LEN);
    let mut t_prev: Vec<u8> = Vec::new();
    let mut okm = Vec::with_capacity(n * HASH_LEN);
    for i in 1..=n {
        let mut input = Vec::with_capacity(t_prev.len() + info.len() + 1);
        input.extend_from_slice(&t_prev);
        input.extend_from_slice(info);
        input.push(i as u8);
        let t = hmac_sm3(prk, &input);
        okm.extend_from_slice(&t);
        t_prev = t.to_vec();
    }
    okm.truncate(length);
    okm
}

/// `HKDF-SM3(ikm, salt, info, length)`: extract then expand in one call.
pub fn hkdf_sm3(ikm: &[u8], salt: Option<&[u8]>, info: Option<&[u8]>, length: usize) -> Vec<u8> {
    let prk = extract(salt.unwrap_or(&[]), ikm);
    expand(&prk, info.unwrap_or(&[]), length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_to_requested_length() {
        let out = hkdf_sm3(b"input key material", Some(b"salt"), Some(b"info"), 100);
        assert_eq!(out.len(), 100);
    }

    #[test]
    fn deterministic() {
        let a = hkdf_sm3(b"ikm", None, None, 32);
        let b = hkdf_sm3(b"ikm", None, None, 32);
        assert_eq!(a, b);
    }

    #[test]
    fn different_info_gives_different_output() {
        let a = hkdf_sm3(b"ikm", Some(b"salt"), Some(b"a"), 32);
        let b = hkdf_sm3(b"ikm", Some(b"salt"), Some(b"b"), 32);
        assert_ne!(a, b);
    }
}
