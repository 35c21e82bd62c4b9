//! HMAC built on SM3, per the standard HMAC construction (RFC 2104) with
//! SM3's 64-byte block size and 32-byte output.

use super::sm3;

const BLOCK_SIZE: usize = 64;
const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// Computes `HMAC-SM3(key, msg)`.
pub fn hmac_sm3(key: &[u8], msg: &[u8]) -> [u8; 32] {
    let mut block_key = [0u8; BLOCK_SIZE];
    if key.len() > BLOCK_SIZE {
        let hashed = sm3(key);
        block_key[..32].copy_from_slice(&hashed);
    } else {
        block_key[..key.len()].copy_from_slice(key);
    }

    let mut inner = Vec::with_capacity(BLOCK_SIZE + msg.len());
    inner.extend(block_key.iter().map(|b| b ^ IPAD));
    inner.extend_from_slice(msg);
    let inner_hash = sm3(&inner);

    let mut outer = Vec::with_capacity(BLOCK_SIZE + 32);
    outer.extend(block_key.iter().map(|b| b ^ OPAD));
    outer.extend_from_slice(&inner_hash);
    sm3(&outer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn differs_from_plain_hash() {
        let key = b"a key";
        let msg = b"a message";
        assert_ne!(hmac_sm3(key, msg), sm3(msg));
    }

    #[test]
    fn deterministic() {
        let key = b"a key";
        let msg = b"a message";
        assert_eq!(hmac_sm3(key, msg), hmac_sm3(key, msg));
    }

    #[test]
    fn long_key_is_pre_hashed() {
        let key = vec![0x5au8; 100];
        let msg = b"msg";
        // Must not panic and must be deterministic even though key > block size.
        let a = hmac_sm3(&key, msg);
        let b = hmac_sm3(&key, msg);
        assert_eq!(a, b);
    }
}
