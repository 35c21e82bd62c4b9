use gmsuite::util::bytes_to_hex;

#[test]
fn empty_string_digest_matches_gm_t_vector() {
    assert_eq!(gmsuite::sm3(b""), "1ab21d8355cfa17f8e61194831e81a8f22bec8c728fefb747ed035eb5082aa2b");
}

#[test]
fn hmac_is_deterministic_and_keyed() {
    let msg = b"commercial cryptography message authentication";
    let a = gmsuite::sm3::hmac::hmac_sm3(b"key-one", msg);
    let b = gmsuite::sm3::hmac::hmac_sm3(b"key-two", msg);
    assert_ne!(bytes_to_hex(&a), bytes_to_hex(&b));
    assert_eq!(gmsuite::hmac_sm3(b"key-one", msg), bytes_to_hex(&a));
}

#[test]
fn hkdf_expands_to_requested_length() {
    let out = gmsuite::sm3::hkdf::hkdf_sm3(b"input key material", Some(b"salt"), Some(b"context info"), 48);
    assert_eq!(out.len(), 48);
    assert_eq!(
        gmsuite::hkdf_sm3(b"input key material", Some(b"salt"), Some(b"context info"), 48),
        bytes_to_hex(&out)
    );
}

#[test]
fn hmac_key_longer_than_block_is_prehashed() {
    // A key longer than SM3's 64-byte block is hashed down to 32 bytes before
    // use. Changing a byte past the block boundary must still change the
    // output, proving the whole key is folded in rather than truncated to
    // the first block.
    let key_a = vec![0x7au8; 200];
    let mut key_b = key_a.clone();
    key_b[150] ^= 0x01;
    assert_ne!(
        gmsuite::sm3::hmac::hmac_sm3(&key_a, b"msg"),
        gmsuite::sm3::hmac::hmac_sm3(&key_b, b"msg")
    );
}
