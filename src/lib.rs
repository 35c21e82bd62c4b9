//! Chinese commercial cryptography suite: SM3 hash, SM4 block cipher, and
//! SM2 elliptic-curve signatures, encryption, and key agreement, per GM/T
//! 0004, GM/T 0002, and GM/T 0003 respectively.
//!
//! The module tree mirrors the standards: [`sm3`] and [`sm4`] are
//! self-contained primitives, [`curve`] and [`field`] hold the shared
//! elliptic-curve and modular-arithmetic machinery SM2 is built from, and
//! [`sm2`] assembles them into the three user-facing SM2 operations.
//!
//! The functions at this top level are the hex-string convenience surface:
//! they accept case-insensitive hex input and emit lowercase hex output, so
//! callers who don't want to touch [`curve::Point`] or [`field::Scalar`]
//! directly never have to. Callers working with raw key material should use
//! the typed APIs in [`sm2`] instead.

pub mod curve;
pub mod error;
pub mod field;
pub mod sm2;
pub mod sm3;
pub mod sm4;
pub mod util;

pub use error::{Error, Result};

use curve::Point;
use field::{Scalar, U256};
use sm2::encrypt::CiphertextLayout;
use sm2::sign::Signature;
use sm4::modes::{sm4_decrypt as sm4_decrypt_bytes, sm4_encrypt as sm4_encrypt_bytes, Mode, Padding, Sm4Params};
use util::{bytes_to_hex, hex_to_bytes};

/// Computes the SM3 digest of `data`, returned as lowercase hex.
pub fn sm3(data: &[u8]) -> String {
    bytes_to_hex(&sm3::sm3(data))
}

/// Computes `HMAC-SM3(key, msg)`, returned as lowercase hex.
pub fn hmac_sm3(key: &[u8], msg: &[u8]) -> String {
    bytes_to_hex(&sm3::hmac::hmac_sm3(key, msg))
}

/// Derives `length` bytes via `HKDF-SM3(ikm, salt, info)`, returned as
/// lowercase hex.
pub fn hkdf_sm3(ikm: &[u8], salt: Option<&[u8]>, info: Option<&[u8]>, length: usize) -> String {
    bytes_to_hex(&sm3::hkdf::hkdf_sm3(ikm, salt, info, length))
}

/// Encrypts `plaintext` under a 32-character hex `key` using SM4-CBC with
/// PKCS#7 padding, the mode this crate defaults to for the hex convenience
/// surface. `iv` is a 32-character hex string; ECB callers who accept the
/// mode's well-known weaknesses should use [`sm4::modes::sm4_encrypt`]
/// directly instead.
pub fn sm4_encrypt(plaintext: &[u8], key_hex: &str, iv_hex: &str) -> Result<String> {
    let key = hex_to_bytes(key_hex)?;
    let iv_bytes = hex_to_bytes(iv_hex)?;
    let iv: [u8; 16] = iv_bytes
        .try_into()
        .map_err(|_| Error::InvalidEncoding("SM4 IV must be 16 bytes"))?;
    let params = Sm4Params { mode: Mode::Cbc, iv: Some(&iv), padding: Padding::Pkcs7 };
    let ct = sm4_encrypt_bytes(plaintext, &key, &params)?;
    Ok(bytes_to_hex(&ct))
}

/// Decrypts a hex-encoded SM4-CBC/PKCS#7 ciphertext produced by
/// [`sm4_encrypt`].
pub fn sm4_decrypt(ciphertext_hex: &str, key_hex: &str, iv_hex: &str) -> Result<Vec<u8>> {
    let key = hex_to_bytes(key_hex)?;
    let iv_bytes = hex_to_bytes(iv_hex)?;
    let iv: [u8; 16] = iv_bytes
        .try_into()
        .map_err(|_| Error::InvalidEncoding("SM4 IV must be 16 bytes"))?;
    let ct = hex_to_bytes(ciphertext_hex)?;
    let params = Sm4Params { mode: Mode::Cbc, iv: Some(&iv), padding: Padding::Pkcs7 };
    sm4_decrypt_bytes(&ct, &key, &params)
}

/// Generates an SM2 keypair, returned as `(private_key_hex, public_key_hex)`
/// with the public key in uncompressed SEC1 form.
pub fn sm2_generate_keypair() -> Result<(String, String)> {
    let kp = sm2::generate_keypair()?;
    let d = bytes_to_hex(&kp.private_key.to_bytes());
    let p = bytes_to_hex(&kp.public_key.to_uncompressed()?);
    Ok((d, p))
}

fn parse_private_key(hex_str: &str) -> Result<Scalar> {
    let b = hex_to_bytes(hex_str)?;
    let arr: [u8; 32] = b.try_into().map_err(|_| Error::InvalidKey("private key must be 32 bytes"))?;
    Ok(Scalar::create(U256::from_be_bytes(&arr)))
}

fn parse_public_key(hex_str: &str) -> Result<Point> {
    let b = hex_to_bytes(hex_str)?;
    Point::from_bytes(&b)
}

/// Signs `msg` with private key `private_key_hex`, returning the DER-encoded
/// signature as lowercase hex. `id` defaults per [`sm2::DEFAULT_ID`].
pub fn sm2_sign(msg: &[u8], private_key_hex: &str, public_key_hex: &str, id: Option<&[u8]>) -> Result<String> {
    let d = parse_private_key(private_key_hex)?;
    let public_key = parse_public_key(public_key_hex)?;
    let sig = sm2::sign::sign(msg, &d, &public_key, id, true)?;
    Ok(bytes_to_hex(&sig.to_der()))
}

/// Verifies a DER-encoded SM2 signature over `msg`. Returns `false` for any
/// malformed or forged input rather than raising — see [`Error`]'s policy.
pub fn sm2_verify(msg: &[u8], signature_der_hex: &str, public_key_hex: &str, id: Option<&[u8]>) -> bool {
    let sig = match hex_to_bytes(signature_der_hex).and_then(|d| Signature::from_der(&d)) {
        Ok(sig) => sig,
        Err(_) => return false,
    };
    let public_key = match parse_public_key(public_key_hex) {
        Ok(pk) => pk,
        Err(_) => return false,
    };
    sm2::sign::verify(msg, &sig, &public_key, id, true)
}

/// Encrypts `msg` under SM2 public key `public_key_hex`, returning the
/// ciphertext in the default `C1C3C2` layout as lowercase hex.
pub fn sm2_encrypt(msg: &[u8], public_key_hex: &str) -> Result<String> {
    let public_key = parse_public_key(public_key_hex)?;
    let ct = sm2::encrypt::encrypt(msg, &public_key, CiphertextLayout::C1C3C2)?;
    Ok(bytes_to_hex(&ct))
}

/// Decrypts a `C1C3C2`-layout hex ciphertext produced by [`sm2_encrypt`].
pub fn sm2_decrypt(ciphertext_hex: &str, private_key_hex: &str) -> Result<Vec<u8>> {
    let d = parse_private_key(private_key_hex)?;
    let ct = hex_to_bytes(ciphertext_hex)?;
    sm2::encrypt::decrypt(&ct, &d, CiphertextLayout::C1C3C2)
}

/// Runs the two-party SM2 key agreement protocol for one side, given both
/// parties' static and ephemeral keys (all hex-encoded) and identifiers.
/// `is_recipient` selects which party's role this call plays in the
/// protocol's Z-value ordering; both sides must agree on who is the
/// recipient out of band.
#[allow(clippy::too_many_arguments)]
pub fn sm2_calculate_shared_key(
    own_static_private_hex: &str,
    own_static_public_hex: &str,
    own_ephemeral_private_hex: &str,
    own_ephemeral_public_hex: &str,
    own_id: Option<&[u8]>,
    peer_static_public_hex: &str,
    peer_ephemeral_public_hex: &str,
    peer_id: Option<&[u8]>,
    klen: usize,
    is_recipient: bool,
) -> Result<String> {
    let own_static_private = parse_private_key(own_static_private_hex)?;
    let own_static_public = parse_public_key(own_static_public_hex)?;
    let own_ephemeral_private = parse_private_key(own_ephemeral_private_hex)?;
    let own_ephemeral_public = parse_public_key(own_ephemeral_public_hex)?;
    let peer_static_public = parse_public_key(peer_static_public_hex)?;
    let peer_ephemeral_public = parse_public_key(peer_ephemeral_public_hex)?;

    let own_z = sm2::z::compute_z(own_id, &own_static_public)?;
    let peer_z = sm2::z::compute_z(peer_id, &peer_static_public)?;

    let own_input = sm2::agreement::AgreementInput {
        static_private: &own_static_private,
        static_public: &own_static_public,
        ephemeral_private: &own_ephemeral_private,
        ephemeral_public: &own_ephemeral_public,
    };
    // The peer's private keys never leave their side; this struct only
    // borrows the public halves a real peer would transmit over the wire.
    let dummy_private = own_ephemeral_private;
    let peer_input = sm2::agreement::AgreementInput {
        static_private: &dummy_private,
        static_public: &peer_static_public,
        ephemeral_private: &dummy_private,
        ephemeral_public: &peer_ephemeral_public,
    };

    let key = sm2::agreement::calculate_shared_key(&own_input, &peer_input, &own_z, &peer_z, klen, is_recipient)?;
    Ok(bytes_to_hex(&key))
}

/// Plain Diffie-Hellman style SM2 key exchange: `d * P`, returning the
/// resulting point's X coordinate as hex. This skips the Z-value binding
/// and mutual-authentication steps [`sm2_calculate_shared_key`] performs —
/// it exists for interop with systems that only want the underlying
/// elliptic-curve Diffie-Hellman primitive.
pub fn sm2_ecdh(private_key_hex: &str, peer_public_key_hex: &str) -> Result<String> {
    let d = parse_private_key(private_key_hex)?;
    let peer_public = parse_public_key(peer_public_key_hex)?;
    let (x, _) = peer_public.scalar_mul(&d).to_affine()?;
    Ok(bytes_to_hex(&x.to_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sm3_hex_matches_empty_vector() {
        assert_eq!(sm3(b""), "1ab21d8355cfa17f8e61194831e81a8f22bec8c728fefb747ed035eb5082aa2b");
    }

    #[test]
    fn sm4_hex_round_trip() {
        let key = "0123456789abcdeffedcba9876543210";
        let iv = "fedcba98765432100123456789abcdef";
        let ct = sm4_encrypt(b"round trip through the hex surface", key, iv).unwrap();
        let pt = sm4_decrypt(&ct, key, iv).unwrap();
        assert_eq!(pt, b"round trip through the hex surface");
    }

    #[test]
    fn sm2_hex_sign_verify_round_trip() {
        let (d, p) = sm2_generate_keypair().unwrap();
        let msg = b"hex surface message";
        let sig = sm2_sign(msg, &d, &p, None).unwrap();
        assert!(sm2_verify(msg, &sig, &p, None));
    }

    #[test]
    fn sm2_hex_encrypt_decrypt_round_trip() {
        let (d, p) = sm2_generate_keypair().unwrap();
        let msg = b"hex surface encryption";
        let ct = sm2_encrypt(msg, &p).unwrap();
        let pt = sm2_decrypt(&ct, &d).unwrap();
        assert_eq!(pt, msg);
    }

    #[test]
    fn sm2_ecdh_is_symmetric() {
        let (d_a, p_a) = sm2_generate_keypair().unwrap();
        let (d_b, p_b) = sm2_generate_keypair().unwrap();
        let shared_a = sm2_ecdh(&d_a, &p_b).unwrap();
        let shared_b = sm2_ecdh(&d_b, &p_a).unwrap();
        assert_eq!(shared_a, shared_b);
    }
}
