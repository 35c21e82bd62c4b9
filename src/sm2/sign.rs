//! Component H.2: SM2 signature generation and verification.

use super::der::{decode_der_signature, encode_der_signature};
use super::z::compute_z;
use crate::curve::Point;
use crate::error::{Error, Result};
use crate::field::{Scalar, U256};
use crate::sm3::sm3;
use rand::rngs::OsRng;
use rand::RngCore;

/// An `(r, s)` signature pair, each in `[1, n-1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Signature {
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl Signature {
    /// Serializes as two 32-byte big-endian fields concatenated.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }

    pub fn from_bytes(b: &[u8]) -> Result<Signature> {
        if b.len() != 64 {
            return Err(Error::InvalidEncoding("raw SM2 signature must be 64 bytes"));
        }
        Ok(Signature {
            r: b[..32].try_into().unwrap(),
            s: b[32..].try_into().unwrap(),
        })
    }

    pub fn to_der(&self) -> Vec<u8> {
        encode_der_signature(&self.r, &self.s)
    }

    pub fn from_der(der: &[u8]) -> Result<Signature> {
        let (r, s) = decode_der_signature(der)?;
        Ok(Signature { r, s })
    }
}

/// Computes `e`, the pre-hashed message digest fed into the sign/verify
/// core. When `hash` is true, `Z` is prefixed per GM/T 0003.2; when false,
/// `msg` is assumed to already be the caller-supplied digest (the
/// interop path for callers who compute `Z` themselves).
fn digest_e(msg: &[u8], id: Option<&[u8]>, public_key: &Point, hash: bool) -> Result<U256> {
    let e_bytes = if hash {
        let z = compute_z(id, public_key)?;
        let mut buf = Vec::with_capacity(z.len() + msg.len());
        buf.extend_from_slice(&z);
        buf.extend_from_slice(msg);
        sm3(&buf)
    } else {
        if msg.len() != 32 {
            return Err(Error::InvalidEncoding("pre-hashed message must be a 32-byte digest"));
        }
        msg.try_into().unwrap()
    };
    Ok(U256::from_be_bytes(&e_bytes))
}

fn draw_nonzero_scalar_below_n() -> Result<Scalar> {
    let n = Scalar::modulus();
    let n_minus_1 = {
        let one = U256::ONE;
        n.sub_borrow(&one).0
    };
    loop {
        let mut raw = [0u8; 32];
        OsRng.try_fill_bytes(&mut raw).map_err(|_| Error::RngFailure)?;
        let raw = U256::from_be_bytes(&raw);
        let reduced = crate::field::reduce(&raw, &n_minus_1);
        let (k, _) = reduced.add_carry(&U256::ONE);
        if !k.is_zero() {
            return Ok(Scalar::create(k));
        }
    }
}

/// Signs `msg` under private key `d` (with public key `public_key`, needed
/// to compute `Z`). `id` defaults per [`super::z::DEFAULT_ID`] when absent.
/// `hash = false` skips `Z` prefixing and treats `msg` as an already-computed
/// digest.
pub fn sign(msg: &[u8], d: &Scalar, public_key: &Point, id: Option<&[u8]>, hash: bool) -> Result<Signature> {
    let e = digest_e(msg, id, public_key, hash)?;
    let n = Scalar::modulus();

    // e is a raw SM3 digest (up to 2^256-1) and x1 is reduced mod p, not n;
    // both can exceed n since p > n. add_mod's single-subtraction fast path
    // only holds for operands already < n, so both must be reduced mod n
    // before combining, per GM/T 0003.2 step A5.
    let e = crate::field::reduce(&e, &n);

    loop {
        let k = draw_nonzero_scalar_below_n()?;
        let (x1, _) = Point::generator().scalar_mul(&k).to_affine()?;
        let x1_mod_n = crate::field::reduce(&x1.0, &n);

        let r = crate::field::add_mod(&e, &x1_mod_n, &n);
        if r.is_zero() {
            log::trace!("sm2 sign: r == 0, redrawing k");
            continue;
        }
        let (r_plus_k, carry) = r.add_carry(&k.0);
        if !carry && r_plus_k == n {
            log::trace!("sm2 sign: r + k == n, redrawing k");
            continue;
        }

        // s = (1 + d)^-1 * (k - r*d) mod n
        let one_plus_d = crate::field::add_mod(&d.0, &U256::ONE, &n);
        let inv = crate::field::inv_mod(&one_plus_d, &n)?;
        let r_d = crate::field::mul_mod(&r, &d.0, &n);
        let k_minus_rd = crate::field::sub_mod(&k.0, &r_d, &n);
        let s = crate::field::mul_mod(&inv, &k_minus_rd, &n);
        if s.is_zero() {
            log::trace!("sm2 sign: s == 0, redrawing k");
            continue;
        }

        return Ok(Signature {
            r: r.to_be_bytes(),
            s: s.to_be_bytes(),
        });
    }
}

/// Verifies `sig` over `msg` under public key `public_key`. Returns `false`
/// for any forged or malformed-but-parseable signature — forgery never
/// raises, per the crate's error policy.
pub fn verify(msg: &[u8], sig: &Signature, public_key: &Point, id: Option<&[u8]>, hash: bool) -> bool {
    let n = Scalar::modulus();
    let r = U256::from_be_bytes(&sig.r);
    let s = U256::from_be_bytes(&sig.s);

    let n_minus_1 = n.sub_borrow(&U256::ONE).0;
    if r.is_zero() || r > n_minus_1 || s.is_zero() || s > n_minus_1 {
        return false;
    }

    let e = match digest_e(msg, id, public_key, hash) {
        Ok(e) => e,
        Err(_) => return false,
    };
    let e = crate::field::reduce(&e, &n);

    let t = crate::field::add_mod(&r, &s, &n);
    if t.is_zero() {
        return false;
    }

    let s_scalar = Scalar::create(s);
    let t_scalar = Scalar::create(t);
    let point = Point::generator().scalar_mul(&s_scalar).add(&public_key.scalar_mul(&t_scalar));
    let (x1, _) = match point.to_affine() {
        Ok(v) => v,
        Err(_) => return false,
    };

    let x1_mod_n = crate::field::reduce(&x1.0, &n);
    let check = crate::field::add_mod(&e, &x1_mod_n, &n);
    check == r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sm2::keypair::generate_keypair;

    #[test]
    fn sign_then_verify_round_trip() {
        let kp = generate_keypair().unwrap();
        let msg = b"a message to authenticate";
        let sig = sign(msg, &kp.private_key, &kp.public_key, None, true).unwrap();
        assert!(verify(msg, &sig, &kp.public_key, None, true));
    }

    #[test]
    fn tampered_message_fails_verification() {
        let kp = generate_keypair().unwrap();
        let sig = sign(b"original", &kp.private_key, &kp.public_key, None, true).unwrap();
        assert!(!verify(b"tampered", &sig, &kp.public_key, None, true));
    }

    #[test]
    fn wrong_key_fails_verification() {
        let kp1 = generate_keypair().unwrap();
        let kp2 = generate_keypair().unwrap();
        let msg = b"a message";
        let sig = sign(msg, &kp1.private_key, &kp1.public_key, None, true).unwrap();
        assert!(!verify(msg, &sig, &kp2.public_key, None, true));
    }

    #[test]
    fn der_round_trip_preserves_verification() {
        let kp = generate_keypair().unwrap();
        let msg = b"der-wrapped signature";
        let sig = sign(msg, &kp.private_key, &kp.public_key, None, true).unwrap();
        let der = sig.to_der();
        let sig2 = Signature::from_der(&der).unwrap();
        assert!(verify(msg, &sig2, &kp.public_key, None, true));
    }

    #[test]
    fn signature_round_trips_through_json() {
        let kp = generate_keypair().unwrap();
        let sig = sign(b"serde round trip", &kp.private_key, &kp.public_key, None, true).unwrap();
        let json = serde_json::to_string(&sig).unwrap();
        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(sig, back);
    }

    #[test]
    fn out_of_range_digest_still_yields_a_valid_in_range_signature() {
        // A pre-hashed "digest" of all 0xFF bytes is numerically larger than
        // n, exercising the e >= n case that must be reduced before use in
        // the r = (e + x1) mod n step (GM/T 0003.2 step A5/B5) rather than
        // fed straight into add_mod, whose fast path assumes both operands
        // are already below n.
        let kp = generate_keypair().unwrap();
        let digest = [0xffu8; 32];
        let sig = sign(&digest, &kp.private_key, &kp.public_key, None, false).unwrap();
        let n_minus_1 = Scalar::modulus().sub_borrow(&U256::ONE).0;
        assert!(U256::from_be_bytes(&sig.r) <= n_minus_1);
        assert!(U256::from_be_bytes(&sig.s) <= n_minus_1);
        assert!(verify(&digest, &sig, &kp.public_key, None, false));
    }

    #[test]
    fn pre_hashed_path_skips_z_prefix() {
        let kp = generate_keypair().unwrap();
        let digest = sm3(b"already hashed upstream");
        let sig = sign(&digest, &kp.private_key, &kp.public_key, None, false).unwrap();
        assert!(verify(&digest, &sig, &kp.public_key, None, false));
        // Same digest bytes through the hashing path produce a different
        // (and non-verifying) signature since Z is no longer prefixed.
        assert!(!verify(&digest, &sig, &kp.public_key, None, true));
    }
}
