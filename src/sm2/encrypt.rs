//! Component H.3: SM2 public-key encryption, `C1 || C3 || C2` by default
//! (the current-standard layout) with `C1 || C2 || C3` supported as a
//! selectable legacy variant on decrypt.

use super::kdf::kdf;
use crate::curve::Point;
use crate::error::{Error, Result};
use crate::field::{Scalar, U256};
use crate::sm3::sm3;
use crate::util::{is_all_zero, xor_bytes};
use rand::rngs::OsRng;
use rand::RngCore;

/// Selects which of the two standardized component orderings a ciphertext
/// uses. `C1C3C2` is the layout mandated by the current standard and is
/// this crate's default; `C1C2C3` is the legacy ordering some deployed
/// systems still emit, supported here for interoperability on decrypt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum CiphertextLayout {
    #[default]
    C1C3C2,
    C1C2C3,
}

fn draw_ephemeral_scalar() -> Result<Scalar> {
    let n = Scalar::modulus();
    let n_minus_1 = n.sub_borrow(&U256::ONE).0;
    loop {
        let mut raw = [0u8; 32];
        OsRng.try_fill_bytes(&mut raw).map_err(|_| Error::RngFailure)?;
        let reduced = crate::field::reduce(&U256::from_be_bytes(&raw), &n_minus_1);
        let (k, _) = reduced.add_carry(&U256::ONE);
        if !k.is_zero() {
            return Ok(Scalar::create(k));
        }
    }
}

/// Encrypts `msg` under public key `public_key`, producing a ciphertext in
/// the requested layout (`C1C3C2` by default).
pub fn encrypt(msg: &[u8], public_key: &Point, layout: CiphertextLayout) -> Result<Vec<u8>> {
    loop {
        let k = draw_ephemeral_scalar()?;
        let c1_point = Point::generator().scalar_mul(&k);
        let c1 = c1_point.to_uncompressed()?;

        let (x2, y2) = public_key.scalar_mul(&k).to_affine()?;
        let mut shared = Vec::with_capacity(64);
        shared.extend_from_slice(&x2.to_bytes());
        shared.extend_from_slice(&y2.to_bytes());

        let t = kdf(&shared, msg.len());
        if !t.is_empty() && is_all_zero(&t) {
            log::trace!("sm2 encrypt: KDF output was all-zero, redrawing ephemeral key");
            continue;
        }

        let mut c2 = msg.to_vec();
        xor_bytes(&mut c2, &t);

        let mut c3_input = Vec::with_capacity(32 + msg.len() + 32);
        c3_input.extend_from_slice(&x2.to_bytes());
        c3_input.extend_from_slice(msg);
        c3_input.extend_from_slice(&y2.to_bytes());
        let c3 = sm3(&c3_input);

        let mut out = Vec::with_capacity(c1.len() + c2.len() + c3.len());
        out.extend_from_slice(&c1);
        match layout {
            CiphertextLayout::C1C3C2 => {
                out.extend_from_slice(&c3);
                out.extend_from_slice(&c2);
            }
            CiphertextLayout::C1C2C3 => {
                out.extend_from_slice(&c2);
                out.extend_from_slice(&c3);
            }
        }
        return Ok(out);
    }
}

/// Decrypts ciphertext `ct` (in the given layout) under private key `d`.
pub fn decrypt(ct: &[u8], d: &Scalar, layout: CiphertextLayout) -> Result<Vec<u8>> {
    if ct.len() < 65 + 32 {
        return Err(Error::InvalidCiphertext);
    }
    let c1 = &ct[..65];
    let c1_point = Point::from_bytes(c1).map_err(|_| Error::InvalidCiphertext)?;

    let (c2, c3) = match layout {
        CiphertextLayout::C1C3C2 => {
            let c3 = &ct[65..65 + 32];
            let c2 = &ct[65 + 32..];
            (c2, c3)
        }
        CiphertextLayout::C1C2C3 => {
            let c2 = &ct[65..ct.len() - 32];
            let c3 = &ct[ct.len() - 32..];
            (c2, c3)
        }
    };

    let (x2, y2) = c1_point.scalar_mul(d).to_affine().map_err(|_| Error::InvalidCiphertext)?;
    let mut shared = Vec::with_capacity(64);
    shared.extend_from_slice(&x2.to_bytes());
    shared.extend_from_slice(&y2.to_bytes());

    let t = kdf(&shared, c2.len());
    if !t.is_empty() && is_all_zero(&t) {
        return Err(Error::InvalidCiphertext);
    }

    let mut msg = c2.to_vec();
    xor_bytes(&mut msg, &t);

    let mut c3_input = Vec::with_capacity(32 + msg.len() + 32);
    c3_input.extend_from_slice(&x2.to_bytes());
    c3_input.extend_from_slice(&msg);
    c3_input.extend_from_slice(&y2.to_bytes());
    let expected_c3 = sm3(&c3_input);

    if expected_c3.as_slice() != c3 {
        return Err(Error::InvalidCiphertext);
    }
    Ok(msg)
}
