//! Component G: the SM2 "Z value", the hash binding a user identifier to a
//! public key that GM/T 0003.2 requires be prefixed to messages before
//! signing.

use crate::curve::{Point, COEFF_B, GX, GY};
use crate::field::PRIME_P;
use crate::sm3::sm3;

/// The default identifier used when a caller supplies none, as mandated by
/// GM/T 0003.2 for interop with implementations that don't negotiate one.
pub const DEFAULT_ID: &[u8] = b"1234567812345678";

/// Computes `Z = SM3(ENTL || ID || a || b || Gx || Gy || Px || Py)`.
///
/// `ENTL` is the 16-bit big-endian *bit* length of `id`; `a`, `b`, `Gx`,
/// `Gy`, `Px`, `Py` are each encoded as 32-byte big-endian field elements.
pub fn compute_z(id: Option<&[u8]>, public_key: &Point) -> crate::error::Result<[u8; 32]> {
    let id = id.unwrap_or(DEFAULT_ID);
    let entl = ((id.len() as u64) * 8) as u16;

    let mut a = PRIME_P;
    // a = p - 3, computed once here rather than duplicated as a literal.
    let three = {
        let mut t = [0u8; 32];
        t[31] = 3;
        t
    };
    sub_be32(&mut a, &three);

    let (px, py) = public_key.to_affine()?;

    let mut buf = Vec::with_capacity(2 + id.len() + 32 * 6);
    buf.extend_from_slice(&entl.to_be_bytes());
    buf.extend_from_slice(id);
    buf.extend_from_slice(&a);
    buf.extend_from_slice(&COEFF_B);
    buf.extend_from_slice(&GX);
    buf.extend_from_slice(&GY);
    buf.extend_from_slice(&px.to_bytes());
    buf.extend_from_slice(&py.to_bytes());

    Ok(sm3(&buf))
}

/// Subtracts `rhs` from `lhs` in place, both given as 32-byte big-endian
/// integers. Used only to derive `a = p - 3` without a second field-element
/// round trip.
fn sub_be32(lhs: &mut [u8; 32], rhs: &[u8; 32]) {
    let mut borrow: i16 = 0;
    for i in (0..32).rev() {
        let mut diff = lhs[i] as i16 - rhs[i] as i16 - borrow;
        if diff < 0 {
            diff += 256;
            borrow = 1;
        } else {
            borrow = 0;
        }
        lhs[i] = diff as u8;
    }
}
