//! Component F: the SM2 key derivation function (GM/T 0003.4), a
//! counter-mode construction over SM3.

use crate::sm3::sm3;
use byteorder::{BigEndian, WriteBytesExt};

/// Derives `klen` bytes from shared-secret octets `z`.
///
/// `t = ceil(klen / 32)` blocks `H_i = SM3(z || ct(i))` are concatenated and
/// truncated to `klen`, where `ct(i)` is a 4-byte big-endian counter
/// starting at 1. An all-zero output (vanishingly unlikely, but possible)
/// must be treated as failure by the caller — this function does not
/// retry on the caller's behalf since retrying here would hide the
/// exhausted-entropy case that should instead trigger a fresh ephemeral
/// key draw upstream.
pub fn kdf(z: &[u8], klen: usize) -> Vec<u8> {
    if klen == 0 {
        return Vec::new();
    }
    let blocks = klen.div_ceil(32);
    let mut out = Vec::with_capacity(blocks * 32);
    for i in 1..=blocks as u32 {
        let mut input = Vec::with_capacity(z.len() + 4);
        input.extend_from_slice(z);
        input.write_u32::<BigEndian>(i).expect("writing to a Vec<u8> cannot fail");
        out.extend_from_slice(&sm3(&input));
    }
    out.truncate(klen);
    out
}
