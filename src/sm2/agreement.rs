//! Component I: SM2 two-party authenticated key agreement (GM/T 0003.3,
//! core key-derivation step only — the optional confirmation hashes
//! S1/S2/SA/SB are not computed here; see DESIGN.md).

use super::kdf::kdf;
use crate::curve::Point;
use crate::error::{Error, Result};
use crate::field::{Scalar, U256};

/// `w = ceil(ceil(log2(n)) / 2) - 1` for the SM2 group order, fixed at 127.
const W: u32 = 127;

fn truncate_with_w(x: &[u8; 32]) -> U256 {
    // x̄ = 2^w + (x AND (2^w - 1)); equivalent to keeping the low w bits of
    // x and setting bit w.
    let mut masked = U256::from_be_bytes(x);
    for i in (W as usize)..256 {
        if masked.bit(i) {
            masked = flip_bit(masked, i);
        }
    }
    set_bit(masked, W as usize)
}

fn flip_bit(u: U256, i: usize) -> U256 {
    let mut limbs = u.0;
    limbs[i / 64] ^= 1u64 << (i % 64);
    U256(limbs)
}

fn set_bit(u: U256, i: usize) -> U256 {
    let mut limbs = u.0;
    limbs[i / 64] |= 1u64 << (i % 64);
    U256(limbs)
}

/// One party's inputs to the agreement protocol.
pub struct AgreementInput<'a> {
    pub static_private: &'a Scalar,
    pub static_public: &'a Point,
    pub ephemeral_private: &'a Scalar,
    pub ephemeral_public: &'a Point,
}

/// Computes the shared key `K` for one side of the exchange.
///
/// `own`/`peer` carry each side's static and ephemeral keys; `own_z`/
/// `peer_z` are the Z-values (identifier bindings) of each party. When
/// `is_recipient` is true, `peer_z || own_z` is fed to the KDF instead of
/// `own_z || peer_z` — both parties agree on the same initiator-first
/// ordering this way regardless of which role they play locally.
#[allow(clippy::too_many_arguments)]
pub fn calculate_shared_key(
    own: &AgreementInput,
    peer: &AgreementInput,
    own_z: &[u8; 32],
    peer_z: &[u8; 32],
    klen: usize,
    is_recipient: bool,
) -> Result<Vec<u8>> {
    let n = Scalar::modulus();

    let (own_eph_x, _) = own.ephemeral_public.to_affine()?;
    let x_bar_own = truncate_with_w(&own_eph_x.to_bytes());
    let t_own = {
        let prod = crate::field::mul_mod(&x_bar_own, &own.ephemeral_private.0, &n);
        crate::field::add_mod(&own.static_private.0, &prod, &n)
    };

    let (peer_eph_x, _) = peer.ephemeral_public.to_affine()?;
    let x_bar_peer = truncate_with_w(&peer_eph_x.to_bytes());
    let scaled_peer_eph = peer.ephemeral_public.scalar_mul(&crate::field::Scalar::create(x_bar_peer));
    let u_point = peer.static_public.add(&scaled_peer_eph).scalar_mul(&crate::field::Scalar::create(t_own));

    if u_point.is_identity() {
        log::debug!("sm2 key agreement: U is the point at infinity, aborting");
        return Err(Error::InvalidKey("key agreement produced the point at infinity"));
    }

    let (ux, uy) = u_point.to_affine()?;

    let mut shared = Vec::with_capacity(64 + 64);
    shared.extend_from_slice(&ux.to_bytes());
    shared.extend_from_slice(&uy.to_bytes());
    if is_recipient {
        shared.extend_from_slice(peer_z);
        shared.extend_from_slice(own_z);
    } else {
        shared.extend_from_slice(own_z);
        shared.extend_from_slice(peer_z);
    }

    Ok(kdf(&shared, klen))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sm2::keypair::generate_keypair;
    use crate::sm2::z::compute_z;

    #[test]
    fn both_sides_derive_the_same_key() {
        let a_static = generate_keypair().unwrap();
        let a_eph = generate_keypair().unwrap();
        let b_static = generate_keypair().unwrap();
        let b_eph = generate_keypair().unwrap();

        let za = compute_z(None, &a_static.public_key).unwrap();
        let zb = compute_z(None, &b_static.public_key).unwrap();

        let a_input = AgreementInput {
            static_private: &a_static.private_key,
            static_public: &a_static.public_key,
            ephemeral_private: &a_eph.private_key,
            ephemeral_public: &a_eph.public_key,
        };
        let b_input = AgreementInput {
            static_private: &b_static.private_key,
            static_public: &b_static.public_key,
            ephemeral_private: &b_eph.private_key,
            ephemeral_public: &b_eph.public_key,
        };

        let b_as_peer_for_a = AgreementInput {
            static_private: &b_static.private_key,
            static_public: &b_static.public_key,
            ephemeral_private: &b_eph.private_key,
            ephemeral_public: &b_eph.public_key,
        };
        let a_as_peer_for_b = AgreementInput {
            static_private: &a_static.private_key,
            static_public: &a_static.public_key,
            ephemeral_private: &a_eph.private_key,
            ephemeral_public: &a_eph.public_key,
        };

        let k_a = calculate_shared_key(&a_input, &b_as_peer_for_a, &za, &zb, 16, false).unwrap();
        let k_b = calculate_shared_key(&b_input, &a_as_peer_for_b, &zb, &za, 16, true).unwrap();
        assert_eq!(k_a, k_b);
    }
}
