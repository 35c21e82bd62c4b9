//! Component H.1: SM2 keypair generation.

use crate::curve::Point;
use crate::error::{Error, Result};
use crate::field::{Scalar, U256};
use rand::rngs::OsRng;
use rand::RngCore;

/// An SM2 private/public keypair. `public_key = private_key * G`.
#[derive(Clone, Copy, Debug)]
pub struct KeyPair {
    pub private_key: Scalar,
    pub public_key: Point,
}

/// Draws a private key `d` uniformly from `[1, n-1]` using the system CSPRNG
/// and derives the matching public point.
pub fn generate_keypair() -> Result<KeyPair> {
    let n = Scalar::modulus();
    let n_minus_1 = n.sub_borrow(&U256::ONE).0;

    let d = loop {
        let mut raw = [0u8; 32];
        OsRng.try_fill_bytes(&mut raw).map_err(|_| Error::RngFailure)?;
        let reduced = crate::field::reduce(&U256::from_be_bytes(&raw), &n_minus_1);
        let (candidate, _) = reduced.add_carry(&U256::ONE);
        if !candidate.is_zero() {
            break Scalar::create(candidate);
        }
    };

    let public_key = Point::generator().scalar_mul(&d);
    Ok(KeyPair { private_key: d, public_key })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_public_key_is_on_curve() {
        let kp = generate_keypair().unwrap();
        assert!(kp.public_key.is_on_curve().unwrap());
    }

    #[test]
    fn successive_keypairs_differ() {
        let a = generate_keypair().unwrap();
        let b = generate_keypair().unwrap();
        assert!(!a.private_key.equals(&b.private_key));
    }
}
