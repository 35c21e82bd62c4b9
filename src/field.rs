//! Component B: 256-bit modular arithmetic over the two moduli the SM2 curve
//! needs — the prime field modulus `p` and the group order `n`. Field
//! elements and scalars are thin, type-distinct wrappers (`FieldElement`,
//! `Scalar`) around a shared fixed-width unsigned-integer core (`U256`) so
//! that the compiler, not the caller, keeps `Fp` and `Fn` values from being
//! mixed up.
//!
//! The arithmetic here avoids pulling in a general-purpose big-integer
//! crate: SM2's modulus isn't one of the curves covered by the formally
//! verified field-arithmetic generators the wider ecosystem uses (see
//! DESIGN.md), so the four limbs are walked by hand the way the rest of the
//! elliptic-curve crate ecosystem does for bespoke curves.

use crate::error::{Error, Result};

/// A 256-bit unsigned integer stored as four 64-bit limbs, least-significant
/// limb first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct U256(pub [u64; 4]);

impl U256 {
    pub const ZERO: U256 = U256([0, 0, 0, 0]);
    pub const ONE: U256 = U256([1, 0, 0, 0]);

    pub fn from_be_bytes(b: &[u8; 32]) -> U256 {
        let mut limbs = [0u64; 4];
        for i in 0..4 {
            let chunk: [u8; 8] = b[i * 8..i * 8 + 8].try_into().unwrap();
            limbs[3 - i] = u64::from_be_bytes(chunk);
        }
        U256(limbs)
    }

    pub fn to_be_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for i in 0..4 {
            out[i * 8..i * 8 + 8].copy_from_slice(&self.0[3 - i].to_be_bytes());
        }
        out
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&l| l == 0)
    }

    pub fn is_odd(&self) -> bool {
        self.0[0] & 1 == 1
    }

    /// Returns bit `i` (0 = least significant, 255 = most significant).
    pub fn bit(&self, i: usize) -> bool {
        let limb = i / 64;
        let off = i % 64;
        (self.0[limb] >> off) & 1 == 1
    }

    /// Logical right shift by one bit.
    pub fn shr1(&self) -> U256 {
        let mut r = [0u64; 4];
        let mut carry = 0u64;
        for i in (0..4).rev() {
            r[i] = (self.0[i] >> 1) | (carry << 63);
            carry = self.0[i] & 1;
        }
        U256(r)
    }

    /// Adds with carry-out, ignoring overflow beyond 256 bits in the
    /// returned value but reporting it via the bool.
    pub fn add_carry(&self, other: &U256) -> (U256, bool) {
        let mut r = [0u64; 4];
        let mut carry = false;
        for i in 0..4 {
            let (v1, c1) = self.0[i].overflowing_add(other.0[i]);
            let (v2, c2) = v1.overflowing_add(carry as u64);
            r[i] = v2;
            carry = c1 || c2;
        }
        (U256(r), carry)
    }

    /// Subtracts with borrow-out.
    pub fn sub_borrow(&self, other: &U256) -> (U256, bool) {
        let mut r = [0u64; 4];
        let mut borrow = false;
        for i in 0..4 {
            let (v1, b1) = self.0[i].overflowing_sub(other.0[i]);
            let (v2, b2) = v1.overflowing_sub(borrow as u64);
            r[i] = v2;
            borrow = b1 || b2;
        }
        (U256(r), borrow)
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        for i in (0..4).rev() {
            let ord = self.0[i].cmp(&other.0[i]);
            if ord != core::cmp::Ordering::Equal {
                return ord;
            }
        }
        core::cmp::Ordering::Equal
    }
}

/// `a + b mod m`, where `a, b < m`.
pub fn add_mod(a: &U256, b: &U256, m: &U256) -> U256 {
    let (sum, carry) = a.add_carry(b);
    if carry || &sum >= m {
        sum.sub_borrow(m).0
    } else {
        sum
    }
}

/// `a - b mod m`, where `a, b < m`.
pub fn sub_mod(a: &U256, b: &U256, m: &U256) -> U256 {
    let (diff, borrow) = a.sub_borrow(b);
    if borrow {
        diff.add_carry(m).0
    } else {
        diff
    }
}

/// `-a mod m`.
pub fn neg_mod(a: &U256, m: &U256) -> U256 {
    if a.is_zero() {
        U256::ZERO
    } else {
        sub_mod(m, a, m)
    }
}

/// `a * b mod m` via double-and-add (shift-and-add) over `b`'s bits,
/// most-significant first. Every iteration performs the same sequence of
/// operations regardless of the bit value being processed is *not*
/// guaranteed here — the conditional add below is a data-dependent branch.
/// Closing that gap is explicitly a non-goal (see DESIGN.md / spec §9); the
/// loop always walks all 256 bits rather than exiting early on a zero
/// scalar.
pub fn mul_mod(a: &U256, b: &U256, m: &U256) -> U256 {
    let mut result = U256::ZERO;
    for i in (0..256).rev() {
        result = add_mod(&result, &result, m);
        if b.bit(i) {
            result = add_mod(&result, a, m);
        }
    }
    result
}

/// `a^2 mod m`.
pub fn sqr_mod(a: &U256, m: &U256) -> U256 {
    mul_mod(a, a, m)
}

/// `a^e mod m` via square-and-multiply, `e` scanned most-significant bit
/// first.
pub fn pow_mod(a: &U256, e: &U256, m: &U256) -> U256 {
    let mut result = U256::ONE;
    for i in (0..256).rev() {
        result = sqr_mod(&result, m);
        if e.bit(i) {
            result = mul_mod(&result, a, m);
        }
    }
    result
}

/// Modular inverse via the binary extended Euclidean algorithm (Stein's
/// algorithm, extended form). Requires `m` odd, which both SM2 moduli are.
/// Fails with `InvalidField` on `inv(0)`.
pub fn inv_mod(a: &U256, m: &U256) -> Result<U256> {
    if a.is_zero() {
        return Err(Error::InvalidField("cannot invert zero"));
    }
    let mut u = *a;
    let mut v = *m;
    let mut x1 = U256::ONE;
    let mut x2 = U256::ZERO;

    while u != U256::ONE && v != U256::ONE {
        while !u.is_odd() {
            u = u.shr1();
            x1 = if x1.is_odd() {
                x1.add_carry(m).0.shr1()
            } else {
                x1.shr1()
            };
        }
        while !v.is_odd() {
            v = v.shr1();
            x2 = if x2.is_odd() {
                x2.add_carry(m).0.shr1()
            } else {
                x2.shr1()
            };
        }
        if u >= v {
            u = u.sub_borrow(&v).0;
            x1 = sub_mod(&x1, &x2, m);
        } else {
            v = v.sub_borrow(&u).0;
            x2 = sub_mod(&x2, &x1, m);
        }
    }
    Ok(if u == U256::ONE { x1 } else { x2 })
}

/// Batch inversion: given `[a1, ..., ak]`, all nonzero mod `m`, computes
/// their inverses with a single call to `inv_mod` by folding prefix
/// products forward then unwinding.
pub fn batch_inv_mod(values: &[U256], m: &U256) -> Result<Vec<U256>> {
    if values.is_empty() {
        return Ok(Vec::new());
    }
    let mut prefix = Vec::with_capacity(values.len());
    let mut acc = U256::ONE;
    for v in values {
        acc = mul_mod(&acc, v, m);
        prefix.push(acc);
    }
    let mut inv_acc = inv_mod(&acc, m)?;
    let mut out = vec![U256::ZERO; values.len()];
    for i in (0..values.len()).rev() {
        let prev = if i == 0 { U256::ONE } else { prefix[i - 1] };
        out[i] = mul_mod(&inv_acc, &prev, m);
        inv_acc = mul_mod(&inv_acc, &values[i], m);
    }
    Ok(out)
}

/// Modular square root for a prime `m` with `m ≡ 3 (mod 4)`, using the
/// `x = a^((m+1)/4) mod m` shortcut, verified by squaring. Both SM2 moduli
/// of interest here (`p`) satisfy this congruence.
pub fn sqrt_mod(a: &U256, m: &U256) -> Result<U256> {
    // (m + 1) / 4, computed as (m + 1) >> 2 since m + 1 is divisible by 4
    // whenever m ≡ 3 (mod 4).
    let (m_plus_1, _) = m.add_carry(&U256::ONE);
    let exp = m_plus_1.shr1().shr1();
    let candidate = pow_mod(a, &exp, m);
    if sqr_mod(&candidate, m) == reduce(a, m) {
        Ok(candidate)
    } else {
        Err(Error::InvalidField("value is not a quadratic residue"))
    }
}

/// Reduces `a` into `[0, m)`. Inputs to this module are always already
/// reduced, but this is used once at construction time (`create`).
pub fn reduce(a: &U256, m: &U256) -> U256 {
    let mut r = *a;
    while &r >= m {
        r = r.sub_borrow(m).0;
    }
    r
}

macro_rules! define_field {
    ($name:ident, $modulus:expr) => {
        /// A value in `[0, modulus)`.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
        pub struct $name(pub(crate) U256);

        impl $name {
            /// The modulus this type's values are reduced against.
            pub fn modulus() -> U256 {
                $modulus
            }

            /// Reduces `x` modulo the field's modulus.
            pub fn create(x: U256) -> $name {
                $name(reduce(&x, &$modulus))
            }

            pub fn from_be_bytes(b: &[u8; 32]) -> $name {
                $name::create(U256::from_be_bytes(b))
            }

            pub fn to_bytes(&self) -> [u8; 32] {
                self.0.to_be_bytes()
            }

            pub fn zero() -> $name {
                $name(U256::ZERO)
            }

            pub fn one() -> $name {
                $name(U256::ONE)
            }

            pub fn is_zero(&self) -> bool {
                self.0.is_zero()
            }

            pub fn is_odd(&self) -> bool {
                self.0.is_odd()
            }

            pub fn equals(&self, other: &$name) -> bool {
                self.0 == other.0
            }

            pub fn add(&self, other: &$name) -> $name {
                $name(add_mod(&self.0, &other.0, &$modulus))
            }

            pub fn sub(&self, other: &$name) -> $name {
                $name(sub_mod(&self.0, &other.0, &$modulus))
            }

            pub fn neg(&self) -> $name {
                $name(neg_mod(&self.0, &$modulus))
            }

            pub fn mul(&self, other: &$name) -> $name {
                $name(mul_mod(&self.0, &other.0, &$modulus))
            }

            pub fn sqr(&self) -> $name {
                $name(sqr_mod(&self.0, &$modulus))
            }

            pub fn pow(&self, e: &U256) -> $name {
                $name(pow_mod(&self.0, e, &$modulus))
            }

            pub fn inv(&self) -> Result<$name> {
                inv_mod(&self.0, &$modulus).map($name)
            }

            pub fn sqrt(&self) -> Result<$name> {
                sqrt_mod(&self.0, &$modulus).map($name)
            }
        }
    };
}

/// Big-endian byte encoding of the SM2 prime field modulus
/// `p = FFFFFFFE FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFF 00000000 FFFFFFFF FFFFFFFF`.
pub const PRIME_P: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];

/// Big-endian byte encoding of the SM2 group order
/// `n = FFFFFFFE FFFFFFFF FFFFFFFF FFFFFFFF 7203DF6B 21C6052B 53BBF409 39D54123`.
pub const ORDER_N: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x72, 0x03, 0xDF, 0x6B, 0x21, 0xC6, 0x05, 0x2B, 0x53, 0xBB, 0xF4, 0x09, 0x39, 0xD5, 0x41, 0x23,
];

fn modulus_p() -> U256 {
    U256::from_be_bytes(&PRIME_P)
}

fn modulus_n() -> U256 {
    U256::from_be_bytes(&ORDER_N)
}

define_field!(FieldElement, modulus_p());
define_field!(Scalar, modulus_n());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_bytes() {
        let b = PRIME_P;
        let u = U256::from_be_bytes(&b);
        assert_eq!(u.to_be_bytes(), b);
    }

    #[test]
    fn add_sub_inverse() {
        let m = modulus_p();
        let a = U256([1, 0, 0, 0]);
        let b = U256([42, 0, 0, 0]);
        let s = add_mod(&a, &b, &m);
        let back = sub_mod(&s, &b, &m);
        assert_eq!(back, a);
    }

    #[test]
    fn inversion_round_trips() {
        let m = modulus_n();
        let a = U256([123456789, 0, 0, 0]);
        let inv = inv_mod(&a, &m).unwrap();
        let prod = mul_mod(&a, &inv, &m);
        assert_eq!(prod, U256::ONE);
    }

    #[test]
    fn inversion_of_zero_fails() {
        let m = modulus_p();
        assert!(inv_mod(&U256::ZERO, &m).is_err());
    }

    #[test]
    fn sqrt_of_square_recovers_root() {
        let m = modulus_p();
        let a = U256([9, 0, 0, 0]);
        let a2 = sqr_mod(&a, &m);
        let root = sqrt_mod(&a2, &m).unwrap();
        let root_sq = sqr_mod(&root, &m);
        assert_eq!(root_sq, a2);
    }

    #[test]
    fn batch_inversion_matches_individual() {
        let m = modulus_p();
        let values = vec![U256([2, 0, 0, 0]), U256([3, 0, 0, 0]), U256([5, 0, 0, 0])];
        let batch = batch_inv_mod(&values, &m).unwrap();
        for (v, inv) in values.iter().zip(batch.iter()) {
            assert_eq!(mul_mod(v, inv, &m), U256::ONE);
        }
    }

    #[test]
    fn field_element_reduces_modulus_to_zero() {
        let e = FieldElement::from_be_bytes(&PRIME_P);
        assert!(e.is_zero());
        let s = Scalar::from_be_bytes(&[0u8; 32]);
        assert!(s.is_zero());
    }
}
