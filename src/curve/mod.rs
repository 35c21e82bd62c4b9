//! Component E: point arithmetic on the GM/T 0003.5 recommended curve
//! (`sm2p256v1`), a short Weierstrass curve `y^2 = x^3 + ax + b` over `Fp`
//! with `a = p - 3`.
//!
//! Points are held in Jacobian projective coordinates `(X, Y, Z)` with
//! affine reconstruction `x = X/Z^2`, `y = Y/Z^3`, so that chained group
//! operations (as in scalar multiplication) don't pay for a field inversion
//! at every step — only the final affine conversion inverts.

use crate::error::{Error, Result};
use crate::field::{FieldElement, Scalar, U256};

/// Big-endian encoding of the curve coefficient `b`.
pub const COEFF_B: [u8; 32] = [
    0x28, 0xE9, 0xFA, 0x9E, 0x9D, 0x9F, 0x5E, 0x34, 0x4D, 0x5A, 0x9E, 0x4B, 0xCF, 0x65, 0x09, 0xA7,
    0xF3, 0x97, 0x89, 0xF5, 0x15, 0xAB, 0x8F, 0x92, 0xDD, 0xBC, 0xBD, 0x41, 0x4D, 0x94, 0x0E, 0x93,
];

/// Big-endian encoding of the base point's X coordinate.
pub const GX: [u8; 32] = [
    0x32, 0xC4, 0xAE, 0x2C, 0x1F, 0x19, 0x81, 0x19, 0x5F, 0x99, 0x04, 0x46, 0x6A, 0x39, 0xC9, 0x94,
    0x8F, 0xE3, 0x0B, 0xBF, 0xF2, 0x66, 0x0B, 0xE1, 0x71, 0x5A, 0x45, 0x89, 0x33, 0x4C, 0x74, 0xC7,
];

/// Big-endian encoding of the base point's Y coordinate.
pub const GY: [u8; 32] = [
    0xBC, 0x37, 0x36, 0xA2, 0xF4, 0xF6, 0x77, 0x9C, 0x59, 0xBD, 0xCE, 0xE3, 0x6B, 0x69, 0x21, 0x53,
    0xD0, 0xA9, 0x87, 0x7C, 0xC6, 0x2A, 0x47, 0x40, 0x02, 0xDF, 0x32, 0xE5, 0x21, 0x39, 0xF0, 0xA0,
];

fn three_as_field() -> FieldElement {
    FieldElement::from_be_bytes(&{
        let mut b = [0u8; 32];
        b[31] = 3;
        b
    })
}

fn coeff_b() -> FieldElement {
    FieldElement::from_be_bytes(&COEFF_B)
}

/// A point on the curve, in Jacobian projective coordinates. The point at
/// infinity is represented by `Z == 0`.
#[derive(Clone, Copy, Debug)]
pub struct Point {
    pub x: FieldElement,
    pub y: FieldElement,
    pub z: FieldElement,
}

impl Point {
    pub fn identity() -> Point {
        Point {
            x: FieldElement::one(),
            y: FieldElement::one(),
            z: FieldElement::zero(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.z.is_zero()
    }

    pub fn generator() -> Point {
        Point {
            x: FieldElement::from_be_bytes(&GX),
            y: FieldElement::from_be_bytes(&GY),
            z: FieldElement::one(),
        }
    }

    pub fn from_affine(x: FieldElement, y: FieldElement) -> Point {
        Point {
            x,
            y,
            z: FieldElement::one(),
        }
    }

    /// Recovers affine `(x, y)`. Fails on the point at infinity.
    pub fn to_affine(&self) -> Result<(FieldElement, FieldElement)> {
        if self.is_identity() {
            return Err(Error::InvalidKey("point at infinity has no affine representation"));
        }
        let z_inv = self.z.inv()?;
        let z_inv2 = z_inv.sqr();
        let z_inv3 = z_inv2.mul(&z_inv);
        Ok((self.x.mul(&z_inv2), self.y.mul(&z_inv3)))
    }

    /// Checks `y^2 == x^3 + ax + b` for the point's affine coordinates.
    pub fn is_on_curve(&self) -> Result<bool> {
        let (x, y) = self.to_affine()?;
        let lhs = y.sqr();
        let rhs = x.sqr().mul(&x).add(&curve_a().mul(&x)).add(&coeff_b());
        Ok(lhs.equals(&rhs))
    }

    pub fn negate(&self) -> Point {
        Point {
            x: self.x,
            y: self.y.neg(),
            z: self.z,
        }
    }

    /// Point doubling, specialized for `a = -3` (the "dbl-2001-b" formula).
    pub fn double(&self) -> Point {
        if self.is_identity() || self.y.is_zero() {
            return Point::identity();
        }
        let delta = self.z.sqr();
        let gamma = self.y.sqr();
        let beta = self.x.mul(&gamma);
        let x_minus_delta = self.x.sub(&delta);
        let x_plus_delta = self.x.add(&delta);
        let alpha = three_field().mul(&x_minus_delta).mul(&x_plus_delta);

        let eight_beta = beta.add(&beta).add(&beta).add(&beta).add(&beta).add(&beta).add(&beta).add(&beta);
        let x3 = alpha.sqr().sub(&eight_beta);

        let y_plus_z = self.y.add(&self.z);
        let z3 = y_plus_z.sqr().sub(&gamma).sub(&delta);

        let four_beta = beta.add(&beta).add(&beta).add(&beta);
        let gamma_sqr = gamma.sqr();
        let eight_gamma_sqr = gamma_sqr.add(&gamma_sqr).add(&gamma_sqr).add(&gamma_sqr).add(&gamma_sqr).add(&gamma_sqr).add(&gamma_sqr).add(&gamma_sqr);
        let y3 = alpha.mul(&four_beta.sub(&x3)).sub(&eight_gamma_sqr);

        Point { x: x3, y: y3, z: z3 }
    }

    /// General Jacobian point addition (add-2007-bl). Falls back to
    /// doubling or the identity when the operands coincide or are inverses.
    pub fn add(&self, other: &Point) -> Point {
        if self.is_identity() {
            return *other;
        }
        if other.is_identity() {
            return *self;
        }
        let z1z1 = self.z.sqr();
        let z2z2 = other.z.sqr();
        let u1 = self.x.mul(&z2z2);
        let u2 = other.x.mul(&z1z1);
        let s1 = self.y.mul(&other.z).mul(&z2z2);
        let s2 = other.y.mul(&self.z).mul(&z1z1);

        let h = u2.sub(&u1);
        let r = s2.sub(&s1);

        if h.is_zero() {
            return if r.is_zero() {
                self.double()
            } else {
                Point::identity()
            };
        }

        let hh = h.sqr();
        let hhh = h.mul(&hh);
        let v = u1.mul(&hh);

        let x3 = r.sqr().sub(&hhh).sub(&v).sub(&v);
        let y3 = r.mul(&v.sub(&x3)).sub(&s1.mul(&hhh));
        let z3 = self.z.mul(&other.z).mul(&h);

        Point { x: x3, y: y3, z: z3 }
    }

    /// Scalar multiplication via a left-to-right binary ladder that walks
    /// all 256 bits of `k` regardless of their value — per spec, the
    /// implementation must not early-exit on zero bits in a way that leaks
    /// timing. This does not make the ladder fully constant-time (the
    /// conditional `add` below still branches on secret data); closing that
    /// gap is an explicit non-goal.
    pub fn scalar_mul(&self, k: &Scalar) -> Point {
        let mut acc = Point::identity();
        for i in (0..256).rev() {
            acc = acc.double();
            if k.0.bit(i) {
                acc = acc.add(self);
            }
        }
        acc
    }

    /// Serializes to the uncompressed SEC1 form `0x04 || X || Y`.
    pub fn to_uncompressed(&self) -> Result<[u8; 65]> {
        let (x, y) = self.to_affine()?;
        let mut out = [0u8; 65];
        out[0] = 0x04;
        out[1..33].copy_from_slice(&x.to_bytes());
        out[33..65].copy_from_slice(&y.to_bytes());
        Ok(out)
    }

    /// Serializes to the compressed SEC1 form `0x02/0x03 || X`.
    pub fn to_compressed(&self) -> Result<[u8; 33]> {
        let (x, y) = self.to_affine()?;
        let mut out = [0u8; 33];
        out[0] = if y.is_odd() { 0x03 } else { 0x02 };
        out[1..33].copy_from_slice(&x.to_bytes());
        Ok(out)
    }

    /// Parses a point from its uncompressed or compressed wire encoding.
    /// Rejects the point at infinity and any point failing the curve
    /// equation.
    pub fn from_bytes(b: &[u8]) -> Result<Point> {
        match b.first() {
            Some(0x04) => {
                if b.len() != 65 {
                    return Err(Error::InvalidEncoding("uncompressed point must be 65 bytes"));
                }
                let x = FieldElement::from_be_bytes(&b[1..33].try_into().unwrap());
                let y = FieldElement::from_be_bytes(&b[33..65].try_into().unwrap());
                let p = Point::from_affine(x, y);
                if !p.is_on_curve()? {
                    return Err(Error::InvalidKey("point is not on the curve"));
                }
                Ok(p)
            }
            Some(prefix @ (0x02 | 0x03)) => {
                if b.len() != 33 {
                    return Err(Error::InvalidEncoding("compressed point must be 33 bytes"));
                }
                let x = FieldElement::from_be_bytes(&b[1..33].try_into().unwrap());
                let rhs = x.sqr().mul(&x).add(&curve_a().mul(&x)).add(&coeff_b());
                let mut y = rhs.sqrt().map_err(|_| Error::InvalidEncoding("x has no corresponding y on the curve"))?;
                let want_odd = *prefix == 0x03;
                if y.is_odd() != want_odd {
                    y = y.neg();
                }
                Ok(Point::from_affine(x, y))
            }
            Some(_) => Err(Error::InvalidEncoding("unrecognized point encoding prefix")),
            None => Err(Error::InvalidEncoding("empty point encoding")),
        }
    }
}

fn three_field() -> FieldElement {
    three_as_field()
}

/// Curve coefficient `a = p - 3`.
pub fn curve_a() -> FieldElement {
    FieldElement::zero().sub(&three_as_field())
}
