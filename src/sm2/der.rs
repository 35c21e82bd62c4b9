//! Minimal ASN.1 DER encode/decode for the `SEQUENCE { r INTEGER, s INTEGER
//! }` wrapper an SM2 signature can optionally be carried in. This is the
//! one ASN.1 envelope this crate implements — everything else about DER is
//! explicitly out of scope (see spec).

use crate::error::{Error, Result};

fn encode_integer(bytes: &[u8; 32]) -> Vec<u8> {
    // Strip leading zero bytes, but keep at least one.
    let mut start = 0;
    while start < 31 && bytes[start] == 0 {
        start += 1;
    }
    let mut body = bytes[start..].to_vec();
    // Two's-complement-safe prefixing: if the high bit of the magnitude is
    // set, prepend a 0x00 so the value isn't misread as negative.
    if body[0] & 0x80 != 0 {
        body.insert(0, 0x00);
    }
    let mut out = vec![0x02, body.len() as u8];
    out.extend_from_slice(&body);
    out
}

fn decode_integer(der: &[u8]) -> Result<([u8; 32], usize)> {
    if der.len() < 2 || der[0] != 0x02 {
        return Err(Error::InvalidEncoding("expected a DER INTEGER"));
    }
    let len = der[1] as usize;
    if der.len() < 2 + len {
        return Err(Error::InvalidEncoding("truncated DER INTEGER"));
    }
    let mut body = &der[2..2 + len];
    if body.len() > 1 && body[0] == 0 {
        body = &body[1..];
    }
    if body.len() > 32 {
        return Err(Error::InvalidEncoding("DER INTEGER does not fit in 256 bits"));
    }
    let mut out = [0u8; 32];
    out[32 - body.len()..].copy_from_slice(body);
    Ok((out, 2 + len))
}

/// Encodes `(r, s)` as `SEQUENCE { INTEGER r, INTEGER s }`.
pub fn encode_der_signature(r: &[u8; 32], s: &[u8; 32]) -> Vec<u8> {
    let mut body = encode_integer(r);
    body.extend_from_slice(&encode_integer(s));
    let mut out = Vec::with_capacity(2 + body.len());
    out.push(0x30);
    if body.len() < 128 {
        out.push(body.len() as u8);
    } else {
        // Signature integers are at most 33 bytes each, so the sequence
        // body never actually reaches the long-form length threshold in
        // practice; the branch exists for completeness.
        out.push(0x81);
        out.push(body.len() as u8);
    }
    out.extend_from_slice(&body);
    out
}

/// Decodes `SEQUENCE { INTEGER r, INTEGER s }` back to `(r, s)`.
pub fn decode_der_signature(der: &[u8]) -> Result<([u8; 32], [u8; 32])> {
    if der.len() < 2 || der[0] != 0x30 {
        return Err(Error::InvalidEncoding("expected a DER SEQUENCE"));
    }
    let (len, header_len) = if der[1] & 0x80 == 0 {
        (der[1] as usize, 2)
    } else {
        let n = (der[1] & 0x7f) as usize;
        if n != 1 || der.len() < 3 {
            return Err(Error::InvalidEncoding("unsupported DER length encoding"));
        }
        (der[2] as usize, 3)
    };
    let body = &der[header_len..];
    if body.len() < len {
        return Err(Error::InvalidEncoding("truncated DER SEQUENCE"));
    }
    let (r, consumed) = decode_integer(body)?;
    let (s, _) = decode_integer(&body[consumed..])?;
    Ok((r, s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_ordinary_values() {
        let mut r = [0u8; 32];
        r[31] = 0x7f;
        let mut s = [0u8; 32];
        s[0] = 0x01;
        let der = encode_der_signature(&r, &s);
        let (r2, s2) = decode_der_signature(&der).unwrap();
        assert_eq!(r, r2);
        assert_eq!(s, s2);
    }

    #[test]
    fn high_bit_gets_zero_prefix() {
        let mut r = [0xffu8; 32];
        r[0] = 0xff; // high bit set
        let s = [0x01u8; 32];
        let der = encode_der_signature(&r, &s);
        // INTEGER tag, then length byte that accounts for the 0x00 prefix.
        assert_eq!(der[2], 0x02);
        let int_len = der[3] as usize;
        assert_eq!(int_len, 33);
        assert_eq!(der[4], 0x00);
        let (r2, s2) = decode_der_signature(&der).unwrap();
        assert_eq!(r, r2);
        assert_eq!(s, s2);
    }
}
