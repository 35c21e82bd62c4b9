//! ECB and CBC modes of operation for SM4, with PKCS#7 or no padding.

use super::{Sm4Key, BLOCK_SIZE};
use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Ecb,
    Cbc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Padding {
    Pkcs7,
    None,
}

/// Parameters controlling an SM4 encrypt/decrypt call.
#[derive(Clone, Debug)]
pub struct Sm4Params<'a> {
    pub mode: Mode,
    pub iv: Option<&'a [u8; BLOCK_SIZE]>,
    pub padding: Padding,
}

fn pkcs7_pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_SIZE - (data.len() % BLOCK_SIZE);
    let mut out = Vec::with_capacity(data.len() + pad_len);
    out.extend_from_slice(data);
    out.extend(std::iter::repeat(pad_len as u8).take(pad_len));
    out
}

fn pkcs7_unpad(data: &[u8]) -> Result<Vec<u8>> {
    let pad_len = *data.last().ok_or(Error::InvalidPadding)? as usize;
    if pad_len == 0 || pad_len > BLOCK_SIZE || pad_len > data.len() {
        return Err(Error::InvalidPadding);
    }
    let (body, pad) = data.split_at(data.len() - pad_len);
    if pad.iter().any(|&b| b as usize != pad_len) {
        return Err(Error::InvalidPadding);
    }
    Ok(body.to_vec())
}

/// Encrypts `plaintext` under `key` with the given mode/IV/padding.
pub fn sm4_encrypt(plaintext: &[u8], key: &[u8], params: &Sm4Params) -> Result<Vec<u8>> {
    let sched = Sm4Key::new(key)?;

    let padded = match params.padding {
        Padding::Pkcs7 => pkcs7_pad(plaintext),
        Padding::None => {
            if plaintext.len() % BLOCK_SIZE != 0 {
                return Err(Error::InvalidPadding);
            }
            plaintext.to_vec()
        }
    };

    let mut out = Vec::with_capacity(padded.len());
    match params.mode {
        Mode::Ecb => {
            for chunk in padded.chunks(BLOCK_SIZE) {
                let block: [u8; BLOCK_SIZE] = chunk.try_into().unwrap();
                out.extend_from_slice(&sched.encrypt_block(&block));
            }
        }
        Mode::Cbc => {
            let iv = params.iv.ok_or(Error::InvalidEncoding("CBC mode requires an IV"))?;
            let mut prev = *iv;
            for chunk in padded.chunks(BLOCK_SIZE) {
                let mut block: [u8; BLOCK_SIZE] = chunk.try_into().unwrap();
                for i in 0..BLOCK_SIZE {
                    block[i] ^= prev[i];
                }
                let ct = sched.encrypt_block(&block);
                out.extend_from_slice(&ct);
                prev = ct;
            }
        }
    }
    Ok(out)
}

/// Decrypts `ciphertext` under `key` with the given mode/IV/padding.
pub fn sm4_decrypt(ciphertext: &[u8], key: &[u8], params: &Sm4Params) -> Result<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(Error::InvalidEncoding("ciphertext must be a nonzero multiple of the block size"));
    }
    let sched = Sm4Key::new(key)?;

    let mut out = Vec::with_capacity(ciphertext.len());
    match params.mode {
        Mode::Ecb => {
            for chunk in ciphertext.chunks(BLOCK_SIZE) {
                let block: [u8; BLOCK_SIZE] = chunk.try_into().unwrap();
                out.extend_from_slice(&sched.decrypt_block(&block));
            }
        }
        Mode::Cbc => {
            let iv = params.iv.ok_or(Error::InvalidEncoding("CBC mode requires an IV"))?;
            let mut prev = *iv;
            for chunk in ciphertext.chunks(BLOCK_SIZE) {
                let block: [u8; BLOCK_SIZE] = chunk.try_into().unwrap();
                let mut pt = sched.decrypt_block(&block);
                for i in 0..BLOCK_SIZE {
                    pt[i] ^= prev[i];
                }
                out.extend_from_slice(&pt);
                prev = block;
            }
        }
    }

    match params.padding {
        Padding::Pkcs7 => pkcs7_unpad(&out),
        Padding::None => Ok(out),
    }
}
