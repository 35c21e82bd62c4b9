//! Component C: SM3 cryptographic hash (GM/T 0004), a Merkle-Damgard
//! construction over a dedicated 64-round compression function. Block size
//! 64 bytes, digest 32 bytes.

pub mod hkdf;
pub mod hmac;

const BLOCK_SIZE: usize = 64;
const DIGEST_SIZE: usize = 32;

const IV: [u32; 8] = [
    0x7380166f, 0x4914b2b9, 0x172442d7, 0xda8a0600, 0xa96f30bc, 0x163138aa, 0xe38dee4d, 0xb0fb0e4e,
];

const T_LOW: u32 = 0x79cc4519;
const T_HIGH: u32 = 0x7a879d8a;

#[inline]
fn ff(j: usize, x: u32, y: u32, z: u32) -> u32 {
    if j < 16 {
        x ^ y ^ z
    } else {
        (x & y) | (x & z) | (y & z)
    }
}

#[inline]
fn gg(j: usize, x: u32, y: u32, z: u32) -> u32 {
    if j < 16 {
        x ^ y ^ z
    } else {
        (x & y) | (!x & z)
    }
}

#[inline]
fn p0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

#[inline]
fn p1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

#[inline]
fn t(j: usize) -> u32 {
    if j < 16 {
        T_LOW
    } else {
        T_HIGH
    }
}

/// Expands one 64-byte block into the 68-word `W` schedule and the 64-word
/// `W'` schedule used by the compression function.
fn expand(block: &[u8; BLOCK_SIZE]) -> ([u32; 68], [u32; 64]) {
    let mut w = [0u32; 68];
    for i in 0..16 {
        w[i] = u32::from_be_bytes(block[i * 4..i * 4 + 4].try_into().unwrap());
    }
    for j in 16..68 {
        w[j] = p1(w[j - 16] ^ w[j - 9] ^ w[j - 3].rotate_left(15)) ^ w[j - 13].rotate_left(7) ^ w[j - 6];
    }
    let mut w_prime = [0u32; 64];
    for j in 0..64 {
        w_prime[j] = w[j] ^ w[j + 4];
    }
    (w, w_prime)
}

/// Runs the 64-round compression function, folding `block` into `state`.
fn compress(state: &mut [u32; 8], block: &[u8; BLOCK_SIZE]) {
    let (w, w_prime) = expand(block);
    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;

    for j in 0..64 {
        let ss1 = (a.rotate_left(12).wrapping_add(e).wrapping_add(t(j).rotate_left((j % 32) as u32)))
            .rotate_left(7);
        let ss2 = ss1 ^ a.rotate_left(12);
        let tt1 = ff(j, a, b, c).wrapping_add(d).wrapping_add(ss2).wrapping_add(w_prime[j]);
        let tt2 = gg(j, e, f, g).wrapping_add(h).wrapping_add(ss1).wrapping_add(w[j]);
        d = c;
        c = b.rotate_left(9);
        b = a;
        a = tt1;
        h = g;
        g = f.rotate_left(19);
        f = e;
        e = p0(tt2);
    }

    state[0] ^= a;
    state[1] ^= b;
    state[2] ^= c;
    state[3] ^= d;
    state[4] ^= e;
    state[5] ^= f;
    state[6] ^= g;
    state[7] ^= h;
}

/// Streaming SM3 hash state. Mirrors the whole-message `sm3` free function
/// but lets callers feed data incrementally.
#[derive(Clone)]
pub struct Sm3 {
    state: [u32; 8],
    buffer: Vec<u8>,
    len_bits: u64,
}

impl Default for Sm3 {
    fn default() -> Self {
        Self::new()
    }
}

impl Sm3 {
    pub fn new() -> Sm3 {
        Sm3 {
            state: IV,
            buffer: Vec::with_capacity(BLOCK_SIZE),
            len_bits: 0,
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.len_bits = self.len_bits.wrapping_add((data.len() as u64) * 8);
        self.buffer.extend_from_slice(data);
        while self.buffer.len() >= BLOCK_SIZE {
            let block: [u8; BLOCK_SIZE] = self.buffer[..BLOCK_SIZE].try_into().unwrap();
            compress(&mut self.state, &block);
            self.buffer.drain(..BLOCK_SIZE);
        }
    }

    pub fn finalize(mut self) -> [u8; DIGEST_SIZE] {
        let bit_len = self.len_bits;
        self.buffer.push(0x80);
        while self.buffer.len() % BLOCK_SIZE != 56 {
            self.buffer.push(0);
        }
        self.buffer.extend_from_slice(&bit_len.to_be_bytes());
        while self.buffer.len() >= BLOCK_SIZE {
            let block: [u8; BLOCK_SIZE] = self.buffer[..BLOCK_SIZE].try_into().unwrap();
            compress(&mut self.state, &block);
            self.buffer.drain(..BLOCK_SIZE);
        }
        let mut out = [0u8; DIGEST_SIZE];
        for (i, word) in self.state.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&word.to_be_bytes());
        }
        out
    }
}

/// Computes the SM3 digest of `data` in one call.
pub fn sm3(data: &[u8]) -> [u8; DIGEST_SIZE] {
    let mut h = Sm3::new();
    h.update(data);
    h.finalize()
}
