//! SM2 elliptic-curve cryptography (GM/T 0003): keypair generation,
//! digital signatures, public-key encryption, and authenticated key
//! agreement over the `sm2p256v1` curve defined in [`crate::curve`].

pub mod agreement;
pub mod der;
pub mod encrypt;
pub mod kdf;
pub mod keypair;
pub mod sign;
pub mod z;

pub use encrypt::CiphertextLayout;
pub use keypair::{generate_keypair, KeyPair};
pub use sign::Signature;
pub use z::DEFAULT_ID;
