use thiserror::Error;

/// Failure modes surfaced by this crate.
///
/// Cryptographic checks that merely signal forgery (signature verification,
/// ciphertext tag comparison) never land here — those report through a
/// boolean or `Option`-shaped result so a caller can't conflate "the
/// adversary tampered with this" with "you called the API wrong". Everything
/// else — malformed input, precondition violations, insufficient entropy —
/// is a hard failure.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("invalid encoding: {0}")]
    InvalidEncoding(&'static str),

    #[error("invalid key: {0}")]
    InvalidKey(&'static str),

    #[error("invalid field operation: {0}")]
    InvalidField(&'static str),

    #[error("invalid padding")]
    InvalidPadding,

    #[error("invalid ciphertext")]
    InvalidCiphertext,

    #[error("csprng failed to provide requested entropy")]
    RngFailure,
}

pub type Result<T> = core::result::Result<T, Error>;
