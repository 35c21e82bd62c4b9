//! Component A: byte and integer utilities shared across every other module.

pub mod bytes;

pub use bytes::*;
