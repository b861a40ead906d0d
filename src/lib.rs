//! Textbook RSA
//!
//! Key pair generation from two random probable primes, and single-block
//! encryption of text packed into one big integer. There is no padding and
//! no side-channel hardening; this is the schoolbook algorithm, weaknesses
//! included (identical plaintexts give identical ciphertexts).

pub mod config;
pub mod demo;
pub mod error;
pub mod rsa;

pub use config::RsaConfig;
pub use error::{Result, RsaError};
