//! RSA key material for token signing and verification.
//!
//! Key pairs are generated out-of-band (see [`keygen`] and the
//! `generate_keys` binary), loaded once at process start from a configured
//! [`KeyMaterialSource`] into an immutable [`KeyStore`], and never mutated
//! during the process lifetime.

mod key_source;
mod key_store;
pub mod keygen;

pub use key_source::KeyMaterialSource;
pub use key_store::{KeyStore, MIN_RSA_BITS};
