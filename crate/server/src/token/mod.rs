//! Token issuance and validation.
//!
//! Both operations are stateless pure functions over the immutable
//! [`KeyStore`](crate::keys::KeyStore), so concurrent requests share them
//! without locking.

mod claims;
mod issue;
mod validate;

pub use claims::{Claims, Role};
pub use issue::{NOT_BEFORE_LEEWAY_SECS, TokenIdentity, issue_token};
pub use validate::{VALIDATION_LEEWAY_SECS, validate_token};
