use chrono::Utc;
use jsonwebtoken::{Algorithm, Header, encode};

use super::{Claims, Role};
use crate::{error::TrlError, keys::KeyStore, result::TrlResult};

/// Tokens are stamped with `nbf = iat - 30s` so they are immediately usable
/// across slightly desynchronized clocks.
pub const NOT_BEFORE_LEEWAY_SECS: i64 = 30;

/// Identity fields stamped into a freshly minted token.
#[derive(Debug, Clone)]
pub struct TokenIdentity {
    pub user_id: String,
    pub user_email: String,
    pub role: Role,
    /// Reserved; empty unless the token is minted for a client application
    pub client_id: String,
    pub client_name: String,
}

impl TokenIdentity {
    #[must_use]
    pub fn new(user_id: impl Into<String>, user_email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            user_email: user_email.into(),
            role,
            client_id: String::new(),
            client_name: String::new(),
        }
    }
}

/// Mint an RS256-signed token asserting the given identity.
///
/// The signing method is fixed to RS256: verification never requires the
/// signing secret, so the public key can be handed to any verifying service.
/// The header carries the `kid` so a validator can select the matching public
/// key without guessing. `ttl_hours` is used as given; callers substitute the
/// default when the configured value is non-positive (see `ServerParams`).
///
/// # Errors
///
/// Returns a `KeyNotFound` error when the store holds no private key for
/// `kid` and a `SigningError` on cryptographic failure.
pub fn issue_token(
    identity: &TokenIdentity,
    issuer: &str,
    audience: &str,
    kid: &str,
    ttl_hours: i64,
    key_store: &KeyStore,
) -> TrlResult<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        user_id: identity.user_id.clone(),
        user_email: identity.user_email.clone(),
        role: identity.role,
        client_id: identity.client_id.clone(),
        client_name: identity.client_name.clone(),
        iss: issuer.to_owned(),
        aud: vec![audience.to_owned()],
        iat: now,
        nbf: now - NOT_BEFORE_LEEWAY_SECS,
        exp: now + ttl_hours * 3600,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_owned());

    let signing_key = key_store.encoding_key(kid)?;
    encode(&header, &claims, signing_key)
        .map_err(|e| TrlError::SigningError(format!("cannot sign token: {e}")))
}
