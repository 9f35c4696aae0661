use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The role asserted in a token payload.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Researcher,
}

/// The claims embedded in a signed token payload.
///
/// Created at issuance time, consumed read-only at validation time; lives
/// only inside the token payload and the request context of a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub user_email: String,
    pub role: Role,
    /// Reserved for tokens minted on behalf of a client application; empty otherwise
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_name: String,
    pub iss: String,
    /// Single-element audience list
    pub aud: Vec<String>,
    /// Seconds since epoch
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}
