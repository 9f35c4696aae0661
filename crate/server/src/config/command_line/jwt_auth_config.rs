use clap::Args;
use serde::{Deserialize, Serialize};

/// Configuration of the tokens this server issues and accepts.
///
/// The issuer and audience are deliberately kept optional: protected
/// endpoints fail closed with a 500 when either is unset rather than
/// validating tokens against empty strings.
#[derive(Debug, Clone, Args, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct JwtAuthConfig {
    /// The `iss` claim stamped on issued tokens and required on validated ones
    #[clap(long, env = "JWT_ISSUER")]
    pub jwt_issuer: Option<String>,

    /// The `aud` claim stamped on issued tokens and required on validated ones
    #[clap(long, env = "JWT_AUDIENCE")]
    pub jwt_audience: Option<String>,

    /// Token lifetime in hours; zero or negative values fall back to 24
    #[clap(long, env = "JWT_EXPIRY", default_value = "24")]
    pub jwt_expiry_hours: i64,

    /// The key version identifier ("kid") used to sign new tokens
    #[clap(long, env = "JWT_KID", default_value = "v1")]
    pub jwt_kid: String,
}
