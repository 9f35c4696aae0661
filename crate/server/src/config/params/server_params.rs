use std::{fmt, path::PathBuf};

use crate::{config::ClapConfig, keys::KeyMaterialSource, result::TrlResult, trl_ensure};

/// Token lifetime applied when the configured expiry is zero or negative.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// This structure is the context used by the server while it is running.
/// There is a singleton instance shared between all threads.
pub struct ServerParams {
    /// The `iss` claim stamped on issued tokens and expected on validated ones.
    /// `None` means protected endpoints fail closed with a 500.
    pub jwt_issuer: Option<String>,

    /// The `aud` claim stamped on issued tokens and expected on validated ones.
    /// `None` means protected endpoints fail closed with a 500.
    pub jwt_audience: Option<String>,

    /// Token lifetime in hours; always strictly positive after normalization
    pub jwt_expiry_hours: i64,

    /// The key version identifier used to sign new tokens
    pub jwt_kid: String,

    /// The source the RSA key pair is loaded from at startup
    pub key_source: KeyMaterialSource,

    pub hostname: String,

    pub port: u16,

    /// Optional JSON file seeding the in-memory credential directory
    pub users_file: Option<PathBuf>,
}

impl ServerParams {
    /// Tries to create a `ServerParams` instance from the given `ClapConfig`.
    ///
    /// Normalizes the configuration: empty issuer/audience strings are treated
    /// as unset, non-positive expiries fall back to the 24h default and the
    /// active key material source is selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the key source selection fails or the kid is empty.
    pub fn try_from(conf: ClapConfig) -> TrlResult<Self> {
        let key_source = conf.key_source.key_material_source()?;

        trl_ensure!(
            !conf.auth.jwt_kid.is_empty(),
            crate::error::TrlError::ConfigurationError("JWT_KID must not be empty".to_owned())
        );

        let jwt_expiry_hours = if conf.auth.jwt_expiry_hours <= 0 {
            DEFAULT_TOKEN_TTL_HOURS
        } else {
            conf.auth.jwt_expiry_hours
        };

        Ok(Self {
            jwt_issuer: conf.auth.jwt_issuer.filter(|s| !s.is_empty()),
            jwt_audience: conf.auth.jwt_audience.filter(|s| !s.is_empty()),
            jwt_expiry_hours,
            jwt_kid: conf.auth.jwt_kid,
            key_source,
            hostname: conf.http.hostname,
            port: conf.http.port,
            users_file: conf.users_file,
        })
    }
}

impl fmt::Debug for ServerParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerParams")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_audience", &self.jwt_audience)
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .field("jwt_kid", &self.jwt_kid)
            .field("key_source", &self.key_source)
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("users_file", &self.users_file)
            .finish()
    }
}
