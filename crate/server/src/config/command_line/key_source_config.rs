use std::{fmt, path::PathBuf};

use clap::Args;

use crate::{error::TrlError, keys::KeyMaterialSource, result::TrlResult};

/// Where the RSA key pair used to sign and verify tokens comes from.
///
/// Exactly one loading strategy must be active per deployment: either both
/// base64 environment variables, or both PEM file paths.
#[derive(Clone, Args, Default)]
pub struct KeySourceConfig {
    /// Base64-encoded PEM block holding the PKCS#8 RSA private key
    #[clap(long, env = "PRIVATE_KEY_V1_B64")]
    pub private_key_v1_b64: Option<String>,

    /// Base64-encoded PEM block holding the PKIX RSA public key
    #[clap(long, env = "PUBLIC_KEY_V1_B64")]
    pub public_key_v1_b64: Option<String>,

    /// Path to a PEM file holding the PKCS#8 RSA private key
    #[clap(long, env = "JWT_PRIVATE_KEY_FILE")]
    pub jwt_private_key_file: Option<PathBuf>,

    /// Path to a PEM file holding the PKIX RSA public key
    #[clap(long, env = "JWT_PUBLIC_KEY_FILE")]
    pub jwt_public_key_file: Option<PathBuf>,
}

impl KeySourceConfig {
    /// Select the active key material source from the supplied options.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` when no strategy is fully configured or
    /// when the two strategies are mixed.
    pub fn key_material_source(&self) -> TrlResult<KeyMaterialSource> {
        let env_pair = (&self.private_key_v1_b64, &self.public_key_v1_b64);
        let file_pair = (&self.jwt_private_key_file, &self.jwt_public_key_file);

        match (env_pair, file_pair) {
            ((Some(private_b64), Some(public_b64)), (None, None)) => {
                Ok(KeyMaterialSource::EnvBase64 {
                    private_b64: private_b64.clone(),
                    public_b64: public_b64.clone(),
                })
            }
            ((None, None), (Some(private_key_file), Some(public_key_file))) => {
                Ok(KeyMaterialSource::Files {
                    private_key_file: private_key_file.clone(),
                    public_key_file: public_key_file.clone(),
                })
            }
            ((None, None), (None, None)) => Err(TrlError::ConfigurationError(
                "no key material source configured: set PRIVATE_KEY_V1_B64/PUBLIC_KEY_V1_B64 or \
                 JWT_PRIVATE_KEY_FILE/JWT_PUBLIC_KEY_FILE"
                    .to_owned(),
            )),
            _ => Err(TrlError::ConfigurationError(
                "incomplete or mixed key material sources: configure either both base64 \
                 environment variables or both PEM file paths"
                    .to_owned(),
            )),
        }
    }
}

impl fmt::Debug for KeySourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the private key material
        f.debug_struct("KeySourceConfig")
            .field("private_key_v1_b64", &self.private_key_v1_b64.as_ref().map(|_| "<set>"))
            .field("public_key_v1_b64", &self.public_key_v1_b64.as_ref().map(|_| "<set>"))
            .field("jwt_private_key_file", &self.jwt_private_key_file)
            .field("jwt_public_key_file", &self.jwt_public_key_file)
            .finish()
    }
}
