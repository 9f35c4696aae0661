use std::{fmt, path::PathBuf};

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{error::TrlError, result::TrlResult, trl_ensure};

/// Where the PEM-encoded RSA key pair comes from.
///
/// Both strategies resolve to the same pair of PEM documents; the choice is
/// made once by configuration, not by which constructor a caller happens to
/// invoke.
#[derive(Clone)]
pub enum KeyMaterialSource {
    /// Base64-encoded PEM blocks held in environment-provided strings
    EnvBase64 {
        private_b64: String,
        public_b64: String,
    },
    /// PEM files on disk
    Files {
        private_key_file: PathBuf,
        public_key_file: PathBuf,
    },
}

impl KeyMaterialSource {
    /// Resolve the source into the `(private, public)` PEM documents.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` when the source is empty, the base64
    /// decoding fails, or a file cannot be read.
    pub fn resolve(&self) -> TrlResult<(String, String)> {
        match self {
            Self::EnvBase64 {
                private_b64,
                public_b64,
            } => {
                trl_ensure!(
                    !private_b64.is_empty(),
                    TrlError::ConfigurationError("missing PRIVATE_KEY_V1_B64".to_owned())
                );
                trl_ensure!(
                    !public_b64.is_empty(),
                    TrlError::ConfigurationError("missing PUBLIC_KEY_V1_B64".to_owned())
                );
                let private_pem = decode_b64_pem(private_b64, "private key")?;
                let public_pem = decode_b64_pem(public_b64, "public key")?;
                Ok((private_pem, public_pem))
            }
            Self::Files {
                private_key_file,
                public_key_file,
            } => {
                let private_pem = read_pem_file(private_key_file)?;
                let public_pem = read_pem_file(public_key_file)?;
                Ok((private_pem, public_pem))
            }
        }
    }
}

fn decode_b64_pem(b64: &str, what: &str) -> TrlResult<String> {
    let bytes = STANDARD.decode(b64.trim()).map_err(|e| {
        TrlError::ConfigurationError(format!("failed to decode {what} base64: {e}"))
    })?;
    String::from_utf8(bytes)
        .map_err(|e| TrlError::ConfigurationError(format!("{what} is not valid UTF-8 PEM: {e}")))
}

fn read_pem_file(path: &PathBuf) -> TrlResult<String> {
    let pem = std::fs::read_to_string(path).map_err(|e| {
        TrlError::ConfigurationError(format!("cannot read key file {}: {e}", path.display()))
    })?;
    trl_ensure!(
        !pem.trim().is_empty(),
        TrlError::ConfigurationError(format!("key file {} is empty", path.display()))
    );
    Ok(pem)
}

impl fmt::Debug for KeyMaterialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the private key material
        match self {
            Self::EnvBase64 { .. } => f.write_str("KeyMaterialSource::EnvBase64"),
            Self::Files {
                private_key_file,
                public_key_file,
            } => f
                .debug_struct("KeyMaterialSource::Files")
                .field("private_key_file", private_key_file)
                .field("public_key_file", public_key_file)
                .finish(),
        }
    }
}
