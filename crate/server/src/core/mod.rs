//! The composition root of the server.

mod credential;

use std::sync::Arc;

pub use credential::{CredentialDirectory, InMemoryDirectory, StoredCredential, verify_password};

use crate::{config::ServerParams, keys::KeyStore, result::TrlResult};

/// The explicitly constructed server context: validated parameters, the key
/// store loaded once at startup, and the credential directory. Shared by all
/// workers via `Arc`; never accessed as ambient global state.
pub struct TrlServer {
    pub params: ServerParams,
    pub key_store: Arc<KeyStore>,
    pub directory: Arc<dyn CredentialDirectory>,
}

impl TrlServer {
    /// Instantiate the server context from validated parameters.
    ///
    /// Loads the RSA key pair from the configured source; a load failure is
    /// fatal here, before the server binds its port.
    ///
    /// # Errors
    ///
    /// Returns an error when the key material or the users file cannot be
    /// loaded.
    pub fn instantiate(params: ServerParams) -> TrlResult<Self> {
        let key_store = Arc::new(KeyStore::load(&params.key_source, &params.jwt_kid)?);
        let directory: Arc<dyn CredentialDirectory> = match &params.users_file {
            Some(path) => Arc::new(InMemoryDirectory::from_users_file(path)?),
            None => Arc::new(InMemoryDirectory::new()),
        };
        Ok(Self {
            params,
            key_store,
            directory,
        })
    }

    /// Instantiate with an externally supplied directory (used by the
    /// composition root when a different backing store is wired in).
    ///
    /// # Errors
    ///
    /// Returns an error when the key material cannot be loaded.
    pub fn with_directory(
        params: ServerParams,
        directory: Arc<dyn CredentialDirectory>,
    ) -> TrlResult<Self> {
        let key_store = Arc::new(KeyStore::load(&params.key_source, &params.jwt_kid)?);
        Ok(Self {
            params,
            key_store,
            directory,
        })
    }
}
