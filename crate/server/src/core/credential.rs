use std::{collections::HashMap, path::Path};

use async_trait::async_trait;
use serde::Deserialize;

use crate::{error::TrlError, result::TrlResult, token::Role};

/// A stored login credential as returned by the directory.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredCredential {
    pub user_id: String,
    pub email: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    pub role: Role,
}

/// Read-only lookup of stored login credentials, keyed by email.
///
/// The production deployment backs this with the document store; that wrapper
/// is thin glue and lives outside this crate. Only the contract matters here.
#[async_trait]
pub trait CredentialDirectory: Send + Sync {
    /// # Errors
    ///
    /// Returns an `ItemNotFound` error when no credential exists for `email`.
    async fn lookup(&self, email: &str) -> TrlResult<StoredCredential>;
}

/// An in-memory directory, optionally seeded from a JSON users file.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: HashMap<String, StoredCredential>,
}

impl InMemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = StoredCredential>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|credential| (credential.email.clone(), credential))
                .collect(),
        }
    }

    /// Seed the directory from a JSON file holding a list of credentials.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` when the file cannot be read or parsed.
    pub fn from_users_file(path: &Path) -> TrlResult<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            TrlError::ConfigurationError(format!(
                "cannot read users file {}: {e}",
                path.display()
            ))
        })?;
        let users: Vec<StoredCredential> = serde_json::from_str(&data).map_err(|e| {
            TrlError::ConfigurationError(format!(
                "cannot parse users file {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self::with_users(users))
    }
}

#[async_trait]
impl CredentialDirectory for InMemoryDirectory {
    async fn lookup(&self, email: &str) -> TrlResult<StoredCredential> {
        self.users
            .get(email)
            .cloned()
            .ok_or_else(|| TrlError::ItemNotFound(format!("no credentials for {email}")))
    }
}

/// Check a password against its stored bcrypt hash.
///
/// # Errors
///
/// Returns a `ServerError` when the stored hash itself is malformed; a plain
/// mismatch is `Ok(false)`.
pub fn verify_password(password: &str, password_hash: &str) -> TrlResult<bool> {
    Ok(bcrypt::verify(password, password_hash)?)
}

#[allow(clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::{CredentialDirectory, InMemoryDirectory, StoredCredential, verify_password};
    use crate::{error::TrlError, token::Role};

    // Low cost keeps the hashing fast in tests; production uses the default
    const TEST_BCRYPT_COST: u32 = 4;

    #[tokio::test]
    async fn test_lookup_and_verify() {
        let hash = bcrypt::hash("s3cret", TEST_BCRYPT_COST).expect("hashing should work");
        let directory = InMemoryDirectory::with_users([StoredCredential {
            user_id: "u-1".to_owned(),
            email: "alice@example.com".to_owned(),
            password_hash: hash,
            role: Role::Admin,
        }]);

        let credential = directory
            .lookup("alice@example.com")
            .await
            .expect("credential should exist");
        assert!(verify_password("s3cret", &credential.password_hash).expect("valid hash"));
        assert!(!verify_password("wrong", &credential.password_hash).expect("valid hash"));

        let err = directory
            .lookup("bob@example.com")
            .await
            .expect_err("unknown email");
        assert!(matches!(err, TrlError::ItemNotFound(_)));
    }

    #[test]
    fn test_users_file_parsing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("users.json");
        std::fs::write(
            &path,
            r#"[{"user_id": "u-1", "email": "a@b.c", "password_hash": "$2b$04$abcdefghijklmnopqrstuv", "role": "researcher"}]"#,
        )
        .expect("write users file");

        let directory = InMemoryDirectory::from_users_file(&path).expect("valid users file");
        assert!(directory.users.contains_key("a@b.c"));

        std::fs::write(&path, "not json").expect("write users file");
        let err = InMemoryDirectory::from_users_file(&path).expect_err("invalid users file");
        assert!(matches!(err, TrlError::ConfigurationError(_)));
    }
}
