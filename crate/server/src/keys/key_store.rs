use std::collections::HashMap;

use jsonwebtoken::{DecodingKey, EncodingKey};
use rsa::{
    RsaPrivateKey, RsaPublicKey,
    pkcs8::{DecodePrivateKey, DecodePublicKey},
    traits::PublicKeyParts,
};

use super::KeyMaterialSource;
use crate::{error::TrlError, result::TrlResult, trl_ensure};

/// Keys below this size are rejected at load time.
pub const MIN_RSA_BITS: usize = 2048;

const PKCS8_PEM_TAG: &str = "PRIVATE KEY";
const PKIX_PEM_TAG: &str = "PUBLIC KEY";

/// An immutable mapping from key version identifier ("kid") to RSA key pair.
///
/// Populated once at process startup and shared read-only by all concurrent
/// requests; signing and verification never mutate it, so no synchronization
/// is needed beyond an `Arc`.
pub struct KeyStore {
    signing_keys: HashMap<String, EncodingKey>,
    verification_keys: HashMap<String, DecodingKey>,
}

// `EncodingKey`/`DecodingKey` are not `Debug`; show only the registered kids.
impl std::fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyStore")
            .field("signing_keys", &self.signing_keys.keys())
            .field("verification_keys", &self.verification_keys.keys())
            .finish()
    }
}

impl KeyStore {
    /// Load and strictly parse the key pair from the configured source,
    /// registering it under `kid`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` when the source cannot be resolved and a
    /// `KeyFormatError` when the material is not valid PKCS#8/PKIX RSA.
    pub fn load(source: &KeyMaterialSource, kid: &str) -> TrlResult<Self> {
        let (private_pem, public_pem) = source.resolve()?;
        Self::from_pem_pair(kid, &private_pem, &public_pem)
    }

    /// Build a store from an in-memory PEM pair.
    ///
    /// Enforces the strict encodings (PKCS#8 private, PKIX public), the
    /// minimum key size, and that the two keys share the same modulus.
    ///
    /// # Errors
    ///
    /// Returns a `KeyFormatError` when any of those checks fail.
    pub fn from_pem_pair(kid: &str, private_pem: &str, public_pem: &str) -> TrlResult<Self> {
        let private_key = parse_pkcs8_private_key(private_pem)?;
        let public_key = parse_pkix_public_key(public_pem)?;

        let bits = private_key.size() * 8;
        trl_ensure!(
            bits >= MIN_RSA_BITS,
            TrlError::KeyFormatError(format!(
                "private key is {bits} bits, expected at least {MIN_RSA_BITS}"
            ))
        );
        trl_ensure!(
            private_key.to_public_key() == public_key,
            TrlError::KeyFormatError(
                "public key does not match the private key (different modulus)".to_owned()
            )
        );

        let encoding_key = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .map_err(|e| TrlError::KeyFormatError(format!("unusable private key: {e}")))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map_err(|e| TrlError::KeyFormatError(format!("unusable public key: {e}")))?;

        Ok(Self {
            signing_keys: HashMap::from([(kid.to_owned(), encoding_key)]),
            verification_keys: HashMap::from([(kid.to_owned(), decoding_key)]),
        })
    }

    /// The signing key registered under `kid`.
    ///
    /// # Errors
    ///
    /// Returns a `KeyNotFound` error when the kid is absent.
    pub fn encoding_key(&self, kid: &str) -> TrlResult<&EncodingKey> {
        self.signing_keys
            .get(kid)
            .ok_or_else(|| TrlError::KeyNotFound(format!("private key for kid={kid} not found")))
    }

    /// The verification key registered under `kid`.
    ///
    /// # Errors
    ///
    /// Returns a `KeyNotFound` error when the kid is absent.
    pub fn decoding_key(&self, kid: &str) -> TrlResult<&DecodingKey> {
        self.verification_keys
            .get(kid)
            .ok_or_else(|| TrlError::KeyNotFound(format!("public key for kid={kid} not found")))
    }
}

/// Parse a PKCS#8 RSA private key, rejecting any other PEM block type
/// (in particular legacy PKCS#1 `RSA PRIVATE KEY` blocks).
fn parse_pkcs8_private_key(pem_data: &str) -> TrlResult<RsaPrivateKey> {
    let block = pem::parse(pem_data).map_err(|e| {
        TrlError::KeyFormatError(format!("cannot decode PEM block (private key): {e}"))
    })?;
    trl_ensure!(
        block.tag() == PKCS8_PEM_TAG,
        TrlError::KeyFormatError(format!(
            "unexpected PEM type: {} (expected {PKCS8_PEM_TAG} for PKCS#8)",
            block.tag()
        ))
    );
    RsaPrivateKey::from_pkcs8_der(block.contents()).map_err(|e| {
        TrlError::KeyFormatError(format!("failed to parse PKCS#8 RSA private key: {e}"))
    })
}

/// Parse a PKIX RSA public key, rejecting any other PEM block type.
fn parse_pkix_public_key(pem_data: &str) -> TrlResult<RsaPublicKey> {
    let block = pem::parse(pem_data).map_err(|e| {
        TrlError::KeyFormatError(format!("cannot decode PEM block (public key): {e}"))
    })?;
    trl_ensure!(
        block.tag() == PKIX_PEM_TAG,
        TrlError::KeyFormatError(format!(
            "unexpected PEM type: {} (expected {PKIX_PEM_TAG} for PKIX)",
            block.tag()
        ))
    );
    RsaPublicKey::from_public_key_der(block.contents())
        .map_err(|e| TrlError::KeyFormatError(format!("failed to parse PKIX public key: {e}")))
}

#[allow(clippy::expect_used)]
#[cfg(test)]
mod tests {
    use pem::Pem;

    use super::KeyStore;
    use crate::{
        error::TrlError,
        keys::keygen::{DEFAULT_RSA_BITS, generate_rsa_keypair},
    };

    #[test]
    fn test_load_and_lookup() {
        let (private_pem, public_pem) =
            generate_rsa_keypair(DEFAULT_RSA_BITS).expect("keygen should succeed");
        let store =
            KeyStore::from_pem_pair("v1", &private_pem, &public_pem).expect("valid key pair");

        store.encoding_key("v1").expect("signing key for v1");
        store.decoding_key("v1").expect("verification key for v1");

        // `&EncodingKey`/`&DecodingKey` are not `Debug`, which `expect_err` requires.
        let err = store.encoding_key("v2").map(|_| ()).expect_err("unknown kid");
        assert!(matches!(err, TrlError::KeyNotFound(_)));
        let err = store.decoding_key("v2").map(|_| ()).expect_err("unknown kid");
        assert!(matches!(err, TrlError::KeyNotFound(_)));
    }

    #[test]
    fn test_garbage_pem_rejected() {
        let err = KeyStore::from_pem_pair("v1", "not a pem", "not a pem either")
            .expect_err("garbage input");
        assert!(matches!(err, TrlError::KeyFormatError(_)));
    }

    #[test]
    fn test_pkcs1_block_type_rejected() {
        let (private_pem, public_pem) =
            generate_rsa_keypair(DEFAULT_RSA_BITS).expect("keygen should succeed");

        // Re-wrap the PKCS#8 body under the legacy PKCS#1 tag; the strict
        // parser must reject it on the block type alone.
        let block = pem::parse(&private_pem).expect("valid PEM");
        let relabeled = pem::encode(&Pem::new("RSA PRIVATE KEY", block.contents().to_vec()));

        let err = KeyStore::from_pem_pair("v1", &relabeled, &public_pem)
            .expect_err("PKCS#1 tag must be rejected");
        match err {
            TrlError::KeyFormatError(msg) => assert!(msg.contains("unexpected PEM type")),
            other => panic!("expected KeyFormatError, got {other:?}"),
        }
    }

    #[test]
    fn test_mismatched_pair_rejected() {
        let (private_pem, _) = generate_rsa_keypair(DEFAULT_RSA_BITS).expect("keygen");
        let (_, other_public_pem) = generate_rsa_keypair(DEFAULT_RSA_BITS).expect("keygen");

        let err = KeyStore::from_pem_pair("v1", &private_pem, &other_public_pem)
            .expect_err("mismatched pair");
        match err {
            TrlError::KeyFormatError(msg) => assert!(msg.contains("does not match")),
            other => panic!("expected KeyFormatError, got {other:?}"),
        }
    }

    #[test]
    fn test_swapped_pem_documents_rejected() {
        let (private_pem, public_pem) = generate_rsa_keypair(DEFAULT_RSA_BITS).expect("keygen");
        let err = KeyStore::from_pem_pair("v1", &public_pem, &private_pem)
            .expect_err("swapped documents");
        assert!(matches!(err, TrlError::KeyFormatError(_)));
    }
}
