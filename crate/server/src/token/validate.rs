use jsonwebtoken::{Algorithm, Validation, decode, decode_header};

use super::Claims;
use crate::{error::TrlError, keys::KeyStore, result::TrlResult, trl_ensure};

/// Tolerance applied to the `nbf` and `exp` checks to absorb clock skew
/// between issuing and validating systems. The effective validity window of a
/// token is `[nbf - leeway, exp + leeway]`.
pub const VALIDATION_LEEWAY_SECS: u64 = 30;

/// Verify a token's signature and claims, returning the embedded identity.
///
/// Validation steps, in order:
/// 1. the header algorithm must be RS256 (pinned, so neither `none` nor an
///    HS256 token forged with the public key as HMAC secret can pass);
/// 2. the header must carry a `kid` with a matching public key in the store;
/// 3. the RSA signature must verify under that key;
/// 4. issuer must match exactly, the audience list must contain the expected
///    audience, and the current time must fall within the leeway window.
///
/// # Errors
///
/// A `kid` with no matching key yields a `KeyNotFound` error; every other
/// failure is collapsed into a coarse `Unauthorized` error so callers cannot
/// probe validation internals. The detailed cause is only ever logged.
pub fn validate_token(
    token: &str,
    expected_issuer: &str,
    expected_audience: &str,
    key_store: &KeyStore,
) -> TrlResult<Claims> {
    trl_ensure!(
        !token.is_empty(),
        TrlError::Unauthorized("token is empty".to_owned())
    );

    let header = decode_header(token)
        .map_err(|e| TrlError::Unauthorized(format!("cannot decode token header: {e}")))?;
    trl_ensure!(
        header.alg == Algorithm::RS256,
        TrlError::Unauthorized(format!("unexpected signing algorithm: {:?}", header.alg))
    );
    let kid = header
        .kid
        .ok_or_else(|| TrlError::Unauthorized("no kid in token header".to_owned()))?;

    let verification_key = key_store.decoding_key(&kid)?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.leeway = VALIDATION_LEEWAY_SECS;
    validation.validate_nbf = true;
    validation.set_issuer(&[expected_issuer]);
    validation.set_audience(&[expected_audience]);

    let token_data = decode::<Claims>(token, verification_key, &validation)
        .map_err(|e| TrlError::Unauthorized(format!("cannot validate token: {e}")))?;

    Ok(token_data.claims)
}

#[allow(clippy::expect_used, clippy::panic)]
#[cfg(test)]
mod tests {
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
    use chrono::Utc;
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

    use super::validate_token;
    use crate::{
        error::TrlError,
        keys::{
            KeyStore,
            keygen::{DEFAULT_RSA_BITS, generate_rsa_keypair},
        },
        token::{Claims, Role, TokenIdentity, issue_token},
    };

    const ISSUER: &str = "trl-backend";
    const AUDIENCE: &str = "trl-frontend";

    fn test_store() -> (KeyStore, String, String) {
        let (private_pem, public_pem) =
            generate_rsa_keypair(DEFAULT_RSA_BITS).expect("keygen should succeed");
        let store =
            KeyStore::from_pem_pair("v1", &private_pem, &public_pem).expect("valid key pair");
        (store, private_pem, public_pem)
    }

    fn test_claims(iat: i64, nbf: i64, exp: i64) -> Claims {
        Claims {
            user_id: "u-1".to_owned(),
            user_email: "alice@example.com".to_owned(),
            role: Role::Admin,
            client_id: String::new(),
            client_name: String::new(),
            iss: ISSUER.to_owned(),
            aud: vec![AUDIENCE.to_owned()],
            iat,
            nbf,
            exp,
        }
    }

    /// Sign arbitrary claims with the given private PEM, bypassing the issuer
    /// so tests can craft expired or otherwise hostile tokens.
    fn sign_raw(claims: &Claims, kid: &str, private_pem: &str) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(kid.to_owned());
        let key = EncodingKey::from_rsa_pem(private_pem.as_bytes()).expect("usable private key");
        encode(&header, claims, &key).expect("signing should succeed")
    }

    #[test]
    fn test_round_trip_preserves_identity() {
        let (store, _, _) = test_store();
        let identity = TokenIdentity::new("u-42", "bob@example.com", Role::Researcher);

        let token =
            issue_token(&identity, ISSUER, AUDIENCE, "v1", 24, &store).expect("issue should work");
        let claims =
            validate_token(&token, ISSUER, AUDIENCE, &store).expect("validate should work");

        assert_eq!(claims.user_id, "u-42");
        assert_eq!(claims.user_email, "bob@example.com");
        assert_eq!(claims.role, Role::Researcher);
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.aud, vec![AUDIENCE.to_owned()]);
        assert!(claims.exp > claims.iat);
        assert!(claims.nbf <= claims.iat);
    }

    #[test]
    fn test_unknown_kid_fails_with_key_not_found() {
        let (store, _, _) = test_store();
        let (other_private, _) = generate_rsa_keypair(DEFAULT_RSA_BITS).expect("keygen");

        let now = Utc::now().timestamp();
        let token = sign_raw(&test_claims(now, now - 30, now + 3600), "v2", &other_private);

        let err = validate_token(&token, ISSUER, AUDIENCE, &store).expect_err("unknown kid");
        assert!(matches!(err, TrlError::KeyNotFound(_)));
    }

    #[test]
    fn test_missing_kid_fails() {
        let (store, private_pem, _) = test_store();
        let now = Utc::now().timestamp();

        // RS256 header without any kid
        let header = Header::new(Algorithm::RS256);
        let key = EncodingKey::from_rsa_pem(private_pem.as_bytes()).expect("usable private key");
        let token =
            encode(&header, &test_claims(now, now - 30, now + 3600), &key).expect("signing");

        let err = validate_token(&token, ISSUER, AUDIENCE, &store).expect_err("missing kid");
        match err {
            TrlError::Unauthorized(msg) => assert!(msg.contains("kid")),
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn test_hs256_algorithm_confusion_fails() {
        // Forge an HS256 token using the public PEM as the HMAC secret; the
        // pinned algorithm list must reject it before any key lookup.
        let (store, _, public_pem) = test_store();
        let now = Utc::now().timestamp();

        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some("v1".to_owned());
        let hmac_key = EncodingKey::from_secret(public_pem.as_bytes());
        let token =
            encode(&header, &test_claims(now, now - 30, now + 3600), &hmac_key).expect("signing");

        let err = validate_token(&token, ISSUER, AUDIENCE, &store).expect_err("HS256 must fail");
        match err {
            TrlError::Unauthorized(msg) => assert!(msg.contains("algorithm")),
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn test_expiry_within_leeway_accepted() {
        let (store, private_pem, _) = test_store();
        let now = Utc::now().timestamp();

        // Expired 20s ago: still inside the 30s leeway window (margin left for
        // test execution time).
        let token = sign_raw(&test_claims(now - 3600, now - 3630, now - 20), "v1", &private_pem);
        validate_token(&token, ISSUER, AUDIENCE, &store)
            .expect("token inside the leeway window should validate");
    }

    #[test]
    fn test_expiry_beyond_leeway_rejected() {
        let (store, private_pem, _) = test_store();
        let now = Utc::now().timestamp();

        let token = sign_raw(&test_claims(now - 3600, now - 3630, now - 40), "v1", &private_pem);
        let err = validate_token(&token, ISSUER, AUDIENCE, &store).expect_err("expired token");
        assert!(matches!(err, TrlError::Unauthorized(_)));
    }

    #[test]
    fn test_future_nbf_beyond_leeway_rejected() {
        let (store, private_pem, _) = test_store();
        let now = Utc::now().timestamp();

        let token = sign_raw(&test_claims(now, now + 120, now + 3600), "v1", &private_pem);
        let err = validate_token(&token, ISSUER, AUDIENCE, &store).expect_err("nbf in the future");
        assert!(matches!(err, TrlError::Unauthorized(_)));
    }

    #[test]
    fn test_issuer_and_audience_mismatch_rejected() {
        let (store, _, _) = test_store();
        let identity = TokenIdentity::new("u-1", "alice@example.com", Role::Admin);
        let token = issue_token(&identity, ISSUER, AUDIENCE, "v1", 1, &store).expect("issue");

        let err = validate_token(&token, "another-issuer", AUDIENCE, &store)
            .expect_err("issuer mismatch");
        assert!(matches!(err, TrlError::Unauthorized(_)));

        let err = validate_token(&token, ISSUER, "another-audience", &store)
            .expect_err("audience mismatch");
        assert!(matches!(err, TrlError::Unauthorized(_)));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let (store, _, _) = test_store();
        let identity = TokenIdentity::new("u-1", "alice@example.com", Role::Researcher);
        let token = issue_token(&identity, ISSUER, AUDIENCE, "v1", 1, &store).expect("issue");

        // Promote the role inside the payload without re-signing.
        let mut parts: Vec<String> = token.split('.').map(ToOwned::to_owned).collect();
        assert_eq!(parts.len(), 3);
        let payload = URL_SAFE_NO_PAD.decode(&parts[1]).expect("payload decodes");
        let tampered = String::from_utf8(payload)
            .expect("payload is JSON")
            .replace("researcher", "admin");
        parts[1] = URL_SAFE_NO_PAD.encode(tampered.as_bytes());
        let tampered_token = parts.join(".");

        let err = validate_token(&tampered_token, ISSUER, AUDIENCE, &store)
            .expect_err("tampered payload must invalidate the signature");
        assert!(matches!(err, TrlError::Unauthorized(_)));
    }

    #[test]
    fn test_empty_token_rejected() {
        let (store, _, _) = test_store();
        let err = validate_token("", ISSUER, AUDIENCE, &store).expect_err("empty token");
        assert!(matches!(err, TrlError::Unauthorized(_)));
    }
}
