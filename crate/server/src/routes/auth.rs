use std::sync::Arc;

use actix_web::{
    post,
    web::{Data, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    core::{TrlServer, verify_password},
    error::TrlError,
    result::TrlResult,
    token::{Role, TokenIdentity, issue_token},
    trl_ensure,
};

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginResponse {
    pub token: String,
    /// Token lifetime in hours
    pub expires_in: i64,
    pub role: Role,
}

/// Verify credentials against the directory and mint a signed token.
#[post("/auth/login")]
pub(crate) async fn login(
    server: Data<Arc<TrlServer>>,
    request: Json<LoginRequest>,
) -> TrlResult<Json<LoginResponse>> {
    let request = request.into_inner();
    trl_ensure!(
        !request.email.is_empty() && !request.password.is_empty(),
        TrlError::InvalidRequest("invalid request".to_owned())
    );
    info!("login attempt for {}", request.email);

    let credential = match server.directory.lookup(&request.email).await {
        Ok(credential) => credential,
        Err(TrlError::ItemNotFound(_)) => {
            // Indistinguishable from a wrong password
            warn!("login failed for {}: unknown email", request.email);
            return Err(TrlError::Unauthorized("invalid credentials".to_owned()));
        }
        Err(e) => return Err(e),
    };
    if !verify_password(&request.password, &credential.password_hash)? {
        warn!("login failed for {}: bad password", request.email);
        return Err(TrlError::Unauthorized("invalid credentials".to_owned()));
    }

    let params = &server.params;
    let issuer = params
        .jwt_issuer
        .as_deref()
        .ok_or_else(|| TrlError::ConfigurationError("JWT_ISSUER not set".to_owned()))?;
    let audience = params
        .jwt_audience
        .as_deref()
        .ok_or_else(|| TrlError::ConfigurationError("JWT_AUDIENCE not set".to_owned()))?;

    let identity = TokenIdentity::new(credential.user_id, credential.email, credential.role);
    let token = issue_token(
        &identity,
        issuer,
        audience,
        &params.jwt_kid,
        params.jwt_expiry_hours,
        &server.key_store,
    )?;
    info!(
        "issued token for {} (role: {})",
        identity.user_email, identity.role
    );

    Ok(Json(LoginResponse {
        token,
        expires_in: params.jwt_expiry_hours,
        role: identity.role,
    }))
}
