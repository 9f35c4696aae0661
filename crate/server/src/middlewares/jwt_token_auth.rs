use std::{rc::Rc, sync::Arc};

use actix_service::Service;
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
    body::{BoxBody, EitherBody},
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::header,
};
use futures::future::{Ready, ready};
use serde_json::json;
use tracing::{debug, error, trace, warn};

use crate::{
    config::ServerParams,
    error::TrlError,
    keys::KeyStore,
    token::{Claims, Role, validate_token},
};

/// The immutable state shared by the authorization gate: the expected
/// issuer/audience and the key store loaded at startup.
pub struct AuthGateState {
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    pub key_store: Arc<KeyStore>,
}

impl AuthGateState {
    #[must_use]
    pub fn new(params: &ServerParams, key_store: Arc<KeyStore>) -> Self {
        Self {
            jwt_issuer: params.jwt_issuer.clone(),
            jwt_audience: params.jwt_audience.clone(),
            key_store,
        }
    }
}

/// The verified identity attached to the request context once the gate has
/// accepted a token. Downstream handlers obtain it with the [`FromRequest`]
/// extractor.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub claims: Claims,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id.clone(),
            email: claims.user_email.clone(),
            role: claims.role,
            claims,
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = TrlError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(req.extensions().get::<Self>().cloned().ok_or_else(|| {
            TrlError::Unauthorized("no authenticated user in the request context".to_owned())
        }))
    }
}

/// Core authorization gate logic, one check per inbound request:
/// extract the bearer token, check the server-side configuration, validate
/// the token, then either inject the identity and continue the pipeline or
/// short-circuit with the appropriate status. Failures are never retried.
pub(crate) async fn manage_jwt_request<S, B>(
    service: Rc<S>,
    state: Arc<AuthGateState>,
    req: ServiceRequest,
) -> Result<ServiceResponse<EitherBody<B, BoxBody>>, Error>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
{
    trace!("Starting JWT Authentication...");

    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(ToOwned::to_owned);
    let Some(token) = bearer else {
        warn!(
            "{:?} {} 401 unauthorized: missing or invalid authorization header",
            req.method(),
            req.path()
        );
        return Ok(req
            .into_response(
                HttpResponse::Unauthorized()
                    .json(json!({"error": "missing or invalid authorization header"})),
            )
            .map_into_right_body());
    };

    // Fail closed rather than validating against empty strings
    let Some(issuer) = state.jwt_issuer.as_deref() else {
        error!("JWT_ISSUER is not configured");
        return Ok(req
            .into_response(
                HttpResponse::InternalServerError()
                    .json(json!({"error": "server configuration error: JWT_ISSUER not set"})),
            )
            .map_into_right_body());
    };
    let Some(audience) = state.jwt_audience.as_deref() else {
        error!("JWT_AUDIENCE is not configured");
        return Ok(req
            .into_response(
                HttpResponse::InternalServerError()
                    .json(json!({"error": "server configuration error: JWT_AUDIENCE not set"})),
            )
            .map_into_right_body());
    };

    match validate_token(&token, issuer, audience, &state.key_store) {
        Ok(claims) => {
            debug!("JWT access granted to {}", claims.user_email);
            req.extensions_mut().insert(AuthenticatedUser::from(claims));
            Ok(service.call(req).await?.map_into_left_body())
        }
        Err(e) => {
            // The detailed cause stays in the logs; clients get a generic 401
            warn!("{:?} {} 401 unauthorized: {e}", req.method(), req.path());
            Ok(req
                .into_response(HttpResponse::Unauthorized().json(json!({"error": "invalid token"})))
                .map_into_right_body())
        }
    }
}
