use actix_web::{get, web::Json};
use serde::Serialize;
use tracing::debug;

use crate::{middlewares::AuthenticatedUser, token::Role};

#[derive(Debug, Serialize)]
pub(crate) struct Identity {
    pub user_id: String,
    pub user_email: String,
    pub role: Role,
}

/// Echo the identity the authorization gate attached to this request.
#[get("/me")]
pub(crate) async fn me(user: AuthenticatedUser) -> Json<Identity> {
    debug!("GET /me for {}", user.email);
    Json(Identity {
        user_id: user.user_id,
        user_email: user.email,
        role: user.role,
    })
}
