use actix_web::{
    HttpResponse, HttpResponseBuilder, get,
    http::StatusCode,
    web::Json,
};
use clap::crate_version;
use serde_json::json;
use tracing::{error, warn};

use crate::error::TrlError;

pub(crate) mod auth;
pub(crate) mod me;

impl actix_web::error::ResponseError for TrlError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::ItemNotFound(_) => StatusCode::NOT_FOUND,
            Self::ConfigurationError(_)
            | Self::KeyFormatError(_)
            | Self::KeyNotFound(_)
            | Self::SigningError(_)
            | Self::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let message = self.to_string();

        if status_code >= StatusCode::INTERNAL_SERVER_ERROR {
            error!("{status_code} - {message}");
        } else {
            warn!("{status_code} - {message}");
        }

        // Full detail goes to the logs above; the response body carries the
        // client-safe message only
        HttpResponseBuilder::new(status_code).json(json!({"error": self.client_message()}))
    }
}

/// Get the server version
#[get("/version")]
pub(crate) async fn get_version() -> Json<String> {
    Json(crate_version!().to_owned())
}
