use std::sync::Arc;

use actix_web::{App, HttpServer, web, web::Data};
use tracing::info;

use crate::{
    core::TrlServer,
    error::TrlError,
    middlewares::{AuthGateState, JwtAuthTransformer},
    result::TrlResult,
    routes,
};

/// Start the server and run it until shutdown.
///
/// # Errors
///
/// Returns an error if the server cannot be prepared or fails while running.
pub async fn start_trl_server(trl_server: Arc<TrlServer>) -> TrlResult<()> {
    let server = prepare_trl_server(trl_server)?;
    server
        .await
        .map_err(|e| TrlError::ServerError(format!("server execution error: {e}")))
}

/// Creates the `HttpServer` instance and configures the routes: the login and
/// version endpoints are public, everything under `/api` sits behind the
/// authorization gate.
///
/// # Errors
///
/// Returns an error if the server cannot bind its address.
pub fn prepare_trl_server(trl_server: Arc<TrlServer>) -> TrlResult<actix_web::dev::Server> {
    let address = format!("{}:{}", trl_server.params.hostname, trl_server.params.port);
    let gate_state = Arc::new(AuthGateState::new(
        &trl_server.params,
        trl_server.key_store.clone(),
    ));

    info!("Starting the TRL research backend on {address}");

    let server = HttpServer::new(move || {
        App::new()
            .app_data(Data::new(trl_server.clone()))
            .service(routes::get_version)
            .service(routes::auth::login)
            .service(
                web::scope("/api")
                    .wrap(JwtAuthTransformer::new(gate_state.clone()))
                    .service(routes::me::me),
            )
    })
    .bind(&address)
    .map_err(|e| TrlError::ServerError(format!("cannot bind to {address}: {e}")))?
    .run();

    Ok(server)
}
