//! JWT-based request authorization.
//!
//! The gate extracts a bearer token from the `Authorization` header,
//! validates it against the key store loaded at startup, and injects the
//! verified identity into the request context.

mod main;
pub use main::JwtAuthTransformer;

mod jwt_token_auth;
pub use jwt_token_auth::{AuthGateState, AuthenticatedUser};
pub(crate) use jwt_token_auth::manage_jwt_request;
