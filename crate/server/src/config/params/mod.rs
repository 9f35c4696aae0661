mod server_params;

pub use server_params::{DEFAULT_TOKEN_TTL_HOURS, ServerParams};
