mod command_line;
mod params;

pub use command_line::{ClapConfig, HttpConfig, JwtAuthConfig, KeySourceConfig};
pub use params::{DEFAULT_TOKEN_TTL_HOURS, ServerParams};
