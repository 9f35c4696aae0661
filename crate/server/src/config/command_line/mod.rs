mod clap_config;
mod http_config;
mod jwt_auth_config;
mod key_source_config;

pub use clap_config::ClapConfig;
pub use http_config::HttpConfig;
pub use jwt_auth_config::JwtAuthConfig;
pub use key_source_config::KeySourceConfig;
