use clap::Args;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Args, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// The hostname to bind the server to
    #[clap(long, env = "TRL_HOSTNAME", default_value = "0.0.0.0")]
    pub hostname: String,

    /// The port to bind the server to
    #[clap(long, env = "PORT", default_value = "8080")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            hostname: "0.0.0.0".to_owned(),
            port: 8080,
        }
    }
}
