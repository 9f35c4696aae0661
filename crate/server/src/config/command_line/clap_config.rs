use std::{fmt, path::PathBuf};

use clap::Parser;

use super::{HttpConfig, JwtAuthConfig, KeySourceConfig};

#[derive(Parser, Default)]
#[clap(version, about, long_about = None)]
pub struct ClapConfig {
    #[clap(flatten)]
    pub auth: JwtAuthConfig,

    #[clap(flatten)]
    pub key_source: KeySourceConfig,

    #[clap(flatten)]
    pub http: HttpConfig,

    /// Path to a JSON file with seeded login credentials
    /// (a list of objects with user_id, email, password_hash and role)
    #[clap(long, env = "TRL_USERS_FILE")]
    pub users_file: Option<PathBuf>,
}

impl fmt::Debug for ClapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut x = f.debug_struct("");
        let x = if self.auth.jwt_issuer.is_some() {
            x.field("auth", &self.auth)
        } else {
            &mut x
        };
        let x = x.field("key source", &self.key_source);
        let x = x.field("http", &self.http);
        let x = if let Some(users_file) = &self.users_file {
            x.field("users file", users_file)
        } else {
            x
        };
        x.finish()
    }
}
