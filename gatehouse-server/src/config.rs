//! Runtime configuration, loaded from flags or the environment (a `.env`
//! file is honoured at startup).

use std::fmt;

use clap::Parser;
use gatehouse_core::auth::token::TokenService;

#[derive(Parser, Clone)]
#[command(name = "gatehouse-server")]
#[command(about = "User-account service with role-gated endpoints")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3333)]
    pub port: u16,

    /// Postgres connection string.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Symmetric signing key for session tokens. Required; the process
    /// holds exactly one and never rotates it at runtime.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Session token lifetime in seconds.
    #[arg(long, env = "TOKEN_TTL_SECS", default_value_t = TokenService::DEFAULT_TTL_SECS)]
    pub token_ttl_secs: i64,

    /// Render unknown-e-mail and wrong-password login failures
    /// identically, so callers cannot enumerate registered addresses.
    #[arg(long, env = "MASK_CREDENTIAL_ERRORS", default_value_t = false)]
    pub mask_credential_errors: bool,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("mask_credential_errors", &self.mask_credential_errors)
            .finish_non_exhaustive()
    }
}
