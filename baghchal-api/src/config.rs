//! Command-line / environment configuration.

use std::path::PathBuf;

use baghchal_core::session::SessionConfig;
use clap::Parser;

/// Baghchal server - pairs players and referees Tigers-and-Goats games
#[derive(Parser, Debug, Clone)]
#[command(name = "baghchal-server")]
#[command(about = "Authoritative two-player Baghchal server", long_about = None)]
#[command(version)]
pub struct Config {
    /// Host to bind to
    #[arg(long, env = "BAGHCHAL_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind to
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Directory with the browser client, served for every non-API path
    #[arg(long, env = "BAGHCHAL_STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    /// Reply "Not your turn." to out-of-turn moves instead of ignoring them
    #[arg(long, env = "BAGHCHAL_NOTIFY_OUT_OF_TURN")]
    pub notify_out_of_turn: bool,
}

impl Config {
    /// Address to listen on.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            notify_out_of_turn: self.notify_out_of_turn,
        }
    }
}
