//! CLI configuration
//!
//! Everything can come from flags or the environment (`.env` is loaded
//! first):
//!
//! ```bash
//! API_URL=https://api.example.com mediconnect status
//! mediconnect --session-file /tmp/s.json open /patient
//! ```

use std::path::PathBuf;
use std::time::Duration;

use auth::AuthConfig;
use auth::domain::value_object::Role;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "mediconnect")]
#[command(about = "MediConnect session client")]
#[command(version)]
pub struct Cli {
    /// Backend base URL
    #[arg(long, env = "API_URL", default_value = "http://localhost:5001/")]
    pub api_url: String,

    /// File holding the signed-in session between runs
    #[arg(long, env = "MEDICONNECT_SESSION_FILE", default_value = ".mediconnect/session.json")]
    pub session_file: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, env = "MEDICONNECT_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the address that starts Google sign-in
    LoginUrl,

    /// Finish sign-in from the OAuth callback address
    Callback {
        /// Callback URL or its query string (`?token=...`)
        url: String,
    },

    /// Show who is signed in
    Status,

    /// Sign out
    Logout,

    /// Choose the account role
    SelectRole {
        /// `doctor` or `patient`
        role: Role,
    },

    /// Navigate to a client path and print where it lands
    Open {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Create the role profile from a JSON form
    Register {
        /// `doctor` or `patient`
        #[arg(long)]
        role: Role,

        /// JSON file with the form fields
        #[arg(long)]
        file: PathBuf,
    },
}

impl Cli {
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            request_timeout: Duration::from_secs(self.timeout_secs.max(1)),
            ..AuthConfig::with_base_url(self.api_url.clone())
        }
    }
}
