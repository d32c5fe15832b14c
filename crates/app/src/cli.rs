//! Command-line arguments.

use std::path::PathBuf;

use alumni_infrastructure::ClientConfig;
use clap::{Parser, Subcommand, ValueEnum};

/// Sign in to the alumni network and keep the session alive.
#[derive(Debug, Parser)]
#[command(name = "alumni-session", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./alumni-session.toml when present)
    #[arg(short = 'f', long, env = "ALUMNI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Hostname the client runs under; selects the API server
    #[arg(long)]
    pub hostname: Option<String>,

    /// Directory holding storage.json
    #[arg(long)]
    pub storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with a username and password
    Login {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long, env = "ALUMNI_PASSWORD", hide_env_values = true)]
        password: String,

        /// Stay signed in across restarts
        #[arg(long)]
        remember: bool,

        /// Route to open after signing in
        #[arg(long)]
        redirect: Option<String>,

        /// Keep refreshing the session until interrupted, then sign out
        #[arg(long)]
        keep_alive: bool,
    },

    /// Renew the access credential from the saved refresh cookie
    Refresh,

    /// Sign out and forget the saved preference
    Logout,

    /// Turn "stay signed in" on or off
    Remember {
        /// New setting
        #[arg(value_enum)]
        setting: Toggle,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    /// Stay signed in
    On,
    /// Sign in for this session only
    Off,
}

impl Toggle {
    pub const fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}

impl Cli {
    /// Applies command-line overrides on top of loaded configuration.
    pub fn apply(&self, config: &mut ClientConfig) {
        if let Some(hostname) = &self.hostname {
            config.hostname.clone_from(hostname);
        }
        if let Some(dir) = &self.storage_dir {
            config.storage_dir = Some(dir.clone());
        }
    }
}
