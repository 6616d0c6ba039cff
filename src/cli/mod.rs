//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

pub mod api;
pub mod args;
pub mod context;
pub mod logout;
pub mod signin;
pub mod status;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// passctl - command-line companion for the pass Culture native API
#[derive(Parser, Debug)]
#[command(name = "passctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, json)
    #[arg(
        long,
        global = true,
        env = "PASSCTL_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "PASSCTL_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override the API host
    #[arg(long, global = true, env = "PASSCTL_API_HOST", hide_env = true)]
    pub api_host: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "PASSCTL_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store credentials
    Signin {
        /// Account email (prompted if omitted)
        #[arg(long, env = "PASSCTL_EMAIL", hide_env = true)]
        email: Option<String>,

        /// Account password (prompted if omitted)
        #[arg(long, env = "PASSCTL_PASSWORD", hide_env = true, hide = true)]
        password: Option<String>,
    },

    /// Show configuration and credential status
    Status,

    /// Show the signed-in user's profile
    Me,

    /// Show public backend settings
    Settings,

    /// Send an authenticated request to the API
    Request {
        /// HTTP method (GET, POST, PATCH, ...)
        method: String,

        /// Path relative to the API host, e.g. /native/v1/bookings
        path: String,

        /// JSON request body
        #[arg(long)]
        data: Option<String>,
    },

    /// Forget stored credentials
    Logout,

    /// Display version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_command() {
        let cli = Cli::try_parse_from([
            "passctl",
            "request",
            "POST",
            "/native/v1/bookings",
            "--data",
            r#"{"stockId":1}"#,
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Request { method, path, data } => {
                assert_eq!(method, "POST");
                assert_eq!(path, "/native/v1/bookings");
                assert_eq!(data.as_deref(), Some(r#"{"stockId":1}"#));
            }
            other => panic!("Expected Request, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
