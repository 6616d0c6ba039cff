//! Command execution context
//!
//! Loads configuration, opens the credential store and builds the API client
//! so individual commands stay small.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;

use crate::auth::FileTokenStore;
use crate::cli::GlobalOptions;
use crate::client::{ClientSettings, DeviceIdentity, PassClient};
use crate::config::Config;
use crate::error::Result;
use crate::state::AppState;

/// Context for command execution containing config, client, and runtime options.
pub struct CommandContext {
    /// Loaded configuration (device id guaranteed)
    pub config: Config,
    /// Resolved config file location
    pub config_path: PathBuf,
    /// API client wired to the file token store
    pub client: PassClient,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// The config file (and its device id) is created on first use.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_or_init_at(opts.config_ref())?;
        let config_path = Config::resolve_path(opts.config_ref())?;

        let store = Arc::new(FileTokenStore::new(Config::credentials_path(&config_path)));

        let settings = ClientSettings {
            base_url: config.api_host(opts.api_host_ref()),
            identity: DeviceIdentity {
                device_id: config.require_device_id()?.to_string(),
                app_version: config.app_version(),
            },
            timeout: Duration::from_secs(config.timeout_secs),
        };
        log::debug!("Using API host {}", settings.base_url);

        let client = PassClient::new(settings, store, AppState::new())?;

        Ok(Self {
            config,
            config_path,
            client,
        })
    }

    /// Print notices raised on the application state during the command
    pub fn report_state(&self) {
        let state = self.client.state();
        if state.must_update() {
            eprintln!(
                "{} This version of passctl is no longer supported by the backend. Please upgrade.",
                "⚠".yellow()
            );
        }
        if state.login_required() {
            eprintln!(
                "{} Session expired or missing. Run {} to log in.",
                "→".cyan(),
                "passctl signin".cyan()
            );
        }
    }
}
