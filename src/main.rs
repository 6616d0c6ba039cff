//! passctl - command-line companion for the pass Culture native API

use clap::Parser;

mod auth;
mod cli;
mod client;
mod config;
mod error;
mod output;
mod state;

use cli::{Cli, Commands, GlobalOptions};
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Signin { email, password } => cli::signin::run(&opts, email, password).await,
        Commands::Status => cli::status::run(&opts).await,
        Commands::Me => cli::api::me(&opts).await,
        Commands::Settings => cli::api::settings(&opts).await,
        Commands::Request { method, path, data } => {
            cli::api::request(&opts, &method, &path, data.as_deref()).await
        }
        Commands::Logout => cli::logout::run(&opts).await,
        Commands::Version => {
            println!("passctl version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
