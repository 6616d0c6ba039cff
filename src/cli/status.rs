//! Status command implementation

use colored::Colorize;

use crate::auth::{TokenKey, decode_access_token};
use crate::cli::{CommandContext, GlobalOptions};
use crate::error::Result;

/// Run the status command to display configuration and credential status
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    println!("{}\n", "passctl Status".bold());
    println!("Config file: {}", ctx.config_path.display().to_string().cyan());
    println!("API host: {}", ctx.config.api_host(opts.api_host_ref()).cyan());
    println!("Device id: {}", ctx.config.require_device_id()?);
    println!("App version: {}", ctx.config.app_version());
    println!();

    let store = ctx.client.store();

    match store.read(TokenKey::AccessToken).await? {
        None => println!("{} Not signed in", "✗".red()),
        Some(token) => match decode_access_token(&token) {
            None => println!("{} Stored access token is unreadable", "✗".red()),
            Some(claims) if claims.is_expired() => println!(
                "{} Access token expired (will refresh on next call)",
                "⚠".yellow()
            ),
            Some(claims) => {
                let remaining = claims
                    .expires_at()
                    .map(|at| at.signed_duration_since(chrono::Utc::now()))
                    .unwrap_or_default();
                println!(
                    "{} Access token valid (expires in {}h {}m)",
                    "✓".green(),
                    remaining.num_hours(),
                    remaining.num_minutes() % 60
                );
                if let Some(user_id) = claims.user_id {
                    println!("  User id: {}", user_id);
                }
            }
        },
    }

    if store.read(TokenKey::RefreshToken).await?.is_some() {
        println!("{} Refresh token stored", "✓".green());
    } else {
        println!("{} No refresh token", "○".dimmed());
        println!("  → Run 'passctl signin' to log in");
    }

    println!();
    Ok(())
}
