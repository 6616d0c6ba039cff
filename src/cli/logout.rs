//! Logout command implementation

use colored::Colorize;

use crate::cli::{CommandContext, GlobalOptions};
use crate::error::Result;

/// Clear stored tokens
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.client.logout().await?;
    println!("{} Signed out", "✓".green());
    Ok(())
}
