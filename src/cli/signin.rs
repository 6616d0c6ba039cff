//! Signin command implementation

use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};

use crate::cli::{CommandContext, GlobalOptions};
use crate::error::Result;

/// Run the signin command, prompting for missing credentials
pub async fn run(
    opts: &GlobalOptions,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let email = match email {
        Some(email) => email,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Email")
            .interact_text()?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()?,
    };

    println!("{}", "Signing in...".cyan());
    let result = ctx.client.signin(&email, &password).await;
    ctx.report_state();
    result?;

    println!("{} Signed in as {}", "✓".green(), email.bold());
    println!(
        "  Credentials saved to: {}",
        crate::config::Config::credentials_path(&ctx.config_path).display()
    );

    Ok(())
}
