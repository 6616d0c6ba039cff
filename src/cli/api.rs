//! Commands that call the API through the fetch wrapper

use reqwest::Method;

use crate::cli::{CommandContext, GlobalOptions};
use crate::client::{extract_api_error_message, is_api_error};
use crate::error::{Error, Result};
use crate::output;

/// Show the signed-in user's profile
pub async fn me(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let result = ctx.client.me().await;
    finish(&ctx, opts, result)
}

/// Show public backend settings
pub async fn settings(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let result = ctx.client.settings().await;
    finish(&ctx, opts, result)
}

/// Send an arbitrary authenticated request
pub async fn request(
    opts: &GlobalOptions,
    method: &str,
    path: &str,
    data: Option<&str>,
) -> Result<()> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| Error::Other(format!("Invalid HTTP method: {}", method)))?;
    let body = data
        .map(serde_json::from_str::<serde_json::Value>)
        .transpose()?;

    let ctx = CommandContext::new(opts)?;
    let result = ctx.client.call(method, path, body).await;
    finish(&ctx, opts, result)
}

fn finish(ctx: &CommandContext, opts: &GlobalOptions, result: Result<serde_json::Value>) -> Result<()> {
    ctx.report_state();

    match result {
        Ok(value) => output::print_value(&value, opts.format),
        Err(err) if is_api_error(&err) => {
            eprintln!("{}", extract_api_error_message(&err));
            Err(err)
        }
        Err(err) => Err(err),
    }
}
