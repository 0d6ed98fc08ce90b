//! Credential check.

use kc_reaper::{AdminApi, ReaperConfig, TokenManager};

use crate::cli::OutputFormat;
use crate::output::success;

/// Obtains an access token to confirm the credentials and server settings.
pub async fn run_check(config: &ReaperConfig, format: OutputFormat) -> crate::CliResult<()> {
    let auth = config
        .auth
        .clone()
        .ok_or_else(|| crate::CliError::Config("client credentials are required".to_string()))?;
    let api = AdminApi::new(config).map_err(|e| crate::CliError::Config(e.to_string()))?;
    let token_url = api.token_url();

    let mut tokens = TokenManager::new(api, auth);
    let token = tokens
        .valid_token()
        .await
        .map_err(|e| crate::CliError::Auth(e.to_string()))?;

    match format {
        OutputFormat::Table => success(&format!(
            "Token issued by {} (expires at {})",
            token_url,
            token.expires_at().to_rfc3339()
        )),
        OutputFormat::Json => {
            let value = serde_json::json!({
                "token_url": token_url,
                "expires_at": token.expires_at(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}
