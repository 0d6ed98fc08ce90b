//! Resolution of the effective configuration from file and flags.

use kc_reaper::{AuthConfig, ReaperConfig};

use crate::cli::Cli;

/// Loads the configuration file and applies command-line overrides.
pub fn resolve(cli: &Cli) -> crate::CliResult<ReaperConfig> {
    let config = ReaperConfig::load(cli.config.as_deref())?;
    let config = apply_overrides(config, cli);
    config.validate()?;
    Ok(config)
}

/// Applies command-line values on top of file values.
pub fn apply_overrides(mut config: ReaperConfig, cli: &Cli) -> ReaperConfig {
    if let Some(server) = &cli.server {
        config.server_url = server.clone();
    }
    if let Some(realm) = &cli.realm {
        config.realm = realm.clone();
    }
    if let Some(auth_realm) = &cli.auth_realm {
        config.auth_realm = auth_realm.clone();
    }
    if cli.dry_run {
        config.dry_run = true;
    }

    let (file_id, file_secret) = match config.auth.take() {
        Some(auth) => (Some(auth.client_id), Some(auth.client_secret)),
        None => (None, None),
    };
    let client_id = cli.client_id.clone().or(file_id);
    let client_secret = cli.client_secret.clone().or(file_secret);
    if let (Some(client_id), Some(client_secret)) = (client_id, client_secret) {
        config.auth = Some(AuthConfig {
            client_id,
            client_secret,
        });
    }

    config
}
