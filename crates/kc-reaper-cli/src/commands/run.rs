//! Reconciliation pass.

use kc_reaper::{ReaperConfig, Reconciler};

use crate::cli::OutputFormat;
use crate::output::output_summary;

/// Runs one reconciliation pass and prints its summary.
///
/// Failures inside the pass are logged and counted; only setup errors are
/// returned.
pub async fn run_reconcile(config: &ReaperConfig, format: OutputFormat) -> crate::CliResult<()> {
    let mut reconciler = Reconciler::new(config)?;

    tracing::info!(
        server = %config.server_url,
        realm = %config.realm,
        dry_run = config.dry_run,
        "Starting session reconciliation"
    );

    let summary = reconciler.run().await;
    output_summary(&summary, format)
}
