//! Output formatting utilities.

use colored::Colorize;
use kc_reaper::ReconcileSummary;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::OutputFormat;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// One line of the summary table.
#[derive(Debug, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Count")]
    count: usize,
}

fn summary_rows(summary: &ReconcileSummary) -> Vec<SummaryRow> {
    vec![
        SummaryRow {
            metric: "Users scanned",
            count: summary.users_scanned,
        },
        SummaryRow {
            metric: "Sessions inspected",
            count: summary.sessions_inspected,
        },
        SummaryRow {
            metric: "Orphaned sessions",
            count: summary.orphans_found,
        },
        SummaryRow {
            metric: "Sessions deleted",
            count: summary.sessions_deleted,
        },
        SummaryRow {
            metric: "Deletions failed",
            count: summary.deletions_failed,
        },
        SummaryRow {
            metric: "Deletions skipped",
            count: summary.deletions_skipped,
        },
    ]
}

/// Renders a pass summary, or `None` when nothing should be printed.
pub fn render_summary(
    summary: &ReconcileSummary,
    format: OutputFormat,
) -> crate::CliResult<Option<String>> {
    match format {
        OutputFormat::Table => {
            let table = Table::new(summary_rows(summary))
                .with(Style::rounded())
                .to_string();
            Ok(Some(table))
        }
        OutputFormat::Json => Ok(Some(serde_json::to_string_pretty(summary)?)),
        OutputFormat::Quiet => Ok(None),
    }
}

/// Prints a pass summary in the requested format.
pub fn output_summary(summary: &ReconcileSummary, format: OutputFormat) -> crate::CliResult<()> {
    if let Some(rendered) = render_summary(summary, format)? {
        println!("{rendered}");
    }
    if format == OutputFormat::Table && summary.deletions_failed > 0 {
        warning(&format!(
            "{} session(s) could not be deleted, see log for details",
            summary.deletions_failed
        ));
    }
    Ok(())
}
