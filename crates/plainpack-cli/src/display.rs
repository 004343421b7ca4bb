//! Styled terminal output helpers
//!
//! Status and warnings go to stderr so stdout stays parseable YAML when no
//! output directory is given.

use console::style;
use plainpack_convert::RunSummary;

pub fn print_run_summary(summary: &RunSummary, warnings: &[String]) {
    eprintln!();

    for (kind, count) in &summary.converted {
        eprintln!(
            "  {} {} {} manifest{} converted",
            style("✓").green().bold(),
            count,
            style(kind).cyan(),
            plural(*count)
        );
    }

    let produced = summary.produced.len();
    eprintln!(
        "  {} {} synthetic ConfigMap{} produced",
        style("✓").green().bold(),
        produced,
        plural(produced)
    );

    if !summary.passthrough.is_empty() {
        eprintln!(
            "  {} {} manifest{} passed through unchanged",
            style("→").blue(),
            summary.passthrough.len(),
            plural(summary.passthrough.len())
        );
    }

    if !warnings.is_empty() {
        eprintln!();
        eprintln!("  {}", style("Warnings").bold().yellow());
        eprintln!("  {}", style("────────").dim());
        for warning in warnings {
            eprintln!("  {} {}", style("⚠").yellow(), warning);
        }
    }

    eprintln!();
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
