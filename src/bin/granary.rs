use anyhow::Result;
use clap::Parser;
use granary::config::ReportConfig;
use granary::report;

/// Renders the static HTML status report for one build-farm run.
///
/// All paths and the participating-node list come from `GRANARY_*`
/// environment variables; the flags only select layout and raw-result
/// mirroring.
#[derive(Parser)]
#[command(name = "granary", version, about = "Build farm HTML status report generator")]
struct Cli {
    /// Emit the compact global page (index.html) instead of the full
    /// long-report.html
    #[arg(long)]
    simple_layout: bool,

    /// Disable the A-Z dispatch on the global page (accepted for
    /// compatibility with older drivers; currently ignored)
    #[arg(long)]
    no_alphabet_dispatch: bool,

    /// Do not mirror raw logs and summaries next to the generated pages
    #[arg(long)]
    no_raw_results: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ReportConfig::from_env(
        cli.simple_layout,
        cli.no_alphabet_dispatch,
        cli.no_raw_results,
    )?;
    report::run(&config)?;
    Ok(())
}
