use anyhow::Context;
use clap::Parser;
use funda_smoke::driver::ChromeSuite;
use funda_smoke::report::Status;
use funda_smoke::scenarios::{run_and_close, Scenario};
use funda_smoke::{logging, SuiteConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "funda-smoke", about = "Smoke tests for the funda.nl listing site")]
struct Cli {
    /// Scenarios to run; all of them when omitted
    #[arg(value_enum)]
    scenarios: Vec<Scenario>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Landing page URL (overrides FUNDA_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Report directory (overrides FUNDA_REPORT_DIR)
    #[arg(long)]
    report_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    let mut config = SuiteConfig::from_env().context("Failed to load suite configuration")?;
    if cli.headed {
        config.headless = false;
    }
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }
    if let Some(dir) = cli.report_dir {
        config.report_dir = dir;
    }

    let scenarios = if cli.scenarios.is_empty() {
        Scenario::ALL.to_vec()
    } else {
        cli.scenarios
    };

    info!("🏠 Funda smoke suite");
    info!("Running {} scenario(s) against {}", scenarios.len(), config.base_url);

    let suite = ChromeSuite::launch(&config).context("Failed to start browser")?;

    let mut reports = Vec::new();
    for scenario in &scenarios {
        // Fresh context per scenario: no cookies or storage carry over
        let page = suite.new_page().context("Failed to open browser page")?;
        let report = run_and_close(*scenario, &page, &config).await;
        reports.push(report.with_context(|| format!("Failed to write report for {}", scenario))?);
    }

    suite.shutdown();

    println!();
    for report in &reports {
        let mark = if report.status == Status::Passed { "✅" } else { "❌" };
        println!("{} {}", mark, report.scenario);
        if let Some(error) = &report.error {
            println!("   {}", error);
        }
    }
    println!();

    let failed = reports.iter().filter(|r| r.status != Status::Passed).count();
    info!("💾 Reports written to {}", config.report_dir.display());

    if failed > 0 {
        anyhow::bail!("{} of {} scenario(s) failed", failed, reports.len());
    }
    Ok(())
}
