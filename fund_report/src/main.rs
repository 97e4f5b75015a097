// fund_report/src/main.rs

mod cli;

use anyhow::Context;
use tracing_subscriber::prelude::*;

use fund_report_core::data_handler::CsvDataHandler;
use fund_report_core::funds;
use fund_report_core::report;
use fund_report_core::settings::ReportSettings;

fn main() -> anyhow::Result<()> {
    let start_time = std::time::Instant::now();

    let args = cli::Args::parse();
    init_tracing(args.verbose);

    let mut settings = match &args.config {
        Some(path) => ReportSettings::load(path)?,
        None => ReportSettings::default(),
    };
    args.apply_overrides(&mut settings);
    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("Settings validation failed:\n{}", e))?;

    let data = CsvDataHandler::new(&settings.data_path);

    let failed = match &args.mode {
        cli::Mode::Funds(paths) => {
            let funds = paths
                .iter()
                .map(|path| {
                    funds::load_fund(path).with_context(|| format!("Failed to load fund '{}'", path.display()))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            tracing::info!(funds = funds.len(), benchmark = %settings.benchmark, "Generating report");

            if args.separate {
                let out_dir = std::path::Path::new(&settings.output_dir);
                let mut names = report::FileNames::default();
                let mut failed = Vec::new();
                for fund in &funds {
                    if let Err(e) = report::write_fund_report(fund, &mut names, &data, &settings, out_dir) {
                        tracing::error!(fund = %fund.name, error = %e, "Fund report failed");
                        failed.push(fund.name.clone());
                    }
                }
                failed
            } else {
                let summary = report::generate_report(&funds, &data, &settings)
                    .context("Failed to write report")?;
                summary.failed.into_iter().map(|(name, _)| name).collect()
            }
        }
        cli::Mode::Robust(path) => {
            let matrix = funds::load_matrix(path)
                .with_context(|| format!("Failed to load fund matrix '{}'", path.display()))?;

            tracing::info!(columns = matrix.funds.len(), benchmark = %settings.benchmark, "Generating robust report");
            report::generate_robust_report(&matrix, &data, &settings).context("Failed to write robust report")?;
            Vec::new()
        }
    };

    tracing::info!(elapsed_secs = start_time.elapsed().as_secs_f64(), "Finished");

    if !failed.is_empty() {
        anyhow::bail!("{} fund report(s) failed: {}", failed.len(), failed.join(", "));
    }

    anyhow::Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_filter(tracing_subscriber::filter::Targets::new().with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();
}
