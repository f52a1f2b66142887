use std::path::PathBuf;

use advisor_scrape::fetch::HttpFetcher;
use advisor_scrape::pages::Pillar;
use advisor_scrape::pipeline::{resolve_output, BilingualJob};
use advisor_scrape::settings::Settings;
use anyhow::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "bilingual",
    about = "Pair English Azure Advisor recommendations with their Japanese titles"
)]
struct Cli {
    /// Advisor reference page to scrape
    #[arg(long, value_enum, default_value = "operational-excellence")]
    pillar: Pillar,
    /// Output file (default: <Pillar>.json in output_dir)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    advisor_scrape::init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    info!(settings = ?settings, "Starting bilingual scrape");

    let job = BilingualJob {
        pillar: cli.pillar,
        output: resolve_output(
            cli.output,
            &settings.output_dir,
            &cli.pillar.bilingual_file_name(),
        ),
    };

    let fetcher = HttpFetcher::new(&settings.user_agent)?;
    let summary = job.run(&fetcher)?;
    println!(
        "Saved {} services ({} recommendations) to {}",
        summary.rows,
        summary.records,
        summary.path.display()
    );
    Ok(())
}
