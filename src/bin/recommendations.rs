use std::path::PathBuf;

use advisor_scrape::fetch::HttpFetcher;
use advisor_scrape::pages::Pillar;
use advisor_scrape::parser::MissingCategory;
use advisor_scrape::pipeline::{resolve_output, FlatJob};
use advisor_scrape::settings::Settings;
use anyhow::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "recommendations",
    about = "Extract Azure Advisor recommendations (impact, resource type, ID) to JSON"
)]
struct Cli {
    /// Advisor reference page to scrape
    #[arg(long, value_enum, default_value = "reliability")]
    pillar: Pillar,
    /// Output file (default: azure_advisor_<pillar>_recommendations.json in output_dir)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Records appearing before the first category heading
    #[arg(long, value_enum)]
    on_missing_category: Option<MissingCategory>,
}

fn main() -> Result<()> {
    advisor_scrape::init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    info!(settings = ?settings, "Starting recommendation scrape");

    let job = FlatJob {
        pillar: cli.pillar,
        on_missing_category: cli
            .on_missing_category
            .or(settings.on_missing_category)
            .unwrap_or_default(),
        output: resolve_output(cli.output, &settings.output_dir, &cli.pillar.flat_file_name()),
    };

    let fetcher = HttpFetcher::new(&settings.user_agent)?;
    let summary = job.run(&fetcher)?;
    println!(
        "JSON file successfully saved as {} ({} recommendations)",
        summary.path.display(),
        summary.records
    );
    Ok(())
}
