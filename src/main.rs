use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, error, info};

use boxoffice_scraper::audit::{Auditor, CheckStatus};
use boxoffice_scraper::chart::{render_chart_file, ChartOptions};
use boxoffice_scraper::config::{Config, ConfigSource};
use boxoffice_scraper::constants;
use boxoffice_scraper::http::PageFetcher;
use boxoffice_scraper::logging;
use boxoffice_scraper::pipeline::{run_source, RunSummary};
use boxoffice_scraper::record::CsvRow;
use boxoffice_scraper::sources::{
    BoxOfficeSource, IndianFilmsSource, MojoMode, MojoSource, WorldGrossSource,
};

#[derive(Parser)]
#[command(name = "boxoffice_scraper")]
#[command(about = "Scrape, clean, audit and chart box-office tables")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to an optional TOML config file
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Directory for CSV and chart output (overrides config)
    #[arg(long, global = true)]
    output_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the Wikipedia worldwide highest-grossing films chart
    World,
    /// Scrape the Wikipedia highest-grossing Indian films list
    Indian,
    /// Scrape the Box Office Mojo worldwide lifetime gross chart
    Mojo {
        #[arg(long, value_enum, default_value_t = MojoPages::Single)]
        pages: MojoPages,
    },
    /// Audit a worldwide gross CSV for data-quality issues
    Audit {
        /// CSV to audit (defaults to the world scraper output)
        file: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render a bar chart from a CSV
    Chart {
        /// CSV to read (defaults to the world scraper output)
        file: Option<PathBuf>,
        #[arg(long, default_value = constants::COL_FILM_NAME)]
        label: String,
        #[arg(long, default_value = constants::COL_GROSS_USD)]
        value: String,
        /// Number of bars (overrides config)
        #[arg(long)]
        top: Option<usize>,
        /// SVG output path (overrides config)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the available sources
    Sources,
}

#[derive(Clone, Copy, ValueEnum)]
enum MojoPages {
    /// First page only, top 100
    Single,
    /// Several pages, top 500
    Multi,
}

async fn scrape<S: BoxOfficeSource>(
    source: S,
    fetcher: &PageFetcher,
    output_dir: &str,
) -> anyhow::Result<RunSummary<S::Record>> {
    println!("🎬 Scraping {}...", source.name());
    let summary = run_source(&source, fetcher, output_dir)
        .await
        .with_context(|| format!("{} scrape failed", source.name()))?;
    print_summary(&summary);
    Ok(summary)
}

fn print_summary<R: CsvRow>(summary: &RunSummary<R>) {
    println!("{}", "-".repeat(30));
    println!("✅ {}: scraped {} rows", summary.source, summary.rows());
    println!("📁 Saved to: {}", summary.output_file.display());
    println!("{}", "-".repeat(30));
    for line in summary.preview(5) {
        println!("   {}", line);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let (mut config, config_source) = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(dir) = cli.output_dir {
        config.output.dir = dir;
    }

    logging::init_logging(&config.output.log_dir);
    match &config_source {
        ConfigSource::File(path) => info!(path = %path.display(), "Loaded configuration"),
        ConfigSource::Defaults => {
            debug!(path = %cli.config.display(), "No config file, using defaults")
        }
    }
    info!(output_dir = %config.output.dir, "Starting");

    let result = run(cli.command, &config).await;
    if let Err(e) = &result {
        error!("{:#}", e);
        println!("❌ {:#}", e);
    }
    result
}

async fn run(command: Commands, config: &Config) -> anyhow::Result<()> {
    let output_dir = config.output.dir.as_str();

    match command {
        Commands::World => {
            let fetcher = PageFetcher::new(&config.http)?;
            scrape(WorldGrossSource::new(&config.world_gross), &fetcher, output_dir).await?;
        }
        Commands::Indian => {
            let fetcher = PageFetcher::new(&config.http)?;
            scrape(IndianFilmsSource::new(&config.indian_films), &fetcher, output_dir).await?;
        }
        Commands::Mojo { pages } => {
            let mode = match pages {
                MojoPages::Single => MojoMode::SinglePage,
                MojoPages::Multi => MojoMode::MultiPage,
            };
            let fetcher = PageFetcher::new(&config.http)?;
            scrape(MojoSource::new(&config.mojo, mode), &fetcher, output_dir).await?;
        }
        Commands::Audit { file, json } => {
            let path = file.unwrap_or_else(|| config.output_path(&config.world_gross.output_file));
            let report = Auditor::new(&config.audit).audit_file(&path)?;
            if json {
                println!("{}", report.to_json()?);
            } else {
                print!("{}", report.render_text());
            }
            if report.worst() == CheckStatus::Critical {
                bail!("audit of {} could not run", path.display());
            }
        }
        Commands::Chart {
            file,
            label,
            value,
            top,
            out,
        } => {
            let input = file.unwrap_or_else(|| config.output_path(&config.world_gross.output_file));
            let output = out.unwrap_or_else(|| config.output_path(&config.chart.output_file));
            let options = ChartOptions {
                label_column: label,
                value_column: value,
                top: top.unwrap_or(config.chart.top),
                ..ChartOptions::default()
            };
            let bars = render_chart_file(&input, &output, &options)?;
            println!("📈 Chart with {} bars saved to {}", bars, output.display());
        }
        Commands::Sources => {
            for name in constants::get_supported_sources() {
                println!("{}", name);
            }
        }
    }
    Ok(())
}
