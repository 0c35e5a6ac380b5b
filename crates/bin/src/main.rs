//! Darwin CLI binary.
//!
//! Builds point-in-time credit-rating panels from snapshot directories and
//! reports on coverage and panel statistics.

mod integration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use darwin_output::{COVERAGE_FILE_NAME, ExportFormat, PanelSummary, write_coverage_report, write_panel};
use indicatif::{ProgressBar, ProgressStyle};
use integration::cache_manager::{clear_cache, print_cache_info};
use integration::pipeline::{BuildConfigFile, BuildOptions, build_panel, coverage_records};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "darwin")]
#[command(about = "Darwin: point-in-time credit-rating panels", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the statement/rating panel from a snapshot directory
    Build {
        /// Directory holding the four snapshot CSVs
        snapshot_dir: PathBuf,

        /// Output file path
        #[arg(long, default_value = "panel.csv")]
        output: PathBuf,

        /// Output format (csv or parquet)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Sector to exclude from the published panel (repeatable)
        #[arg(long = "exclude-sector")]
        exclude_sectors: Vec<String>,

        /// Drop rows closer than this many days to their issuer's default
        #[arg(long)]
        min_days_to_default: Option<i64>,

        /// Discard rating events dated before this date
        #[arg(long)]
        min_rating_date: Option<NaiveDate>,

        /// JSON config file mirroring the build flags
        #[arg(long)]
        config: Option<PathBuf>,

        /// Disable the reference cache (always fetch fresh data)
        #[arg(long)]
        no_cache: bool,

        /// Force refresh cached reference tables
        #[arg(long)]
        refresh: bool,
    },

    /// Report rated issuers with no financial statements
    Coverage {
        /// Directory holding the four snapshot CSVs
        snapshot_dir: PathBuf,

        /// Output file path
        #[arg(long, default_value = COVERAGE_FILE_NAME)]
        output: PathBuf,
    },

    /// Build the panel and print descriptive statistics
    Summary {
        /// Directory holding the four snapshot CSVs
        snapshot_dir: PathBuf,

        /// Emit JSON instead of the text table
        #[arg(long)]
        json: bool,

        /// Disable the reference cache (always fetch fresh data)
        #[arg(long)]
        no_cache: bool,

        /// Force refresh cached reference tables
        #[arg(long)]
        refresh: bool,
    },

    /// Inspect or clear the reference cache
    Cache {
        /// Show cache location and contents
        #[arg(long)]
        info: bool,

        /// Remove all cached payloads
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            snapshot_dir,
            output,
            format,
            exclude_sectors,
            min_days_to_default,
            min_rating_date,
            config,
            no_cache,
            refresh,
        } => {
            let format: ExportFormat = format.parse()?;
            let mut options = BuildOptions::new(snapshot_dir);
            options.exclude_sectors = exclude_sectors;
            options.min_days_to_default = min_days_to_default;
            options.min_rating_date = min_rating_date;
            options.use_cache = !no_cache;
            options.force_refresh = refresh;

            if let Some(path) = config {
                BuildConfigFile::load(&path)?.apply(&mut options);
            }

            build_command(options, &output, format).await?;
        }
        Commands::Coverage {
            snapshot_dir,
            output,
        } => {
            let records = coverage_records(&snapshot_dir)?;
            write_coverage_report(&records, &output)?;
            println!(
                "{} rated issuers without statements, written to {}",
                records.len(),
                output.display()
            );
        }
        Commands::Summary {
            snapshot_dir,
            json,
            no_cache,
            refresh,
        } => {
            let mut options = BuildOptions::new(snapshot_dir);
            options.use_cache = !no_cache;
            options.force_refresh = refresh;

            let panel = build_panel(&options, None).await?;
            let summary = PanelSummary::from_panel(&panel)?;
            if json {
                println!("{}", summary.to_json()?);
            } else {
                print!("{}", summary.to_ascii_table());
            }
        }
        Commands::Cache { info, clear } => {
            if clear {
                clear_cache()?;
            }
            if info || !clear {
                print_cache_info()?;
            }
        }
    }

    Ok(())
}

async fn build_command(
    options: BuildOptions,
    output: &std::path::Path,
    format: ExportFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(5);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template")
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut panel = match build_panel(&options, Some(&pb)).await {
        Ok(panel) => {
            pb.finish_with_message(format!("Built {} panel rows", panel.height()));
            panel
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    write_panel(&mut panel, output, format)?;
    println!("Panel written to {}", output.display());

    let summary = PanelSummary::from_panel(&panel)?;
    print!("{}", summary.to_ascii_table());

    Ok(())
}
