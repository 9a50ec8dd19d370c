//! # Prefab Estimator CLI
//!
//! Runs material estimates from JSON files.
//!
//! ```text
//! prefab seed --output catalog.json
//! prefab materials --catalog catalog.json
//! prefab estimate --house house.json --catalog catalog.json --output report.json
//! ```
//!
//! Without `--catalog` the built-in sample catalog is used, priced today.

mod report;

use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use prefab_core::catalog::{seed_catalog, InMemoryCatalog};
use prefab_core::estimate::{estimate, EstimatorSettings};
use prefab_core::file_io::{load_catalog, load_house, load_settings, save_catalog, save_report};
use prefab_core::report::EstimateReport;

const DEFAULT_LOG_FILTER: &str = "prefab_core=info,prefab_cli=info";
const VERBOSE_LOG_FILTER: &str = "prefab_core=debug,prefab_cli=debug";

#[derive(Parser)]
#[command(name = "prefab")]
#[command(about = "Estimate materials and cost for prefabricated houses", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate materials and cost for a house description
    Estimate {
        /// House description (JSON)
        #[arg(long)]
        house: PathBuf,

        /// Catalog snapshot (JSON); defaults to the sample catalog
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Estimator settings (JSON); missing fields use defaults
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Print the estimate as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Also save the run (house, settings, estimate) as a report file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Name recorded in the saved report
        #[arg(long, default_value = "")]
        prepared_by: String,
    },

    /// List covering options and current prices
    Materials {
        /// Catalog snapshot (JSON); defaults to the sample catalog
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Write the sample catalog as a snapshot file
    Seed {
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Estimate {
            house,
            catalog,
            settings,
            json,
            output,
            prepared_by,
        } => run_estimate(EstimateArgs {
            house,
            catalog,
            settings,
            json,
            output,
            prepared_by,
        }),
        Commands::Materials { catalog } => run_materials(catalog),
        Commands::Seed { output } => run_seed(output),
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            VERBOSE_LOG_FILTER.into()
        } else {
            DEFAULT_LOG_FILTER.into()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}

fn open_catalog(path: Option<PathBuf>) -> anyhow::Result<InMemoryCatalog> {
    match path {
        Some(path) => {
            load_catalog(&path).with_context(|| format!("loading catalog {}", path.display()))
        }
        None => {
            info!("no catalog given, using the sample catalog");
            Ok(seed_catalog(Local::now().date_naive())?)
        }
    }
}

struct EstimateArgs {
    house: PathBuf,
    catalog: Option<PathBuf>,
    settings: Option<PathBuf>,
    json: bool,
    output: Option<PathBuf>,
    prepared_by: String,
}

fn run_estimate(args: EstimateArgs) -> anyhow::Result<()> {
    let house = load_house(&args.house)
        .with_context(|| format!("loading house {}", args.house.display()))?;
    let catalog = open_catalog(args.catalog)?;
    let settings = match &args.settings {
        Some(path) => load_settings(path)
            .with_context(|| format!("loading settings {}", path.display()))?,
        None => EstimatorSettings::default(),
    };

    let result = estimate(&house, &catalog, &settings)
        .with_context(|| format!("estimating {}", args.house.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", report::render_estimate(&house, &result));
    }

    if let Some(path) = args.output {
        let saved = EstimateReport::new(house, settings, result).with_prepared_by(args.prepared_by);
        save_report(&saved, &path).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), id = %saved.meta.id, "estimate report saved");
    }

    Ok(())
}

fn run_materials(catalog: Option<PathBuf>) -> anyhow::Result<()> {
    let catalog = open_catalog(catalog)?;
    print!("{}", report::render_materials(&catalog));
    Ok(())
}

fn run_seed(output: PathBuf) -> anyhow::Result<()> {
    let catalog = seed_catalog(Local::now().date_naive())?;
    save_catalog(&catalog, &output).with_context(|| format!("writing {}", output.display()))?;
    info!(path = %output.display(), materials = catalog.material_count(), "sample catalog written");
    Ok(())
}
