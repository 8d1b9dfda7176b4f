//! course-catalog CLI
//!
//! Batch jobs that harvest the remote catalog into snapshot files, plus
//! commands to inspect what the stores would serve.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use course_catalog::{
    error::Result,
    models::{Config, TermKey},
    pipeline,
    services::Harvester,
    storage::{LocalStorage, SnapshotLayout},
    store::Storage,
};

/// Course catalog harvester and snapshot store
#[derive(Parser, Debug)]
#[command(
    name = "course-catalog",
    version,
    about = "Harvest a course catalog into sorted JSON snapshots"
)]
struct Cli {
    /// Data directory holding config.toml and the snapshots
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Harvest section details and write one snapshot per term
    Harvest {
        /// Term code to harvest, repeatable (default: every configured term)
        #[arg(long = "term")]
        terms: Vec<String>,
    },

    /// Harvest course outlines across the configured terms
    Outlines,

    /// Fold term snapshots into outline offerings
    Sync,

    /// Rebuild the instructor index from the outlines
    Instructors,

    /// Run full pipeline: Harvest → Outlines → Sync → Instructors
    Pipeline {
        /// Keep the existing outlines.json instead of harvesting outlines
        #[arg(long)]
        skip_outlines: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Print one course from the stores as JSON
    Show {
        dept: String,
        number: String,

        /// Term code; without it the catalog-wide outline is shown
        #[arg(long)]
        term: Option<String>,
    },

    /// Show which snapshot files exist
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Validated configuration and the terms it names.
fn load_config(layout: &SnapshotLayout) -> Result<(Config, Vec<TermKey>)> {
    let config = Config::load_or_default(layout.config_path());
    config.validate()?;
    let terms = config.term_keys()?;
    log::info!(
        "Loaded configuration for {} terms from {}",
        terms.len(),
        layout.root().display()
    );
    Ok((config, terms))
}

fn parse_terms(codes: &[String]) -> Result<Vec<TermKey>> {
    codes.iter().map(|code| code.parse()).collect()
}

fn describe_file(label: &str, path: &Path) {
    match std::fs::metadata(path) {
        Ok(meta) => log::info!("{label}: {} ({} bytes)", path.display(), meta.len()),
        Err(_) => log::info!("{label}: {} (not found)", path.display()),
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let layout = SnapshotLayout::new(&cli.data_dir);
    let storage = LocalStorage::new(&cli.data_dir);

    match cli.command {
        Command::Harvest { terms } => {
            let (config, configured) = load_config(&layout)?;
            let terms = if terms.is_empty() {
                configured
            } else {
                parse_terms(&terms)?
            };
            let harvester = Harvester::remote(&config.harvester)?;
            pipeline::run_harvest(&harvester, &storage, &terms).await?;
        }

        Command::Outlines => {
            let (config, terms) = load_config(&layout)?;
            let harvester = Harvester::remote(&config.harvester)?;
            pipeline::run_fetch_outlines(&harvester, &storage, &terms).await?;
        }

        Command::Sync => {
            let (_, terms) = load_config(&layout)?;
            pipeline::run_sync_offerings(&storage, &terms).await?;
        }

        Command::Instructors => {
            pipeline::run_build_instructors(&storage).await?;
        }

        Command::Pipeline { skip_outlines } => {
            let (config, terms) = load_config(&layout)?;
            let harvester = Harvester::remote(&config.harvester)?;
            pipeline::run_pipeline(&harvester, &storage, &terms, skip_outlines).await?;
        }

        Command::Validate => {
            pipeline::run_validate(&layout.config_path())?;
        }

        Command::Show { dept, number, term } => {
            let (config, terms) = load_config(&layout)?;
            let stores = Storage::open(&layout, &config.store, &terms)?;

            let json = match term {
                Some(code) => {
                    let term: TermKey = code.parse()?;
                    let course = stores.sections.get_by_term_and_dept_and_number(
                        term.year(),
                        term.season().as_str(),
                        &dept,
                        &number,
                    )?;
                    serde_json::to_string_pretty(&course)?
                }
                None => {
                    let outline = stores.outlines.get_by_dept_and_number(&dept, &number)?;
                    serde_json::to_string_pretty(&outline)?
                }
            };
            println!("{json}");
        }

        Command::Info => {
            log::info!("Data directory: {}", layout.root().display());
            describe_file("Config", &layout.config_path());
            describe_file("Outlines", &layout.outlines_path());
            describe_file("Instructors", &layout.instructors_path());

            let config = Config::load_or_default(layout.config_path());
            for term in config.term_keys()? {
                describe_file(&format!("Sections {term}"), &layout.sections_path(&term));
            }
        }
    }

    Ok(())
}
