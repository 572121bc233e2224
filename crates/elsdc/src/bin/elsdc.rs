//! Command-line front end: re-export stored detection results.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use elsdc::core::{ResultSet, ResultSetIoError};
use elsdc::export::{export_all, ConfigError, ExportConfig, ExportError};
use elsdc::Summary;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("failed to load results from {path}: {source}")]
    Results {
        path: PathBuf,
        source: ResultSetIoError,
    },
    #[error("failed to load config from {path}: {source}")]
    Config { path: PathBuf, source: ConfigError },
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Parser)]
#[command(name = "elsdc")]
#[command(about = "Export ELSDc detection results as ASCII records, SVG and label images")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the output files for a stored result set.
    Export {
        /// Result set saved as JSON.
        #[arg(long)]
        results: PathBuf,

        /// Export config (JSON). Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory for the outputs. Defaults to the results file's directory.
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Also write the polygon record file.
        #[arg(long)]
        polygons: bool,

        /// Also write the label image as a 16-bit PNG.
        #[arg(long)]
        labels_png: bool,
    },
    /// Print counts for a stored result set as JSON.
    Summary {
        #[arg(long)]
        results: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    #[cfg(feature = "tracing")]
    {
        let _ = verbose;
        elsdc::core::init_tracing(false);
        let _ = tracing_log::LogTracer::init();
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = elsdc::core::init_with_level(elsdc::core::level_from_verbosity(verbose));
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Export {
            results,
            config,
            out_dir,
            polygons,
            labels_png,
        } => run_export(&results, config.as_deref(), out_dir.as_deref(), polygons, labels_png),
        Commands::Summary { results } => {
            let rs = load_results(&results)?;
            println!("{}", serde_json::to_string_pretty(&Summary::of(&rs))?);
            rs.release();
            Ok(())
        }
    }
}

fn load_results(path: &Path) -> Result<ResultSet, CliError> {
    ResultSet::load_json(path).map_err(|source| CliError::Results {
        path: path.to_path_buf(),
        source,
    })
}

fn run_export(
    results_path: &Path,
    config_path: Option<&Path>,
    out_dir: Option<&Path>,
    polygons: bool,
    labels_png: bool,
) -> Result<(), CliError> {
    let mut config = match config_path {
        Some(path) => ExportConfig::load_json(path).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })?,
        None => ExportConfig::default(),
    };
    config.write_polygons |= polygons;
    config.write_label_image |= labels_png;

    let source = match (out_dir, results_path.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => results_path.to_path_buf(),
    };
    let paths = config.resolve_paths(&source);

    let results = load_results(results_path)?;
    log::info!(
        "loaded {} ellipses and {} polygons ({}x{})",
        results.ell_count(),
        results.poly_count(),
        results.width(),
        results.height()
    );
    let report = export_all(&results, &paths, &config)?;
    results.release();

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
