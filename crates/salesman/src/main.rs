//! salesman: solve and generate Euclidean travelling-salesman instances.
//!
//! - `salesman solve <POINTS_FILE>` reads `x y` pairs, builds a closed
//!   tour, and prints its length and order. Optionally renders the tour
//!   as SVG and/or PNG and prints per-stage diagnostics.
//! - `salesman generate --output BASENAME` draws a random instance and
//!   writes `BASENAME.txt` (the points) and `BASENAME.svg` (a preview of
//!   the complete graph).
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin salesman -- solve cities.txt --svg tour.svg
//! cargo run --release --bin salesman -- generate --count 20 --seed 7 --output cities
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod error;
mod logging;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand, ValueEnum};
use salesman_export::SvgMetadata;
use salesman_pipeline::diagnostics::{Clock, PipelineDiagnostics};
use salesman_pipeline::{GeneratorConfig, PipelineConfig, Point, SolverKind, TourResult};
use serde::Serialize;

use crate::error::CliError;
use crate::logging::LogLevel;

/// Euclidean travelling-salesman tours with an MST-and-matching heuristic.
#[derive(Parser)]
#[command(name = "salesman", version)]
struct Cli {
    /// Log verbosity (`RUST_LOG` overrides).
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a tour through the points in a file.
    Solve(SolveArgs),
    /// Write a random instance and its preview.
    Generate(GenerateArgs),
}

#[derive(Args)]
struct SolveArgs {
    /// Path to the points file (`x y` pairs separated by whitespace).
    points_file: PathBuf,

    /// Tour construction strategy.
    #[arg(long, value_enum, default_value_t = CLI_DEFAULT_SOLVER)]
    solver: Solver,

    /// Largest instance the exhaustive solver accepts.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_MAX_EXHAUSTIVE_CITIES)]
    max_exhaustive_cities: usize,

    /// Full pipeline config as a JSON string.
    ///
    /// When provided, `--solver` and `--max-exhaustive-cities` are
    /// ignored. The JSON must be a valid `PipelineConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,

    /// Side length of the square the points were drawn from; sets the
    /// drawing scale. Defaults to the largest coordinate.
    #[arg(long)]
    grid_size: Option<f64>,

    /// Write the tour as SVG to this file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write the tour as PNG to this file.
    #[arg(long)]
    png: Option<PathBuf>,

    /// Print the result as JSON instead of the text report.
    #[arg(long)]
    json: bool,

    /// Print per-stage timing diagnostics to stderr.
    #[arg(long)]
    diagnostics: bool,
}

#[derive(Args)]
struct GenerateArgs {
    /// Number of cities.
    #[arg(long, default_value_t = GeneratorConfig::DEFAULT_COUNT)]
    count: usize,

    /// Side length of the square cities are drawn from.
    #[arg(long, default_value_t = GeneratorConfig::DEFAULT_GRID_SIZE)]
    grid_size: f64,

    /// RNG seed; the same seed always yields the same instance.
    #[arg(long, default_value_t = GeneratorConfig::DEFAULT_SEED)]
    seed: u64,

    /// Full generator config as a JSON string.
    ///
    /// When provided, `--count`, `--grid-size` and `--seed` are ignored.
    #[arg(long)]
    config_json: Option<String>,

    /// Output base name; `.txt` and `.svg` are appended.
    #[arg(long)]
    output: PathBuf,
}

/// Tour construction strategy selection.
#[derive(Clone, Copy, ValueEnum)]
enum Solver {
    /// Minimum spanning tree, greedy matching, Eulerian circuit, shortcut.
    Christofides,
    /// Always move to the closest unvisited city.
    NearestNeighbor,
    /// Optimal tour by enumerating every ordering (small instances only).
    Exhaustive,
}

/// Maps a [`SolverKind`] to the local CLI [`Solver`] enum.
const fn solver_from_pipeline(kind: SolverKind) -> Solver {
    match kind {
        SolverKind::Christofides => Solver::Christofides,
        SolverKind::NearestNeighbor => Solver::NearestNeighbor,
        SolverKind::Exhaustive => Solver::Exhaustive,
    }
}

/// The CLI default solver, derived from [`PipelineConfig::DEFAULT_SOLVER`]
/// so the two cannot silently diverge.
const CLI_DEFAULT_SOLVER: Solver = solver_from_pipeline(PipelineConfig::DEFAULT_SOLVER);

/// Build a [`PipelineConfig`] from `solve` arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual flags are ignored.
fn pipeline_config(args: &SolveArgs) -> Result<PipelineConfig, CliError> {
    if let Some(ref json) = args.config_json {
        return serde_json::from_str(json).map_err(CliError::ConfigJson);
    }

    Ok(PipelineConfig {
        solver: match args.solver {
            Solver::Christofides => SolverKind::Christofides,
            Solver::NearestNeighbor => SolverKind::NearestNeighbor,
            Solver::Exhaustive => SolverKind::Exhaustive,
        },
        max_exhaustive_cities: args.max_exhaustive_cities,
    })
}

/// Build a [`GeneratorConfig`] from `generate` arguments.
fn generator_config(args: &GenerateArgs) -> Result<GeneratorConfig, CliError> {
    if let Some(ref json) = args.config_json {
        return serde_json::from_str(json).map_err(CliError::ConfigJson);
    }

    Ok(GeneratorConfig {
        count: args.count,
        grid_size: args.grid_size,
        seed: args.seed,
    })
}

fn main() -> ExitCode {
    // Usage errors exit with 1 like every other failure; only help and
    // version requests succeed.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if let Err(io) = e.print() {
                eprintln!("error: {io}");
            }
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    if let Err(e) = logging::init_logger(cli.log_level) {
        eprintln!("warning: logger already initialized: {e}");
    }

    let outcome = match cli.command {
        Command::Solve(ref args) => run_solve(args),
        Command::Generate(ref args) => run_generate(args),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// JSON shape printed by `solve --json`.
#[derive(Serialize)]
struct SolveOutput<'a> {
    #[serde(flatten)]
    result: &'a TourResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<&'a PipelineDiagnostics>,
}

fn run_solve(args: &SolveArgs) -> Result<(), CliError> {
    let config = pipeline_config(args)?;
    let text = read_text(&args.points_file)?;
    let points = salesman_pipeline::parse_points(&text)?;
    log::info!(
        "read {} points from {}",
        points.len(),
        args.points_file.display()
    );

    let (result, diagnostics) = if args.diagnostics {
        let (result, diagnostics) =
            salesman_pipeline::diagnostics::solve_with_diagnostics(
                points.clone(),
                &config,
                &StdClock,
            )?;
        (result, Some(diagnostics))
    } else {
        (salesman_pipeline::solve(&points, &config)?, None)
    };

    if args.json {
        let output = SolveOutput {
            result: &result,
            diagnostics: diagnostics.as_ref(),
        };
        let json = serde_json::to_string_pretty(&output).map_err(CliError::Serialize)?;
        println!("{json}");
    } else {
        println!("{}", result.report());
        if let Some(ref diagnostics) = diagnostics {
            eprintln!("{}", diagnostics.report());
        }
    }

    if args.svg.is_none() && args.png.is_none() {
        return Ok(());
    }

    let grid_size = args.grid_size.unwrap_or_else(|| {
        let fitted = salesman_export::fit_grid_size(&points);
        log::info!("no --grid-size given, using point extent {fitted}");
        fitted
    });

    if let Some(ref svg_path) = args.svg {
        let title = file_title(&args.points_file);
        let description = format!("{} Tour Length: {:.6}", result.solver.label(), result.length);
        let metadata = SvgMetadata {
            title: Some(&title),
            description: Some(&description),
        };
        let svg = salesman_export::to_svg(&points, &result.tour, grid_size, &metadata)?;
        write_file(svg_path, svg.as_bytes())?;
        eprintln!("Solution SVG written to {}", svg_path.display());
    }

    if let Some(ref png_path) = args.png {
        let png = salesman_export::to_png(&points, &result.tour, grid_size)?;
        write_file(png_path, &png)?;
        eprintln!("Solution PNG written to {}", png_path.display());
    }

    Ok(())
}

fn run_generate(args: &GenerateArgs) -> Result<(), CliError> {
    let config = generator_config(args)?;
    let points = salesman_pipeline::generate(&config)?;

    let text_path = with_suffix(&args.output, ".txt");
    write_file(&text_path, salesman_export::to_points_text(&points).as_bytes())?;
    eprintln!(
        "{} points written to {}",
        points.len(),
        text_path.display()
    );

    let title = file_title(&args.output);
    let description = format!(
        "{} cities, grid {}, seed {}",
        config.count, config.grid_size, config.seed
    );
    let metadata = SvgMetadata {
        title: Some(&title),
        description: Some(&description),
    };
    let svg_path = with_suffix(&args.output, ".svg");
    let svg = salesman_export::to_instance_svg(&points, config.grid_size, &metadata)?;
    write_file(&svg_path, svg.as_bytes())?;
    eprintln!("Instance SVG written to {}", svg_path.display());

    Ok(())
}

fn read_text(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), CliError> {
    std::fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Append `suffix` to the full path, keeping any dots already in the
/// base name.
fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// File stem used as the SVG title.
fn file_title(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "salesman".to_owned(), |s| s.to_string_lossy().into_owned())
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("salesman").chain(args.iter().copied())).unwrap()
    }

    fn solve_args(cli: Cli) -> SolveArgs {
        match cli.command {
            Command::Solve(args) => args,
            Command::Generate(_) => unreachable!("expected solve"),
        }
    }

    #[test]
    fn solve_defaults_match_pipeline_defaults() {
        let args = solve_args(parse(&["solve", "cities.txt"]));
        let config = pipeline_config(&args).unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert!(args.grid_size.is_none());
    }

    #[test]
    fn solver_flag_selects_kind() {
        let args = solve_args(parse(&["solve", "cities.txt", "--solver", "nearest-neighbor"]));
        let config = pipeline_config(&args).unwrap();
        assert_eq!(config.solver, SolverKind::NearestNeighbor);
    }

    #[test]
    fn config_json_overrides_flags() {
        let args = solve_args(parse(&[
            "solve",
            "cities.txt",
            "--solver",
            "nearest-neighbor",
            "--config-json",
            r#"{"solver":"Exhaustive","max_exhaustive_cities":6}"#,
        ]));
        let config = pipeline_config(&args).unwrap();
        assert_eq!(config.solver, SolverKind::Exhaustive);
        assert_eq!(config.max_exhaustive_cities, 6);
    }

    #[test]
    fn bad_config_json_is_an_error() {
        let args = solve_args(parse(&["solve", "cities.txt", "--config-json", "{"]));
        assert!(matches!(
            pipeline_config(&args),
            Err(CliError::ConfigJson(_))
        ));
    }

    #[test]
    fn log_level_is_global() {
        let cli = parse(&["solve", "cities.txt", "--log-level", "debug"]);
        assert_eq!(cli.log_level, LogLevel::Debug);
    }

    #[test]
    fn generate_requires_output() {
        let result =
            Cli::try_parse_from(["salesman", "generate", "--count", "5"]);
        assert!(result.is_err());
    }

    #[test]
    fn generate_flags_build_config() {
        let cli = parse(&[
            "generate", "--count", "7", "--grid-size", "20", "--seed", "3", "--output", "x",
        ]);
        let Command::Generate(args) = cli.command else {
            unreachable!("expected generate");
        };
        let config = generator_config(&args).unwrap();
        assert_eq!(
            config,
            GeneratorConfig {
                count: 7,
                grid_size: 20.0,
                seed: 3,
            }
        );
    }

    #[test]
    fn with_suffix_keeps_dots() {
        assert_eq!(
            with_suffix(Path::new("out/run.1"), ".txt"),
            PathBuf::from("out/run.1.txt")
        );
    }

    #[test]
    fn file_title_uses_stem() {
        assert_eq!(file_title(Path::new("data/cities.txt")), "cities");
    }
}
