//! Errors surfaced by the command-line tool.

use std::io;
use std::path::PathBuf;

use salesman_export::ExportError;
use salesman_pipeline::PipelineError;

/// Anything that makes a subcommand fail. Every variant exits with
/// status 1.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// An input file could not be read.
    #[error("could not read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An output file could not be written.
    #[error("could not write {}: {source}", path.display())]
    Write {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// `--config-json` did not hold a valid configuration.
    #[error("invalid --config-json: {0}")]
    ConfigJson(serde_json::Error),

    /// Result serialization failed.
    #[error("could not serialize output: {0}")]
    Serialize(serde_json::Error),

    /// Parsing or solving failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Rendering failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}
