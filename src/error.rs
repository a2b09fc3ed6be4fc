//! Error types for reading, building, and printing fault trees and BDDs.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors that can occur anywhere in the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error while reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Formatting the DOT text failed.
    #[error("formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// The rendered temporary file could not be moved to its destination.
    #[error("could not write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output path has no extension or one that no renderer understands.
    #[error("unsupported output format for {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The input path has an extension no reader understands.
    #[error("unsupported input file type: {extension:?}")]
    UnsupportedFileType { extension: String },

    /// The layout engine binary could not be started.
    #[error("layout engine `{engine}` not found (is Graphviz installed?)")]
    EngineNotFound {
        engine: String,
        #[source]
        source: std::io::Error,
    },

    /// The layout engine ran but reported a failure.
    #[error("layout engine `{engine}` failed ({status}): {stderr}")]
    Engine {
        engine: String,
        status: ExitStatus,
        stderr: String,
    },

    /// Interactive output was requested without a display surface.
    #[error("no display available: {reason}")]
    NoDisplay { reason: String },

    /// The image viewer could not be launched.
    #[error("could not launch viewer `{viewer}`: {source}")]
    Viewer {
        viewer: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine produced a layout description we could not read.
    #[error("malformed layout at line {line}: {message}")]
    LayoutParse { line: usize, message: String },

    /// A Galileo file could not be parsed into a fault tree.
    #[error("Galileo parse error at line {line}: {message}")]
    Galileo { line: usize, message: String },

    /// The fault tree under construction is not well-formed.
    #[error("invalid fault tree: {0}")]
    InvalidTree(String),

    /// A basic event name was not found in the fault tree.
    #[error("unknown basic event `{0}`")]
    UnknownEvent(String),

    /// A variable ordering is not usable for the fault tree.
    #[error("invalid variable ordering: {0}")]
    InvalidOrdering(String),

    /// A probability could not be parsed or is outside `[0, 1]`.
    #[error("invalid probability `{0}`")]
    InvalidProbability(String),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
