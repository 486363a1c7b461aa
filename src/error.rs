use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while loading a .bvh file or fitting its root path.
/// Parsing never returns a partial skeleton: any of these aborts the load.
#[derive(Debug, Error)]
pub enum BvhError {
    #[error("could not read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}, column {column}: expected {expected}, found '{found}'")]
    Grammar {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },

    #[error("unexpected end of file: expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("line {line}, column {column}: expected {expected}, found non-numeric '{found}'")]
    Numeric {
        expected: &'static str,
        found: String,
        line: usize,
        column: usize,
    },

    #[error("line {line}: joint '{joint}' declares {declared} channels but lists {found}")]
    ChannelCount {
        joint: String,
        declared: usize,
        found: usize,
        line: usize,
    },

    #[error("line {line}, column {column}: unknown channel '{name}'")]
    UnknownChannel {
        name: String,
        line: usize,
        column: usize,
    },

    #[error("line {line}: joint '{joint}' lists channel {channel} more than once")]
    DuplicateChannel {
        joint: String,
        channel: &'static str,
        line: usize,
    },

    #[error("line {line}: frame {frame} has {found} values, expected {expected}")]
    MotionFieldCount {
        frame: usize,
        expected: usize,
        found: usize,
        line: usize,
    },

    #[error("file declares {declared} frames but only {found} were found")]
    MissingFrames { declared: usize, found: usize },

    #[error("line {line}: unexpected data after the last frame")]
    TrailingData { line: usize },

    #[error("cannot fit a spline to the root path: {reason}")]
    DegenerateFit { reason: String },
}

pub type Result<T> = std::result::Result<T, BvhError>;
