use thiserror::Error;

pub mod aligner;
pub mod config;
pub mod grid;
pub mod scoring;
pub mod traceback;

pub use crate::aligner::{build_and_fill, NeedlemanWunsch};
pub use crate::config::{AlignerConfig, DEFAULT_GAP_SYMBOL};
pub use crate::grid::{Cell, Grid, GridView, Layer, Origin};
pub use crate::scoring::{AlignmentStats, ScoringScheme};
pub use crate::traceback::{traceback, traceback_with_gap, Alignment, TracebackOperation};

// Default scoring parameters
pub const DEFAULT_GAP: i32 = -2;
pub const DEFAULT_MATCH: i32 = 1;
pub const DEFAULT_MISMATCH: i32 = -1;

/// Longest sequence accepted. Lengths must fit in `i32`; whether the scores fit
/// as well depends on the scoring scheme and is checked while filling.
pub const MAX_SEQUENCE_SIZE: usize = i32::MAX as usize;

#[derive(Debug, Error)]
pub enum AlignerError {
    #[error("Sequence too large: {0}")]
    SequenceTooLarge(usize),
    #[error("Grid of {cells} cells exceeds the limit of {limit}")]
    GridTooLarge { cells: usize, limit: usize },
    #[error("Score {score} at cell ({row}, {col}) does not fit in i32")]
    ScoreOverflow { row: usize, col: usize, score: i64 },
    #[error("Memory allocation failed: {0}")]
    MemoryError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
