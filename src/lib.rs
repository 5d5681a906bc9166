#![doc = include_str!("../README.md")]
use std::num::ParseFloatError;
use thiserror::Error;

pub mod annotations;
pub mod bait;
pub mod background;
pub mod interactions;
pub mod parser;
pub mod pipeline;
pub mod stats;
pub mod utils;

pub use annotations::{AnnotationIndex, AnnotationSpan, RawAnnotations, TermCounts, TermStats};
pub use bait::{count_by_bait, BaitRecord, BaitRecords, TermHits};
pub use background::{Background, BackgroundMode};
pub use interactions::{IdMap, Interaction, InteractionTable};
pub use pipeline::{enrich, Config, EnrichedBaits};
pub use stats::enrichment::{bait_enrichment, EnrichedTerm};
pub use utils::TermMap;

/// The default FDR threshold, used for prey filtering and the
/// Benjamini-Hochberg correction
pub const DEFAULT_FDR: f64 = 0.01;

/// Main Error type for this crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EnrichError {
    /// The FDR threshold must be a finite number within `(0, 1]`
    #[error("invalid FDR threshold {0}, must be within (0, 1]")]
    InvalidFdr(f64),
    /// The background mode is neither `all` nor `file`
    #[error("unknown background mode `{0}`, expected `all` or `file`")]
    UnknownBackground(String),
    /// A required column is missing from the header of a SAINT file
    #[error("column {0} is missing from the header")]
    MissingColumn(&'static str),
    /// A line of a SAINT file could not be parsed
    #[error("invalid data in line {line}: {reason}")]
    ParseError {
        /// 1-based line number, including the header
        line: usize,
        /// Short description of the problem
        reason: String,
    },
    /// Failed to open or read a file
    #[error("unable to read file")]
    Io(#[from] std::io::Error),
}

impl EnrichError {
    pub(crate) fn parse_float(line: usize, column: &str, err: &ParseFloatError) -> Self {
        EnrichError::ParseError {
            line,
            reason: format!("{column}: {err}"),
        }
    }
}

/// Shortcut for `Result<T, EnrichError>`
pub type EnrichResult<T> = Result<T, EnrichError>;

/// We have to frequently do divisions starting with usize values
/// and need to return f64 values. To ensure some kind of safety
/// we use this method to panic in case of overflows.
fn f64_from_usize(n: usize) -> f64 {
    let intermediate: u32 = n
        .try_into()
        .expect("cannot safely create f64 from large usize");
    intermediate.into()
}

/// Converts `usize` counts into the `u64` values used by `statrs`
fn u64_from_usize(n: usize) -> u64 {
    n.try_into().expect("usize must fit into u64")
}
