//! Statistical analyses of term enrichment
//!
//! This module contains methods to calculate the enrichment of annotation
//! terms among the preys of a bait, compared to a background population.
//!
//! - [`hypergeom`] performs the one-sided exact test of a single term
//! - [`correction`] applies the Benjamini-Hochberg correction to all terms of a bait
//! - [`enrichment`] combines both and selects the significantly enriched terms

pub mod correction;
pub mod enrichment;
pub mod hypergeom;

pub use correction::{bh_correction, BhCorrection, CorrectedPvalue};
pub use enrichment::{bait_enrichment, EnrichedTerm};
pub use hypergeom::{fishers_exact_greater, ContingencyTable};
