//! Sequence annotations (protein domains) of identifiers
//!
//! This module contains structs to represent the raw annotations as they
//! are loaded from external data, and the [`AnnotationIndex`], which restricts
//! the raw annotations to a [`Background`](crate::Background).
//!
//! The underlying principle is simple:
//! - Each identifier (a prey or an annotated gene) has an ordered list of [`AnnotationSpan`]s
//! - An identifier can carry the same term multiple times, at different positions
//! - The [`AnnotationIndex`] aggregates the spans into [`TermStats`] per identifier and term
//!   and keeps the reverse lookup from term to identifiers

mod index;
mod span;

pub use index::{AnnotationIndex, TermCounts, TermStats};
pub use span::{AnnotationSpan, RawAnnotations};
