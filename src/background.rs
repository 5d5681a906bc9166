//! The background population of an enrichment analysis
//!
//! The background defines the universe of identifiers for the statistical
//! comparison. It is either built from all annotated identifiers
//! ([`BackgroundMode::All`]) or from all preys observed in the interaction
//! data ([`BackgroundMode::File`]).
use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;

use tracing::debug;

use crate::annotations::RawAnnotations;
use crate::interactions::InteractionTable;
use crate::EnrichError;

/// Selects how the [`Background`] is built
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BackgroundMode {
    /// All identifiers of the raw annotations
    #[default]
    All,
    /// All prey identifiers of the interaction table
    File,
}

impl FromStr for BackgroundMode {
    type Err = EnrichError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(BackgroundMode::All),
            "file" => Ok(BackgroundMode::File),
            _ => Err(EnrichError::UnknownBackground(s.to_string())),
        }
    }
}

impl Display for BackgroundMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackgroundMode::All => write!(f, "all"),
            BackgroundMode::File => write!(f, "file"),
        }
    }
}

/// A set of identifiers that defines the background population
///
/// Each identifier occurs only once. The insertion order is kept.
///
/// # Examples
///
/// ```
/// use domain_enrichment::Background;
///
/// let background: Background = ["P1", "P2", "P1"].into_iter().collect();
/// assert_eq!(background.len(), 2);
/// assert!(background.contains("P2"));
/// assert!(!background.contains("p2"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct Background {
    ids: Vec<String>,
    lookup: HashSet<String>,
}

impl Background {
    /// Constructs a new, empty [`Background`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an identifier
    ///
    /// Returns whether the identifier was newly inserted
    pub fn insert<I: Into<String>>(&mut self, id: I) -> bool {
        let id = id.into();
        if self.lookup.contains(&id) {
            return false;
        }
        self.lookup.insert(id.clone());
        self.ids.push(id);
        true
    }

    /// Builds the background from all identifiers of the raw annotations
    pub fn all(raw: &RawAnnotations) -> Self {
        raw.ids().collect()
    }

    /// Builds the background from all prey identifiers of the interaction table
    ///
    /// Empty prey identifiers are ignored.
    pub fn from_interactions(table: &InteractionTable) -> Self {
        table
            .iter()
            .map(|row| row.prey())
            .filter(|prey| !prey.is_empty())
            .collect()
    }

    /// Builds the background according to `mode`
    ///
    /// # Examples
    ///
    /// ```
    /// use domain_enrichment::{AnnotationSpan, Background, BackgroundMode, Interaction, InteractionTable, RawAnnotations};
    ///
    /// let mut raw = RawAnnotations::new();
    /// raw.insert("P1", vec![AnnotationSpan::new("dA", 1, 10)]);
    ///
    /// let mut table = InteractionTable::new();
    /// table.push(Interaction::new("AAA", "P1", "prey1"));
    /// table.push(Interaction::new("AAA", "P2", "prey2"));
    ///
    /// assert_eq!(Background::select(BackgroundMode::All, &raw, &table).len(), 1);
    /// assert_eq!(Background::select(BackgroundMode::File, &raw, &table).len(), 2);
    /// ```
    pub fn select(mode: BackgroundMode, raw: &RawAnnotations, table: &InteractionTable) -> Self {
        let background = match mode {
            BackgroundMode::All => Self::all(raw),
            BackgroundMode::File => Self::from_interactions(table),
        };
        debug!("Background ({}) with {} identifiers", mode, background.len());
        background
    }

    /// Returns `true` if the identifier is part of the background
    pub fn contains(&self, id: &str) -> bool {
        self.lookup.contains(id)
    }

    /// The number of identifiers
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the background is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterator of all identifiers, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<I: Into<String>> FromIterator<I> for Background {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let mut background = Background::new();
        for id in iter {
            background.insert(id);
        }
        background
    }
}
