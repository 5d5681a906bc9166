//! Configuration and the complete enrichment run
use tracing::{debug, info};

use crate::annotations::{AnnotationIndex, RawAnnotations};
use crate::bait::count_by_bait;
use crate::background::{Background, BackgroundMode};
use crate::interactions::InteractionTable;
use crate::stats::enrichment::{bait_enrichment, EnrichedTerm};
use crate::utils::{Iter, TermMap};
use crate::{EnrichError, EnrichResult, DEFAULT_FDR};

/// Settings of an enrichment run
///
/// # Examples
///
/// ```
/// use domain_enrichment::{BackgroundMode, Config};
///
/// let config = Config::default()
///     .fdr(0.05)
///     .background(BackgroundMode::File)
///     .top_preys(25);
///
/// assert!(config.validate().is_ok());
/// assert!(Config::default().fdr(0.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    fdr: f64,
    background: BackgroundMode,
    top_preys: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fdr: DEFAULT_FDR,
            background: BackgroundMode::All,
            top_preys: 0,
        }
    }
}

impl Config {
    /// Sets the FDR, used to filter preys and for the Benjamini-Hochberg correction
    #[must_use]
    pub fn fdr(mut self, fdr: f64) -> Self {
        self.fdr = fdr;
        self
    }

    /// Sets how the [`Background`] is built
    #[must_use]
    pub fn background(mut self, background: BackgroundMode) -> Self {
        self.background = background;
        self
    }

    /// Only uses the top `n` preys (by average spectral count) of each bait,
    /// `0` uses all preys
    #[must_use]
    pub fn top_preys(mut self, top_preys: usize) -> Self {
        self.top_preys = top_preys;
        self
    }

    /// The FDR threshold
    pub fn fdr_threshold(&self) -> f64 {
        self.fdr
    }

    /// The background mode
    pub fn background_mode(&self) -> BackgroundMode {
        self.background
    }

    /// The maximum number of preys per bait, `0` means no limit
    pub fn max_preys(&self) -> usize {
        self.top_preys
    }

    /// Checks that the configuration can be used
    ///
    /// # Errors
    ///
    /// [`EnrichError::InvalidFdr`] if the FDR is not within `(0, 1]`
    pub fn validate(&self) -> EnrichResult<()> {
        if self.fdr.is_finite() && self.fdr > 0.0 && self.fdr <= 1.0 {
            Ok(())
        } else {
            Err(EnrichError::InvalidFdr(self.fdr))
        }
    }
}

/// The enriched terms of all baits
///
/// Baits are kept in the order they appear in the (filtered) interaction table.
/// Baits without any enriched term are present with an empty list.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EnrichedBaits {
    baits: TermMap<Vec<EnrichedTerm>>,
}

impl EnrichedBaits {
    /// Returns the enriched terms of `bait`
    pub fn get(&self, bait: &str) -> Option<&[EnrichedTerm]> {
        self.baits.get(bait).map(Vec::as_slice)
    }

    /// The number of baits
    pub fn len(&self) -> usize {
        self.baits.len()
    }

    /// Returns `true` if there are no baits
    pub fn is_empty(&self) -> bool {
        self.baits.is_empty()
    }

    /// Iterator of all baits and their enriched terms
    pub fn iter(&self) -> Iter<'_, Vec<EnrichedTerm>> {
        self.baits.iter()
    }

    /// Iterator of one row per bait and enriched term, e.g. to write a table
    pub fn rows(&self) -> impl Iterator<Item = (&str, &EnrichedTerm)> {
        self.baits
            .iter()
            .flat_map(|(bait, terms)| terms.iter().map(move |term| (bait, term)))
    }
}

impl<'a> IntoIterator for &'a EnrichedBaits {
    type Item = (&'a str, &'a Vec<EnrichedTerm>);
    type IntoIter = Iter<'a, Vec<EnrichedTerm>>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(String, Vec<EnrichedTerm>)> for EnrichedBaits {
    fn from_iter<T: IntoIterator<Item = (String, Vec<EnrichedTerm>)>>(iter: T) -> Self {
        Self {
            baits: iter.into_iter().collect(),
        }
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Calculates the enriched terms of all baits
///
/// The `table` should already contain the prey identifiers that are used by
/// the annotations (see [`InteractionTable::remap`]).
///
/// ```mermaid
/// flowchart LR
///     T[InteractionTable] --> B[Background]
///     R[RawAnnotations] --> B
///     T --> F[filtered InteractionTable]
///     R --> I[AnnotationIndex]
///     B --> I
///     F --> C[BaitRecords]
///     I --> C
///     C --> E[bait_enrichment]
///     I --> E
///     E --> O[EnrichedBaits]
/// ```
///
/// 1. The [`Background`] is built from the unfiltered table or the annotations
/// 2. Preys are filtered by their BFDR and the number of top preys
/// 3. The annotations are restricted to the background ([`AnnotationIndex`])
/// 4. Terms are counted for every bait ([`count_by_bait`])
/// 5. The enriched terms are selected for every bait ([`bait_enrichment`])
///
/// # Errors
///
/// [`EnrichError::InvalidFdr`] if the configured FDR is not within `(0, 1]`
///
/// # Examples
///
/// ```
/// use domain_enrichment::{enrich, AnnotationSpan, Config, Interaction, InteractionTable, RawAnnotations};
///
/// let mut raw = RawAnnotations::new();
/// raw.insert("P1", vec![AnnotationSpan::new("SH3", 10, 70)]);
/// raw.insert("P2", vec![AnnotationSpan::new("SH3", 5, 60)]);
/// for idx in 0..200 {
///     raw.insert(format!("X{idx}"), vec![AnnotationSpan::new("WD40", 1, 40)]);
/// }
///
/// let table: InteractionTable = vec![
///     Interaction::new("BAIT", "P1", "gene1").with_bfdr(0.0),
///     Interaction::new("BAIT", "P2", "gene2").with_bfdr(0.0),
///     Interaction::new("BAIT", "X1", "gene3").with_bfdr(0.5),
/// ].into_iter().collect();
///
/// let enriched = enrich(&Config::default(), &raw, &table).unwrap();
/// let terms = enriched.get("BAIT").unwrap();
/// assert_eq!(terms.len(), 1);
/// assert_eq!(terms[0].domain(), "SH3");
/// assert_eq!(terms[0].genes(), &["gene1", "gene2"]);
/// ```
pub fn enrich(
    config: &Config,
    raw: &RawAnnotations,
    table: &InteractionTable,
) -> EnrichResult<EnrichedBaits> {
    config.validate()?;

    let background = Background::select(config.background, raw, table);
    let filtered = table.filter(config.fdr, config.top_preys);
    let index = AnnotationIndex::build(raw, &background);
    let records = count_by_bait(&filtered, &index);

    let mut baits: TermMap<Vec<EnrichedTerm>> = TermMap::with_capacity(records.len());
    for (bait, record) in &records {
        if record.domains().is_empty() {
            debug!("Bait {} has no annotated preys", bait);
        }
        baits.insert(
            bait,
            bait_enrichment(record, &index, background.len(), config.fdr),
        );
    }

    info!(
        "Enrichment of {} baits: {} enriched terms",
        baits.len(),
        baits.values().map(Vec::len).sum::<usize>()
    );
    Ok(EnrichedBaits { baits })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{AnnotationSpan, Interaction};

    fn raw() -> RawAnnotations {
        let mut raw = RawAnnotations::new();
        raw.insert("P11111", vec![AnnotationSpan::new("d-a", 1, 12)]);
        raw.insert("P22222", vec![]);
        raw.insert(
            "P33333",
            vec![
                AnnotationSpan::new("d-a", 1, 20),
                AnnotationSpan::new("d-b", 30, 40),
            ],
        );
        raw.insert("P44444", vec![AnnotationSpan::new("d-a", 1, 12)]);
        raw.insert("P55555", vec![AnnotationSpan::new("d-a", 1, 12)]);
        for idx in 0..995 {
            raw.insert(format!("F{idx}"), vec![AnnotationSpan::new("filler", 1, 5)]);
        }
        raw
    }

    fn table() -> InteractionTable {
        [
            ("AAA", "P11111", "prey1", 10.0, 0.0),
            ("AAA", "P22222", "prey2", 20.0, 0.01),
            ("AAA", "P33333", "prey3", 30.0, 0.0),
            ("AAA", "F7", "filler7", 5.0, 0.5),
            ("BBB", "P22222", "prey2", 20.0, 0.0),
            ("BBB", "P33333", "prey3", 30.0, 0.0),
            ("CCC", "P99999", "prey9", 30.0, 0.0),
        ]
        .into_iter()
        .map(|(bait, prey, gene, spec, bfdr)| {
            Interaction::new(bait, prey, gene)
                .with_avg_spec(spec)
                .with_bfdr(bfdr)
        })
        .collect()
    }

    #[test]
    fn full_run() {
        let enriched = enrich(&Config::default(), &raw(), &table()).unwrap();
        let baits: Vec<&str> = enriched.iter().map(|(bait, _)| bait).collect();
        assert_eq!(baits, vec!["AAA", "BBB", "CCC"]);

        let aaa = enriched.get("AAA").unwrap();
        let terms: Vec<&str> = aaa.iter().map(EnrichedTerm::domain).collect();
        assert_eq!(terms, vec!["d-a", "d-b"]);
        assert_eq!(aaa[0].no_genes(), 3);
        assert_eq!(aaa[0].background_size(), 1000);
        assert!((aaa[0].pvalue() - 3.598_789_169_929_346_4e-5).abs() < 1e-12);

        let bbb = enriched.get("BBB").unwrap();
        let terms: Vec<&str> = bbb.iter().map(EnrichedTerm::domain).collect();
        assert_eq!(terms, vec!["d-b", "d-a"]);

        assert!(enriched.get("CCC").unwrap().is_empty());
        assert_eq!(enriched.rows().count(), 4);
    }

    #[test]
    fn file_background() {
        let config = Config::default().background(BackgroundMode::File);
        let enriched = enrich(&config, &raw(), &table()).unwrap();
        // the background only contains the 5 preys of the table,
        // so none of the terms is significant anymore
        assert_eq!(enriched.len(), 3);
        assert_eq!(enriched.rows().count(), 0);
    }

    #[test]
    fn top_preys() {
        let config = Config::default().top_preys(1);
        let enriched = enrich(&config, &raw(), &table()).unwrap();
        let aaa = enriched.get("AAA").unwrap();
        // only P33333 remains for AAA
        let terms: Vec<&str> = aaa.iter().map(EnrichedTerm::domain).collect();
        assert_eq!(terms, vec!["d-b", "d-a"]);
        for term in aaa {
            assert_eq!(term.no_genes(), 1);
            assert_eq!(term.genes(), &["prey3"]);
        }
    }

    #[test]
    fn invalid_fdr() {
        for fdr in [0.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                enrich(&Config::default().fdr(fdr), &raw(), &table()),
                Err(EnrichError::InvalidFdr(_))
            ));
        }
    }

    #[test]
    fn empty_input() {
        let enriched = enrich(
            &Config::default(),
            &RawAnnotations::new(),
            &InteractionTable::new(),
        )
        .unwrap();
        assert!(enriched.is_empty());
        assert_eq!(enriched.rows().count(), 0);
    }

    #[test]
    fn config_accessors() {
        let config = Config::default();
        assert!((config.fdr_threshold() - DEFAULT_FDR).abs() < f64::EPSILON);
        assert_eq!(config.background_mode(), BackgroundMode::All);
        assert_eq!(config.max_preys(), 0);
    }
}
