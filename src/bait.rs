//! Counting annotation terms among the preys of each bait
//!
//! For every bait of an [`InteractionTable`], [`count_by_bait`] collects which of
//! its preys carry which annotation terms. Only preys that are part of the
//! [`AnnotationIndex`] are considered.
use tracing::debug;

use crate::annotations::{AnnotationIndex, TermStats};
use crate::interactions::InteractionTable;
use crate::utils::{Iter, TermMap};

/// The preys of a bait that carry a single term
///
/// The three lists correspond positionally: the n-th prey carries the
/// term `count_by_accession[n]` times with a total length of
/// `length_by_accession[n]`.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TermHits {
    count_by_accession: Vec<usize>,
    length_by_accession: Vec<i64>,
    preys: Vec<String>,
}

impl TermHits {
    fn push(&mut self, stats: &TermStats, prey: &str) {
        self.count_by_accession.push(stats.count());
        self.length_by_accession.push(stats.length());
        self.preys.push(prey.to_string());
    }

    /// The number of occurrences of the term, per prey
    pub fn count_by_accession(&self) -> &[usize] {
        &self.count_by_accession
    }

    /// The total length of the term, per prey
    pub fn length_by_accession(&self) -> &[i64] {
        &self.length_by_accession
    }

    /// The display names of the preys carrying the term
    pub fn preys(&self) -> &[String] {
        &self.preys
    }

    /// The number of preys carrying the term
    pub fn len(&self) -> usize {
        self.preys.len()
    }

    /// Returns `true` if no prey carries the term
    pub fn is_empty(&self) -> bool {
        self.preys.is_empty()
    }
}

/// The term counts of a single bait
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BaitRecord {
    preys_in_database: usize,
    domains: TermMap<TermHits>,
}

impl BaitRecord {
    /// The number of preys of the bait that are present in the [`AnnotationIndex`]
    pub fn preys_in_database(&self) -> usize {
        self.preys_in_database
    }

    /// All terms of the bait's preys, in the order they were first seen
    pub fn domains(&self) -> &TermMap<TermHits> {
        &self.domains
    }

    /// Returns the [`TermHits`] of `term`
    pub fn domain(&self, term: &str) -> Option<&TermHits> {
        self.domains.get(term)
    }
}

/// The [`BaitRecord`]s of all baits, in the order the baits first appear
#[derive(Debug, Default, Clone)]
pub struct BaitRecords {
    baits: TermMap<BaitRecord>,
}

impl BaitRecords {
    /// Returns the [`BaitRecord`] of `bait`
    pub fn get(&self, bait: &str) -> Option<&BaitRecord> {
        self.baits.get(bait)
    }

    /// The number of baits
    pub fn len(&self) -> usize {
        self.baits.len()
    }

    /// Returns `true` if there are no baits
    pub fn is_empty(&self) -> bool {
        self.baits.is_empty()
    }

    /// Iterator of all baits and their [`BaitRecord`]
    pub fn iter(&self) -> Iter<'_, BaitRecord> {
        self.baits.iter()
    }
}

impl<'a> IntoIterator for &'a BaitRecords {
    type Item = (&'a str, &'a BaitRecord);
    type IntoIter = Iter<'a, BaitRecord>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Counts the annotation terms of the preys of every bait
///
/// Rows with an empty prey identifier and preys that are not part of the
/// `index` are ignored. Every bait of the table gets a [`BaitRecord`],
/// even if none of its preys are annotated.
///
/// # Examples
///
/// ```
/// use domain_enrichment::{count_by_bait, AnnotationIndex, AnnotationSpan, Background, Interaction, InteractionTable, RawAnnotations};
///
/// let mut raw = RawAnnotations::new();
/// raw.insert("P1", vec![AnnotationSpan::new("dA", 1, 12)]);
/// raw.insert("P3", vec![AnnotationSpan::new("dA", 1, 20), AnnotationSpan::new("dA", 30, 40)]);
/// let index = AnnotationIndex::build(&raw, &Background::all(&raw));
///
/// let table: InteractionTable = vec![
///     Interaction::new("AAA", "P1", "prey1"),
///     Interaction::new("AAA", "P2", "prey2"),
///     Interaction::new("AAA", "P3", "prey3"),
/// ].into_iter().collect();
///
/// let records = count_by_bait(&table, &index);
/// let aaa = records.get("AAA").unwrap();
/// assert_eq!(aaa.preys_in_database(), 2);
/// assert_eq!(aaa.domain("dA").unwrap().preys(), &["prey1", "prey3"]);
/// assert_eq!(aaa.domain("dA").unwrap().count_by_accession(), &[1, 2]);
/// ```
pub fn count_by_bait(table: &InteractionTable, index: &AnnotationIndex) -> BaitRecords {
    let mut baits: TermMap<BaitRecord> = TermMap::new();

    for row in table {
        let record = baits.get_or_insert_with(row.bait(), BaitRecord::default);
        if row.prey().is_empty() {
            continue;
        }
        let Some(counts) = index.domains(row.prey()) else {
            continue;
        };
        record.preys_in_database += 1;
        for (term, stats) in counts.iter() {
            record
                .domains
                .get_or_insert_with(term, TermHits::default)
                .push(stats, row.prey_gene());
        }
    }

    for (bait, record) in &baits {
        debug!(
            "Bait {}: {} preys in database, {} terms",
            bait,
            record.preys_in_database,
            record.domains.len()
        );
    }

    BaitRecords { baits }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{AnnotationSpan, Background, Interaction, RawAnnotations};

    fn index() -> AnnotationIndex {
        let mut raw = RawAnnotations::new();
        raw.insert("P11111", vec![AnnotationSpan::new("d-a", 1, 12)]);
        raw.insert("P22222", vec![AnnotationSpan::new("r-a", 1, 12)]);
        raw.insert(
            "P33333",
            vec![
                AnnotationSpan::new("d-a", 1, 20),
                AnnotationSpan::new("d-b", 30, 40),
                AnnotationSpan::new("d-a", 50, 60),
            ],
        );
        AnnotationIndex::build(&raw, &Background::all(&raw))
    }

    fn table() -> InteractionTable {
        [
            ("AAA", "P11111", "prey1"),
            ("AAA", "P22222", "prey2"),
            ("AAA", "P33333", "prey3"),
            ("BBB", "P22222", "prey2"),
            ("BBB", "P33333", "prey3"),
            ("BBB", "P44444", "prey4"),
        ]
        .into_iter()
        .map(|(bait, prey, gene)| Interaction::new(bait, prey, gene))
        .collect()
    }

    #[test]
    fn count_terms() {
        let records = count_by_bait(&table(), &index());
        assert_eq!(records.len(), 2);

        let aaa = records.get("AAA").unwrap();
        assert_eq!(aaa.preys_in_database(), 3);
        let terms: Vec<&str> = aaa.domains().keys().collect();
        assert_eq!(terms, vec!["d-a", "r-a", "d-b"]);

        let da = aaa.domain("d-a").unwrap();
        assert_eq!(da.count_by_accession(), &[1, 2]);
        assert_eq!(da.length_by_accession(), &[12, 31]);
        assert_eq!(da.preys(), &["prey1", "prey3"]);

        let db = aaa.domain("d-b").unwrap();
        assert_eq!(db.count_by_accession(), &[1]);
        assert_eq!(db.length_by_accession(), &[11]);
        assert_eq!(db.preys(), &["prey3"]);

        let bbb = records.get("BBB").unwrap();
        assert_eq!(bbb.preys_in_database(), 2);
        assert_eq!(bbb.domain("d-a").unwrap().preys(), &["prey3"]);
        assert_eq!(bbb.domain("r-a").unwrap().preys(), &["prey2"]);
    }

    #[test]
    fn bait_without_annotated_preys() {
        let mut table = table();
        table.push(Interaction::new("CCC", "P99999", "prey9"));
        table.push(Interaction::new("CCC", "", "empty"));
        let records = count_by_bait(&table, &index());

        let ccc = records.get("CCC").unwrap();
        assert_eq!(ccc.preys_in_database(), 0);
        assert!(ccc.domains().is_empty());
        let baits: Vec<&str> = records.iter().map(|(bait, _)| bait).collect();
        assert_eq!(baits, vec!["AAA", "BBB", "CCC"]);
    }

    #[test]
    fn preys_are_counted_per_row() {
        let table: InteractionTable = vec![
            Interaction::new("AAA", "P11111", "prey1"),
            Interaction::new("AAA", "P11111", "prey1-duplicate"),
        ]
        .into_iter()
        .collect();
        let records = count_by_bait(&table, &index());
        let aaa = records.get("AAA").unwrap();
        assert_eq!(aaa.preys_in_database(), 2);
        assert_eq!(aaa.domain("d-a").unwrap().preys(), &["prey1", "prey1-duplicate"]);
    }
}
