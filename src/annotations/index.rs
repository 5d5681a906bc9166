use smallvec::SmallVec;
use tracing::debug;

use crate::annotations::RawAnnotations;
use crate::background::Background;
use crate::utils::{Iter, TermMap};

/// Occurrence count and total span length of one term on one identifier
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TermStats {
    count: usize,
    length: i64,
}

impl TermStats {
    /// Constructs new [`TermStats`]
    pub fn new(count: usize, length: i64) -> Self {
        Self { count, length }
    }

    /// The number of spans of the term
    pub fn count(&self) -> usize {
        self.count
    }

    /// The summed length of all spans of the term
    pub fn length(&self) -> i64 {
        self.length
    }
}

/// The [`TermStats`] of all terms of a single identifier
///
/// Terms are stored in the order in which they first appear in the
/// raw spans. Most identifiers carry only a handful of terms, so a
/// linear scan is used for lookups.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TermCounts {
    terms: SmallVec<[(String, TermStats); 4]>,
}

impl TermCounts {
    /// Constructs a new, empty [`TermCounts`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single occurrence of `term` with the given length
    ///
    /// Returns `true` if the term was not present before
    pub fn add(&mut self, term: &str, length: i64) -> bool {
        if let Some((_, stats)) = self.terms.iter_mut().find(|(t, _)| t == term) {
            stats.count += 1;
            stats.length += length;
            false
        } else {
            self.terms.push((term.to_string(), TermStats::new(1, length)));
            true
        }
    }

    /// Returns the [`TermStats`] of `term`
    pub fn get(&self, term: &str) -> Option<&TermStats> {
        self.terms.iter().find(|(t, _)| t == term).map(|(_, s)| s)
    }

    /// The number of distinct terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the identifier does not carry any term
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterator of all terms and their [`TermStats`]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TermStats)> {
        self.terms.iter().map(|(t, s)| (t.as_str(), s))
    }
}

/// The annotations of all identifiers of the [`Background`]
///
/// The index holds two lookups:
/// - identifier to [`TermCounts`] (`domains_by_id`)
/// - term to the identifiers carrying the term (`ids_by_domain`)
///
/// Identifiers of the raw annotations that are not part of the background
/// are skipped entirely. Identifiers of the background without any raw
/// annotation entry are not present in the index.
///
/// # Examples
///
/// ```
/// use domain_enrichment::{AnnotationIndex, AnnotationSpan, Background, RawAnnotations};
///
/// let mut raw = RawAnnotations::new();
/// raw.insert("1", vec![
///     AnnotationSpan::new("dA", 10, 21),
///     AnnotationSpan::new("dB", 30, 45),
/// ]);
/// raw.insert("2", vec![AnnotationSpan::new("dA", 5, 14)]);
/// raw.insert("3", vec![AnnotationSpan::new("dC", 1, 100)]);
///
/// let background: Background = ["1", "2"].into_iter().collect();
/// let index = AnnotationIndex::build(&raw, &background);
///
/// assert_eq!(index.len(), 2);
/// assert_eq!(index.domains("1").unwrap().get("dB").unwrap().length(), 16);
/// assert_eq!(index.ids_with_term("dA").unwrap(), &["1", "2"]);
/// assert!(index.ids_with_term("dC").is_none());
/// ```
#[derive(Debug, Default, Clone)]
pub struct AnnotationIndex {
    domains_by_id: TermMap<TermCounts>,
    ids_by_domain: TermMap<Vec<String>>,
}

impl AnnotationIndex {
    /// Builds the index from the raw annotations, restricted to the `background`
    pub fn build(raw: &RawAnnotations, background: &Background) -> Self {
        let mut domains_by_id: TermMap<TermCounts> = TermMap::new();
        let mut ids_by_domain: TermMap<Vec<String>> = TermMap::new();

        for (id, spans) in raw {
            if !background.contains(id) {
                continue;
            }
            let mut counts = TermCounts::new();
            for span in spans {
                if counts.add(span.term(), span.length()) {
                    ids_by_domain
                        .get_or_insert_with(span.term(), Vec::new)
                        .push(id.to_string());
                }
            }
            domains_by_id.insert(id, counts);
        }

        debug!(
            "Indexed {} of {} identifiers with {} distinct terms",
            domains_by_id.len(),
            raw.len(),
            ids_by_domain.len()
        );

        Self {
            domains_by_id,
            ids_by_domain,
        }
    }

    /// Returns the [`TermCounts`] of an identifier
    ///
    /// Returns `None` if the identifier is not part of the index
    pub fn domains(&self, id: &str) -> Option<&TermCounts> {
        self.domains_by_id.get(id)
    }

    /// Returns `true` if the identifier is part of the index
    pub fn contains(&self, id: &str) -> bool {
        self.domains_by_id.contains_key(id)
    }

    /// Returns all identifiers that carry the `term`, in the order they were indexed
    pub fn ids_with_term(&self, term: &str) -> Option<&[String]> {
        self.ids_by_domain.get(term).map(Vec::as_slice)
    }

    /// The number of identifiers carrying the `term`
    ///
    /// This is the background population size of the term.
    /// Returns `0` for unknown terms.
    pub fn term_population(&self, term: &str) -> usize {
        self.ids_by_domain.get(term).map_or(0, Vec::len)
    }

    /// The number of indexed identifiers
    pub fn len(&self) -> usize {
        self.domains_by_id.len()
    }

    /// Returns `true` if no identifier is indexed
    pub fn is_empty(&self) -> bool {
        self.domains_by_id.is_empty()
    }

    /// Iterator of all indexed identifiers and their [`TermCounts`]
    pub fn iter(&self) -> Iter<'_, TermCounts> {
        self.domains_by_id.iter()
    }

    /// Iterator of all terms, in the order they were first seen
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.ids_by_domain.keys()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::AnnotationSpan;

    fn raw() -> RawAnnotations {
        let mut raw = RawAnnotations::new();
        raw.insert(
            "1",
            vec![
                AnnotationSpan::new("dA", 10, 21),
                AnnotationSpan::new("dB", 30, 45),
            ],
        );
        raw.insert("2", vec![AnnotationSpan::new("dA", 5, 14)]);
        raw
    }

    #[test]
    fn build_index() {
        let background: Background = ["1", "2"].into_iter().collect();
        let index = AnnotationIndex::build(&raw(), &background);

        let one = index.domains("1").unwrap();
        assert_eq!(one.len(), 2);
        assert_eq!(one.get("dA"), Some(&TermStats::new(1, 12)));
        assert_eq!(one.get("dB"), Some(&TermStats::new(1, 16)));

        let two = index.domains("2").unwrap();
        assert_eq!(two.len(), 1);
        assert_eq!(two.get("dA"), Some(&TermStats::new(1, 10)));

        assert_eq!(index.ids_with_term("dA").unwrap(), &["1", "2"]);
        assert_eq!(index.ids_with_term("dB").unwrap(), &["1"]);
        assert_eq!(index.terms().collect::<Vec<&str>>(), vec!["dA", "dB"]);
    }

    #[test]
    fn repeated_terms_are_aggregated() {
        let mut raw = RawAnnotations::new();
        raw.insert(
            "P44444",
            vec![
                AnnotationSpan::new("d4", 10, 21),
                AnnotationSpan::new("d4-b", 10, 20),
                AnnotationSpan::new("d4", 12, 30),
            ],
        );
        let background: Background = ["P44444"].into_iter().collect();
        let index = AnnotationIndex::build(&raw, &background);

        let counts = index.domains("P44444").unwrap();
        assert_eq!(counts.get("d4"), Some(&TermStats::new(2, 31)));
        assert_eq!(counts.get("d4-b"), Some(&TermStats::new(1, 11)));
        assert_eq!(index.ids_with_term("d4").unwrap(), &["P44444"]);
        assert_eq!(index.term_population("d4"), 1);
    }

    #[test]
    fn restricted_to_background() {
        let background: Background = ["2", "9"].into_iter().collect();
        let index = AnnotationIndex::build(&raw(), &background);

        assert_eq!(index.len(), 1);
        assert!(!index.contains("1"));
        assert!(!index.contains("9"));
        for (id, _) in index.iter() {
            assert!(background.contains(id));
        }
        assert_eq!(index.ids_with_term("dA").unwrap(), &["2"]);
        assert!(index.ids_with_term("dB").is_none());
        assert_eq!(index.term_population("dB"), 0);
    }

    #[test]
    fn identifiers_without_spans() {
        let mut raw = raw();
        raw.insert("3", vec![]);
        let background: Background = ["1", "2", "3"].into_iter().collect();
        let index = AnnotationIndex::build(&raw, &background);

        assert!(index.contains("3"));
        assert!(index.domains("3").unwrap().is_empty());
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn counts_match_raw_spans() {
        let mut raw = RawAnnotations::new();
        for i in 0..5 {
            raw.add_span("x", AnnotationSpan::new("dA", i * 10, i * 10 + 4));
        }
        raw.add_span("x", AnnotationSpan::new("dB", 1, 1));
        let background: Background = ["x"].into_iter().collect();
        let index = AnnotationIndex::build(&raw, &background);

        let counts = index.domains("x").unwrap();
        assert_eq!(counts.get("dA").unwrap().count(), 5);
        assert_eq!(counts.get("dA").unwrap().length(), 25);
        assert_eq!(counts.get("dB").unwrap().count(), 1);
    }
}
