//! Benjamini-Hochberg correction for multiple testing
//!
//! Terms are ranked by ascending p-value. Terms with exactly the same
//! p-value share the same rank, the rank is only incremented for a new
//! p-value. The adjusted p-value of a term is `pvalue * no_tests / rank`,
//! capped at `1` and made monotone by walking from the largest p-value
//! down to the smallest. The critical value of a term is
//! `fdr * rank / no_tests`.
use tracing::trace;

use crate::f64_from_usize;
use crate::utils::{Iter, TermMap};

/// The corrected values of a single term
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectedPvalue {
    rank: usize,
    pvalue: f64,
    adj_pvalue: f64,
    critical_value: f64,
}

impl CorrectedPvalue {
    /// The rank of the raw p-value, starting at `1`
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// The raw p-value
    pub fn pvalue(&self) -> f64 {
        self.pvalue
    }

    /// The Benjamini-Hochberg adjusted p-value
    pub fn adj_pvalue(&self) -> f64 {
        self.adj_pvalue
    }

    /// The Benjamini-Hochberg critical value at the term's rank
    pub fn critical_value(&self) -> f64 {
        self.critical_value
    }

    /// Returns `true` if the adjusted p-value is `0` or below the critical value
    pub fn is_significant(&self) -> bool {
        self.adj_pvalue == 0.0 || self.adj_pvalue < self.critical_value
    }
}

/// The result of [`bh_correction`]
///
/// The terms are ordered by ascending raw p-value. Terms with identical
/// p-values keep the order of the input.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BhCorrection {
    terms: TermMap<CorrectedPvalue>,
}

impl BhCorrection {
    /// Returns the [`CorrectedPvalue`] of `term`
    pub fn get(&self, term: &str) -> Option<&CorrectedPvalue> {
        self.terms.get(term)
    }

    /// The number of tested terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if no term was tested
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterator of all terms, by ascending raw p-value
    pub fn iter(&self) -> Iter<'_, CorrectedPvalue> {
        self.terms.iter()
    }

    /// The adjusted p-value of every term
    pub fn adjusted_pvalues(&self) -> TermMap<f64> {
        self.terms
            .iter()
            .map(|(term, value)| (term, value.adj_pvalue))
            .collect()
    }

    /// The critical value of every term
    pub fn critical_values(&self) -> TermMap<f64> {
        self.terms
            .iter()
            .map(|(term, value)| (term, value.critical_value))
            .collect()
    }
}

impl<'a> IntoIterator for &'a BhCorrection {
    type Item = (&'a str, &'a CorrectedPvalue);
    type IntoIter = Iter<'a, CorrectedPvalue>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Applies the Benjamini-Hochberg correction to the p-values of all terms
///
/// An empty input returns an empty [`BhCorrection`].
///
/// # Examples
///
/// ```
/// use domain_enrichment::TermMap;
/// use domain_enrichment::stats::bh_correction;
///
/// let pvalues: TermMap<f64> = vec![
///     ("d1", 0.01),
///     ("d2", 0.00001),
///     ("d3", 0.001),
///     ("d4", 0.0001),
///     ("d5", 0.001),
/// ].into_iter().collect();
///
/// let corrected = bh_correction(&pvalues, 0.01);
///
/// // d3 and d5 share the same rank
/// assert_eq!(corrected.get("d3").unwrap().rank(), 3);
/// assert_eq!(corrected.get("d5").unwrap().rank(), 3);
/// assert_eq!(corrected.get("d1").unwrap().rank(), 4);
///
/// let d1 = corrected.get("d1").unwrap();
/// assert!((d1.adj_pvalue() - 0.0125).abs() < 1e-12);
/// assert!((d1.critical_value() - 0.008).abs() < 1e-12);
/// ```
pub fn bh_correction(pvalues: &TermMap<f64>, fdr: f64) -> BhCorrection {
    let mut sorted: Vec<(&str, f64)> = pvalues.iter().map(|(term, p)| (term, *p)).collect();
    // sort_by is stable, identical p-values keep their input order
    sorted.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut ranks: Vec<usize> = Vec::with_capacity(sorted.len());
    let mut rank = 0usize;
    for (idx, (_, pvalue)) in sorted.iter().enumerate() {
        if idx == 0 || *pvalue != sorted[idx - 1].1 {
            rank += 1;
        }
        ranks.push(rank);
    }

    let no_tests = f64_from_usize(sorted.len());
    let mut adjusted = vec![0.0; sorted.len()];
    let mut last_adjusted = 1.0;
    for idx in (0..sorted.len()).rev() {
        let pvalue = sorted[idx].1;
        let mut adj_pvalue = (pvalue * no_tests / f64_from_usize(ranks[idx])).min(1.0);
        if adj_pvalue > last_adjusted {
            adj_pvalue = last_adjusted;
        }
        last_adjusted = adj_pvalue;
        adjusted[idx] = adj_pvalue;
    }

    let terms = sorted
        .iter()
        .zip(ranks)
        .zip(adjusted)
        .map(|(((term, pvalue), rank), adj_pvalue)| {
            let critical_value = fdr * f64_from_usize(rank) / no_tests;
            trace!(
                "{}: rank {}, p {:e}, adjusted {:e}, critical {:e}",
                term,
                rank,
                pvalue,
                adj_pvalue,
                critical_value
            );
            (
                *term,
                CorrectedPvalue {
                    rank,
                    pvalue: *pvalue,
                    adj_pvalue,
                    critical_value,
                },
            )
        })
        .collect();

    BhCorrection { terms }
}
