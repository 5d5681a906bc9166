//! Selection of significantly enriched terms of a bait
use tracing::debug;

use crate::annotations::AnnotationIndex;
use crate::bait::BaitRecord;
use crate::stats::correction::bh_correction;
use crate::stats::hypergeom::fishers_exact_greater;
use crate::utils::TermMap;
use crate::{f64_from_usize, u64_from_usize};

/// A significantly enriched term of a bait
///
/// [`EnrichedTerm`] is returned from [`bait_enrichment`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnrichedTerm {
    domain: String,
    no_genes_with_domain: usize,
    no_genes: usize,
    background_size_w_domain: usize,
    background_size: usize,
    fold_enrichment: f64,
    pvalue: f64,
    adj_pvalue: f64,
    bh_fdr: f64,
    genes: Vec<String>,
}

impl EnrichedTerm {
    /// The enriched term
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The number of the bait's preys with the term
    pub fn no_genes_with_domain(&self) -> usize {
        self.no_genes_with_domain
    }

    /// The number of the bait's preys in the database
    pub fn no_genes(&self) -> usize {
        self.no_genes
    }

    /// The number of background identifiers with the term
    pub fn background_size_w_domain(&self) -> usize {
        self.background_size_w_domain
    }

    /// The size of the background
    pub fn background_size(&self) -> usize {
        self.background_size
    }

    /// Returns the fold enrichment over the background population
    pub fn fold_enrichment(&self) -> f64 {
        self.fold_enrichment
    }

    /// Returns the p-value of the enrichment
    ///
    /// The p-value indicates the probability that the enrichment
    /// occured by chance
    pub fn pvalue(&self) -> f64 {
        self.pvalue
    }

    /// The Benjamini-Hochberg adjusted p-value
    pub fn adj_pvalue(&self) -> f64 {
        self.adj_pvalue
    }

    /// The Benjamini-Hochberg critical value that the adjusted p-value was compared to
    pub fn bh_fdr(&self) -> f64 {
        self.bh_fdr
    }

    /// The display names of the bait's preys with the term
    pub fn genes(&self) -> &[String] {
        &self.genes
    }
}

/// Calculates the fold enrichment of a term
///
/// The frequency of the term among the bait's preys divided by the frequency
/// of the term in the background. The value is not capped, a term without
/// any background identifiers results in `+inf`.
pub fn fold_enrichment(
    preys_with_term: usize,
    preys_in_database: usize,
    background_with_term: usize,
    background_size: usize,
) -> f64 {
    let bait_fold = f64_from_usize(preys_with_term) / f64_from_usize(preys_in_database);
    let background_fold = f64_from_usize(background_with_term) / f64_from_usize(background_size);
    bait_fold / background_fold
}

struct TermStatistics {
    prey_count: usize,
    background_size_w_domain: usize,
    fold_enrichment: f64,
}

/// Calculates the enrichment of all terms of a bait and returns the significant ones
///
/// Each term is tested with [`fishers_exact_greater`], all p-values of the
/// bait are corrected with [`bh_correction`]. A term is kept if its adjusted
/// p-value is `0` or strictly below its critical value.
///
/// The result is sorted by ascending adjusted p-value, then ascending raw p-value.
/// A bait without terms returns an empty list.
///
/// # Examples
///
/// ```
/// use domain_enrichment::{bait_enrichment, count_by_bait, AnnotationIndex, AnnotationSpan, Background, Interaction, InteractionTable, RawAnnotations};
///
/// let mut raw = RawAnnotations::new();
/// for id in ["P1", "P3", "P4", "P5"] {
///     raw.insert(id, vec![AnnotationSpan::new("d-a", 1, 10)]);
/// }
/// for idx in 0..996 {
///     raw.insert(format!("X{idx}"), vec![AnnotationSpan::new("d-other", 1, 10)]);
/// }
/// let background = Background::all(&raw);
/// let index = AnnotationIndex::build(&raw, &background);
///
/// let table: InteractionTable = vec![
///     Interaction::new("AAA", "P1", "prey1"),
///     Interaction::new("AAA", "X1", "prey2"),
///     Interaction::new("AAA", "P3", "prey3"),
/// ].into_iter().collect();
/// let records = count_by_bait(&table, &index);
///
/// let enriched = bait_enrichment(records.get("AAA").unwrap(), &index, background.len(), 0.01);
/// assert_eq!(enriched.len(), 1);
/// assert_eq!(enriched[0].domain(), "d-a");
/// assert_eq!(enriched[0].genes(), &["prey1", "prey3"]);
/// assert!((enriched[0].fold_enrichment() - 166.666_666).abs() < 1e-3);
/// ```
pub fn bait_enrichment(
    record: &BaitRecord,
    index: &AnnotationIndex,
    background_size: usize,
    fdr: f64,
) -> Vec<EnrichedTerm> {
    let preys_in_database = record.preys_in_database();
    let mut pvalues: TermMap<f64> = TermMap::with_capacity(record.domains().len());
    let mut statistics: TermMap<TermStatistics> = TermMap::with_capacity(record.domains().len());

    for (term, hits) in record.domains() {
        let prey_count = hits.len();
        let background_size_w_domain = index.term_population(term);
        let pvalue = fishers_exact_greater(
            u64_from_usize(prey_count),
            u64_from_usize(preys_in_database),
            u64_from_usize(background_size_w_domain),
            u64_from_usize(background_size),
        );
        pvalues.insert(term, pvalue);
        statistics.insert(
            term,
            TermStatistics {
                prey_count,
                background_size_w_domain,
                fold_enrichment: fold_enrichment(
                    prey_count,
                    preys_in_database,
                    background_size_w_domain,
                    background_size,
                ),
            },
        );
    }

    let corrected = bh_correction(&pvalues, fdr);

    // ties of both p-values keep the order of `corrected`
    let mut candidates: Vec<_> = corrected.iter().collect();
    candidates.sort_by(|a, b| {
        a.1.adj_pvalue()
            .total_cmp(&b.1.adj_pvalue())
            .then_with(|| a.1.pvalue().total_cmp(&b.1.pvalue()))
    });

    let enriched: Vec<EnrichedTerm> = candidates
        .into_iter()
        .filter(|(_, value)| value.is_significant())
        .filter_map(|(term, value)| {
            let stats = statistics.get(term)?;
            let hits = record.domain(term)?;
            Some(EnrichedTerm {
                domain: term.to_string(),
                no_genes_with_domain: stats.prey_count,
                no_genes: preys_in_database,
                background_size_w_domain: stats.background_size_w_domain,
                background_size,
                fold_enrichment: stats.fold_enrichment,
                pvalue: value.pvalue(),
                adj_pvalue: value.adj_pvalue(),
                bh_fdr: value.critical_value(),
                genes: hits.preys().to_vec(),
            })
        })
        .collect();

    debug!(
        "Tested {} terms, {} enriched (fdr {})",
        corrected.len(),
        enriched.len(),
        fdr
    );
    enriched
}
