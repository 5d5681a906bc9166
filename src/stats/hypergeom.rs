//! One-sided exact test for the over-representation of a term
//!
//! The test is based on a 2x2 contingency table:
//!
//! ```text
//!                 with term   without term  |
//! bait preys      n11         n12           | n1p
//! other preys     n21         n22           |
//!                 ---------------------------
//!                 np1                         npp
//! ```
//!
//! and calculates the probability to observe `n11` or more preys
//! with the term within the hypergeometric distribution.
use statrs::distribution::{DiscreteCDF, Hypergeometric};
use tracing::{trace, warn};

/// A 2x2 contingency table of counts
///
/// Cells are signed, so that tables built from inconsistent margins
/// can be represented (and rejected by [`ContingencyTable::pvalue_greater`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContingencyTable {
    n11: i64,
    n12: i64,
    n21: i64,
    n22: i64,
}

impl ContingencyTable {
    /// Constructs a new [`ContingencyTable`] from its four cells
    pub fn new(n11: i64, n12: i64, n21: i64, n22: i64) -> Self {
        Self { n11, n12, n21, n22 }
    }

    /// Builds the table from the number of bait preys with the term (`n11`),
    /// the total bait preys (`n1p`), the background population with the
    /// term (`np1`) and the full background (`npp`)
    pub fn from_margins(n11: u64, n1p: u64, np1: u64, npp: u64) -> Self {
        let (n11, n1p, np1, npp) = (signed(n11), signed(n1p), signed(np1), signed(npp));
        let n12 = n1p - n11;
        let n21 = np1 - n11;
        let n22 = npp - n1p - n21;
        Self { n11, n12, n21, n22 }
    }

    /// The four cells as `[[n11, n12], [n21, n22]]`
    pub fn cells(&self) -> [[i64; 2]; 2] {
        [[self.n11, self.n12], [self.n21, self.n22]]
    }

    /// Calculates the one-sided (`greater`) p-value of the table
    ///
    /// This is the probability of observing `n11` or more successes
    /// when drawing `n11 + n12` items from a population of all four cells,
    /// containing `n11 + n21` successes.
    ///
    /// Returns `NaN` if the table contains negative counts.
    pub fn pvalue_greater(&self) -> f64 {
        if self.n11 < 0 || self.n12 < 0 || self.n21 < 0 || self.n22 < 0 {
            warn!("Invalid contingency table {:?}", self.cells());
            return f64::NAN;
        }
        let population = unsigned(self.n11 + self.n12 + self.n21 + self.n22);
        let successes = unsigned(self.n11 + self.n21);
        let draws = unsigned(self.n11 + self.n12);
        let observed = unsigned(self.n11);

        let Ok(hyper) = Hypergeometric::new(population, successes, draws) else {
            warn!(
                "Invalid hypergeometric distribution: Population: {}, Successes: {}, Draws: {}",
                population, successes, draws
            );
            return f64::NAN;
        };

        // subtracting 1, because we want to test including observed
        // e.g. "7 or more", but sf by default calculates "more than 7"
        let pvalue = match observed.checked_sub(1) {
            Some(x) => hyper.sf(x),
            None => 1.0,
        };
        trace!(
            "Population: {}, Successes: {}, Draws: {}, Observed: {} => {}",
            population,
            successes,
            draws,
            observed,
            pvalue
        );
        pvalue
    }
}

fn signed(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn unsigned(n: i64) -> u64 {
    u64::try_from(n).unwrap_or_default()
}

/// Calculates the p-value for the over-representation of a term among the bait's preys
///
/// - `n11`: number of bait preys with the term
/// - `n1p`: number of bait preys in the database
/// - `np1`: number of background identifiers with the term
/// - `npp`: size of the background
///
/// The caller must ensure `n11 <= min(n1p, np1)` and `n1p, np1 <= npp`.
/// Otherwise the result is meaningless (most likely `NaN`).
///
/// # Examples
///
/// ```
/// use domain_enrichment::stats::fishers_exact_greater;
///
/// let pvalue = fishers_exact_greater(2, 3, 4, 1000);
/// assert!((pvalue - 3.598_789e-5).abs() < 1e-10);
///
/// // no observed preys is never significant
/// assert!((fishers_exact_greater(0, 3, 4, 1000) - 1.0).abs() < f64::EPSILON);
/// ```
pub fn fishers_exact_greater(n11: u64, n1p: u64, np1: u64, npp: u64) -> f64 {
    ContingencyTable::from_margins(n11, n1p, np1, npp).pvalue_greater()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn contingency_table() {
        let table = ContingencyTable::from_margins(2, 3, 4, 1000);
        assert_eq!(table.cells(), [[2, 1], [2, 995]]);
        assert_eq!(table, ContingencyTable::new(2, 1, 2, 995));
    }

    #[test]
    fn two_of_three_preys() {
        let pvalue = fishers_exact_greater(2, 3, 4, 1000);
        assert!((pvalue - 3.598_789_169_929_346_4e-5).abs() < 1e-12);
    }

    #[test]
    fn single_prey() {
        let pvalue = fishers_exact_greater(1, 3, 1, 1000);
        assert!((pvalue - 0.003).abs() < 1e-12);

        let pvalue = fishers_exact_greater(1, 2, 1, 1000);
        assert!((pvalue - 0.002).abs() < 1e-12);

        let pvalue = fishers_exact_greater(1, 2, 4, 1000);
        assert!((pvalue - 0.007_987_987_987_994_435).abs() < 1e-12);
    }

    #[test]
    fn strong_enrichment() {
        let pvalue = fishers_exact_greater(10, 15, 15, 100);
        assert!((pvalue - 3.999_080_874_378_401e-7).abs() < 1e-12);
    }

    #[test]
    fn ubiquitous_term() {
        let pvalue = fishers_exact_greater(3, 3, 1000, 1000);
        assert!((pvalue - 1.0).abs() < 1e-12);
    }

    #[test]
    fn all_term_carriers_drawn() {
        // every identifier with the term is a bait prey
        let pvalue = fishers_exact_greater(4, 10, 4, 1000);
        assert!((pvalue - 5.070_366_455_121_924e-9).abs() < 1e-14);
    }

    #[test]
    fn invalid_margins() {
        assert!(fishers_exact_greater(5, 3, 4, 1000).is_nan());
        assert!(ContingencyTable::new(1, -1, 0, 0).pvalue_greater().is_nan());
    }
}
