//! Bait-prey interactions, e.g. from a SAINT analysis
//!
//! An [`InteractionTable`] holds one [`Interaction`] per bait-prey pair.
//! The table can be filtered for significant preys and the prey identifiers
//! can be remapped to the identifiers used by the annotations via an [`IdMap`].
use std::collections::{HashMap, HashSet};

use tracing::debug;

/// A single bait-prey interaction
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interaction {
    bait: String,
    prey: String,
    prey_gene: String,
    avg_spec: f64,
    bfdr: f64,
}

impl Interaction {
    /// Constructs a new [`Interaction`] without spectral count and BFDR (both `0`)
    pub fn new<B, P, G>(bait: B, prey: P, prey_gene: G) -> Self
    where
        B: Into<String>,
        P: Into<String>,
        G: Into<String>,
    {
        Self {
            bait: bait.into(),
            prey: prey.into(),
            prey_gene: prey_gene.into(),
            avg_spec: 0.0,
            bfdr: 0.0,
        }
    }

    /// Sets the average spectral count
    #[must_use]
    pub fn with_avg_spec(mut self, avg_spec: f64) -> Self {
        self.avg_spec = avg_spec;
        self
    }

    /// Sets the bayesian FDR of the interaction
    #[must_use]
    pub fn with_bfdr(mut self, bfdr: f64) -> Self {
        self.bfdr = bfdr;
        self
    }

    /// The bait
    pub fn bait(&self) -> &str {
        &self.bait
    }

    /// The prey identifier, used to look up annotations
    pub fn prey(&self) -> &str {
        &self.prey
    }

    /// The display name of the prey, most likely the gene symbol
    pub fn prey_gene(&self) -> &str {
        &self.prey_gene
    }

    /// The average spectral count
    pub fn avg_spec(&self) -> f64 {
        self.avg_spec
    }

    /// The bayesian FDR of the interaction
    pub fn bfdr(&self) -> f64 {
        self.bfdr
    }
}

/// Ordered collection of [`Interaction`]s
///
/// The same bait is expected to appear in many rows, one row per bait-prey pair.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InteractionTable {
    rows: Vec<Interaction>,
}

impl InteractionTable {
    /// Constructs a new, empty [`InteractionTable`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an interaction
    pub fn push(&mut self, row: Interaction) {
        self.rows.push(row);
    }

    /// The number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterator of all rows
    pub fn iter(&self) -> std::slice::Iter<'_, Interaction> {
        self.rows.iter()
    }

    /// Returns all distinct baits, in the order they first appear
    pub fn baits(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(Interaction::bait)
            .filter(|bait| seen.insert(*bait))
            .collect()
    }

    /// Returns a new table with only significant preys
    ///
    /// Keeps all rows with a BFDR of at most `fdr`. If `top_preys` is
    /// greater than `0`, the rows are sorted by bait and descending average
    /// spectral count (`NaN` last) and only the first `top_preys` rows of each
    /// bait are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use domain_enrichment::{Interaction, InteractionTable};
    ///
    /// let table: InteractionTable = vec![
    ///     Interaction::new("AAA", "P1", "prey1").with_avg_spec(10.0).with_bfdr(0.01),
    ///     Interaction::new("AAA", "P2", "prey2").with_avg_spec(20.0).with_bfdr(0.02),
    ///     Interaction::new("AAA", "P3", "prey3").with_avg_spec(30.0).with_bfdr(0.0),
    /// ].into_iter().collect();
    ///
    /// let filtered = table.filter(0.01, 0);
    /// assert_eq!(filtered.len(), 2);
    ///
    /// let top = table.filter(0.01, 1);
    /// assert_eq!(top.iter().next().unwrap().prey(), "P3");
    /// ```
    pub fn filter(&self, fdr: f64, top_preys: usize) -> InteractionTable {
        let mut rows: Vec<Interaction> = self
            .rows
            .iter()
            .filter(|row| row.bfdr <= fdr)
            .cloned()
            .collect();

        if top_preys > 0 {
            rows.sort_by(|a, b| {
                // missing (NaN) spectral counts sort last
                a.bait
                    .cmp(&b.bait)
                    .then_with(|| a.avg_spec.is_nan().cmp(&b.avg_spec.is_nan()))
                    .then_with(|| b.avg_spec.total_cmp(&a.avg_spec))
            });
            let mut kept: HashMap<String, usize> = HashMap::new();
            rows.retain(|row| {
                let count = kept.entry(row.bait.clone()).or_insert(0);
                *count += 1;
                *count <= top_preys
            });
        }

        debug!(
            "Filtered interactions: {} of {} rows kept (fdr {}, top preys {})",
            rows.len(),
            self.rows.len(),
            fdr,
            top_preys
        );
        InteractionTable { rows }
    }

    /// Replaces all prey identifiers using the [`IdMap`]
    ///
    /// See [`IdMap::map`] for details
    #[must_use]
    pub fn remap(mut self, map: &IdMap) -> InteractionTable {
        for row in &mut self.rows {
            row.prey = map.map(&row.prey);
        }
        self
    }
}

impl<'a> IntoIterator for &'a InteractionTable {
    type Item = &'a Interaction;
    type IntoIter = std::slice::Iter<'a, Interaction>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Interaction> for InteractionTable {
    fn from_iter<T: IntoIterator<Item = Interaction>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Maps prey identifiers to the identifiers used by the annotations
///
/// # Examples
///
/// ```
/// use domain_enrichment::IdMap;
///
/// let map = IdMap::from_lists(vec![
///     ("1234", vec!["NP_001.1", "NP_001"]),
///     ("5678", vec!["NP_002"]),
/// ]);
///
/// assert_eq!(map.map("NP_001.3"), "1234");
/// assert_eq!(map.map("NP_002"), "5678");
/// assert_eq!(map.map("NP_999.2"), "NP_999");
/// ```
#[derive(Debug, Default, Clone)]
pub struct IdMap {
    inner: HashMap<String, String>,
}

impl IdMap {
    /// Constructs a new, empty [`IdMap`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the map from target identifiers and their source identifiers
    ///
    /// If a source identifier is listed for multiple targets, the last one wins.
    pub fn from_lists<T, S, I>(lists: I) -> Self
    where
        T: Into<String>,
        S: Into<String>,
        I: IntoIterator<Item = (T, Vec<S>)>,
    {
        let mut map = IdMap::new();
        for (target, sources) in lists {
            let target = target.into();
            for source in sources {
                map.insert(source, target.clone());
            }
        }
        map
    }

    /// Maps `source` to `target`
    pub fn insert<S: Into<String>, T: Into<String>>(&mut self, source: S, target: T) {
        self.inner.insert(source.into(), target.into());
    }

    /// The number of mapped source identifiers
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the map is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Maps an identifier
    ///
    /// Any version suffix (everything from the first `.`) is removed first.
    /// If the unversioned identifier is not part of the map, it is returned as is.
    pub fn map(&self, id: &str) -> String {
        let unversioned = id.split('.').next().unwrap_or(id);
        self.inner
            .get(unversioned)
            .map_or_else(|| unversioned.to_string(), String::clone)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn saint() -> InteractionTable {
        [
            ("AAA", "P11111", "prey1", 10.0, 0.01),
            ("AAA", "P22222", "prey2", 20.0, 0.0),
            ("AAA", "P33333", "prey3", 30.0, 0.02),
            ("AAA", "P44444", "prey4", 15.0, 0.01),
            ("AAA", "P55555", "prey5", 25.0, 0.01),
            ("AAA", "P66666", "prey6", 40.0, 0.01),
            ("BBB", "P11111", "prey1", 10.0, 0.05),
            ("BBB", "P22222", "prey2", 20.0, 0.01),
            ("BBB", "P77777", "prey7", 30.0, 0.01),
        ]
        .into_iter()
        .map(|(bait, prey, gene, spec, bfdr)| {
            Interaction::new(bait, prey, gene)
                .with_avg_spec(spec)
                .with_bfdr(bfdr)
        })
        .collect()
    }

    fn preys(table: &InteractionTable) -> Vec<(&str, &str)> {
        table.iter().map(|row| (row.bait(), row.prey())).collect()
    }

    #[test]
    fn filter() {
        let filtered = saint().filter(0.01, 0);
        assert_eq!(
            preys(&filtered),
            vec![
                ("AAA", "P11111"),
                ("AAA", "P22222"),
                ("AAA", "P44444"),
                ("AAA", "P55555"),
                ("AAA", "P66666"),
                ("BBB", "P22222"),
                ("BBB", "P77777"),
            ]
        );
    }

    #[test]
    fn filter_top_preys() {
        let filtered = saint().filter(0.01, 4);
        assert_eq!(
            preys(&filtered),
            vec![
                ("AAA", "P66666"),
                ("AAA", "P55555"),
                ("AAA", "P22222"),
                ("AAA", "P44444"),
                ("BBB", "P77777"),
                ("BBB", "P22222"),
            ]
        );
    }

    #[test]
    fn filter_top_preys_with_nan() {
        let table: InteractionTable = [("P1", 1.0), ("P2", f64::NAN), ("P3", 30.0), ("P4", 20.0)]
            .into_iter()
            .map(|(prey, spec)| {
                Interaction::new("AAA", prey, "gene")
                    .with_avg_spec(spec)
                    .with_bfdr(0.0)
            })
            .collect();

        let filtered = table.filter(0.01, 2);
        assert_eq!(preys(&filtered), vec![("AAA", "P3"), ("AAA", "P4")]);

        let filtered = table.filter(0.01, 4);
        assert_eq!(filtered.iter().last().unwrap().prey(), "P2");
    }

    #[test]
    fn baits_in_order() {
        let mut table = saint();
        table.push(Interaction::new("AAA", "P9", "prey9"));
        table.push(Interaction::new("CCC", "P9", "prey9"));
        assert_eq!(table.baits(), vec!["AAA", "BBB", "CCC"]);
    }

    #[test]
    fn remap_preys() {
        let mut map = IdMap::new();
        map.insert("P11111", "1");
        let table: InteractionTable = vec![
            Interaction::new("AAA", "P11111.2", "prey1"),
            Interaction::new("AAA", "P22222.1", "prey2"),
            Interaction::new("AAA", "P33333", "prey3"),
        ]
        .into_iter()
        .collect();

        let remapped = table.remap(&map);
        let ids: Vec<&str> = remapped.iter().map(Interaction::prey).collect();
        assert_eq!(ids, vec!["1", "P22222", "P33333"]);
    }

    #[test]
    fn id_map_from_lists() {
        let map = IdMap::from_lists(vec![("A", vec!["x", "y"]), ("B", vec!["y"])]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.map("x"), "A");
        assert_eq!(map.map("y"), "B");
        assert_eq!(map.map(""), "");
    }
}
