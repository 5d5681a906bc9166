use crate::utils::{Iter, TermMap};

/// A single occurrence of an annotation term on an identifier
///
/// Coordinates are 1-based and inclusive. Spans are not validated,
/// a span with `start > end` results in a negative [`AnnotationSpan::length`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotationSpan {
    #[cfg_attr(feature = "serde", serde(rename = "name"))]
    term: String,
    start: i64,
    end: i64,
}

impl AnnotationSpan {
    /// Constructs a new [`AnnotationSpan`]
    pub fn new<T: Into<String>>(term: T, start: i64, end: i64) -> Self {
        Self {
            term: term.into(),
            start,
            end,
        }
    }

    /// The annotation term, e.g. the name of the protein domain
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The first position of the span
    pub fn start(&self) -> i64 {
        self.start
    }

    /// The last position of the span
    pub fn end(&self) -> i64 {
        self.end
    }

    /// The length of the span, `end - start + 1`
    ///
    /// # Examples
    ///
    /// ```
    /// use domain_enrichment::AnnotationSpan;
    ///
    /// assert_eq!(AnnotationSpan::new("dA", 10, 21).length(), 12);
    /// assert_eq!(AnnotationSpan::new("dA", 5, 5).length(), 1);
    /// ```
    pub fn length(&self) -> i64 {
        self.end - self.start + 1
    }
}

/// The raw annotations of all identifiers, as loaded from external data
///
/// Identifiers are kept in insertion order.
///
/// # Examples
///
/// ```
/// use domain_enrichment::{AnnotationSpan, RawAnnotations};
///
/// let mut raw = RawAnnotations::new();
/// raw.add_span("1", AnnotationSpan::new("dA", 10, 21));
/// raw.add_span("1", AnnotationSpan::new("dB", 30, 45));
/// raw.insert("2", vec![AnnotationSpan::new("dA", 5, 14)]);
///
/// assert_eq!(raw.len(), 2);
/// assert_eq!(raw.get("1").unwrap().len(), 2);
/// assert_eq!(raw.ids().collect::<Vec<&str>>(), vec!["1", "2"]);
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RawAnnotations {
    spans: TermMap<Vec<AnnotationSpan>>,
}

impl RawAnnotations {
    /// Constructs a new, empty [`RawAnnotations`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets all spans of an identifier, replacing previous ones
    pub fn insert<I: Into<String>>(&mut self, id: I, spans: Vec<AnnotationSpan>) {
        self.spans.insert(id, spans);
    }

    /// Appends a single span to the identifier
    pub fn add_span(&mut self, id: &str, span: AnnotationSpan) {
        self.spans.get_or_insert_with(id, Vec::new).push(span);
    }

    /// Returns the spans of an identifier
    pub fn get(&self, id: &str) -> Option<&[AnnotationSpan]> {
        self.spans.get(id).map(Vec::as_slice)
    }

    /// Returns `true` if the identifier has an entry, even without any spans
    pub fn contains(&self, id: &str) -> bool {
        self.spans.contains_key(id)
    }

    /// The number of identifiers
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns `true` if there are no identifiers
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Iterator of all identifiers, in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.spans.keys()
    }

    /// Iterator of all identifiers and their spans, in insertion order
    pub fn iter(&self) -> Iter<'_, Vec<AnnotationSpan>> {
        self.spans.iter()
    }
}

impl<'a> IntoIterator for &'a RawAnnotations {
    type Item = (&'a str, &'a Vec<AnnotationSpan>);
    type IntoIter = Iter<'a, Vec<AnnotationSpan>>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<AnnotationSpan>)> for RawAnnotations {
    fn from_iter<T: IntoIterator<Item = (K, Vec<AnnotationSpan>)>>(iter: T) -> Self {
        Self {
            spans: iter.into_iter().collect(),
        }
    }
}
