//! Statistical analyses of [`GeneList`](crate::GeneList)s against a [`GeneSetIndex`](crate::GeneSetIndex)
//!
//! This module contains methods to calculate the enrichment of annotation
//! terms within a list of genes, such as the marker genes of a cluster.
//!
//! At the moment, `gsea` provides the hypergeometric enrichment analysis using
//! the survival function ([`hypergeom`]) and the Benjamini-Hochberg
//! correction for multiple testing ([`correction`]).

use std::cmp::Ordering;
use std::fmt::Display;

use tracing::warn;

use crate::annotations::{Term, TermId};
use crate::{DEFAULT_MIN_COUNT, DEFAULT_PVALUE_THRESHOLD};

pub mod correction;
pub mod hypergeom;

/// Thresholds of an enrichment analysis
///
/// # Examples
///
/// ```
/// use gsea::EnrichmentConfig;
///
/// let config = EnrichmentConfig::default();
/// assert_eq!(config.min_count(), 1);
/// assert_eq!(config.pvalue_threshold(), 0.05);
///
/// let config = EnrichmentConfig::default()
///     .with_min_count(2)
///     .with_pvalue_threshold(0.01);
/// assert_eq!(config.min_count(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnrichmentConfig {
    min_count: usize,
    pvalue_threshold: f64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            min_count: DEFAULT_MIN_COUNT,
            pvalue_threshold: DEFAULT_PVALUE_THRESHOLD,
        }
    }
}

impl EnrichmentConfig {
    /// Terms must overlap the gene list with **more** than `min_count` genes
    #[must_use]
    pub fn with_min_count(mut self, min_count: usize) -> Self {
        self.min_count = min_count;
        self
    }

    /// Terms are only reported with a p-value less or equal to `threshold`
    #[must_use]
    pub fn with_pvalue_threshold(mut self, threshold: f64) -> Self {
        self.pvalue_threshold = threshold;
        self
    }

    /// The minimum overlap (exclusive) required to test a term
    pub fn min_count(&self) -> usize {
        self.min_count
    }

    /// The maximum (inclusive) p-value of reported terms
    pub fn pvalue_threshold(&self) -> f64 {
        self.pvalue_threshold
    }
}

/// The p-value and fold enrichment of an enriched term
///
/// [`Enrichment`] is returned from statistics enrichment methods, such as
/// [`hypergeom::term_enrichment`], as part of an [`EnrichmentTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    term: Term,
    pvalue: f64,
    count: usize,
    term_size: usize,
    enrichment: f64,
}

impl Enrichment {
    /// Constructs an `Enrichment` for a [`Term`]
    pub fn new(term: Term, pvalue: f64, count: usize, term_size: usize, enrichment: f64) -> Self {
        Self {
            term,
            pvalue,
            count,
            term_size,
            enrichment,
        }
    }

    /// Returns the [`TermId`] of the enriched term
    pub fn id(&self) -> &TermId {
        self.term.id()
    }

    /// Returns the name of the enriched term
    pub fn name(&self) -> &str {
        self.term.name()
    }

    /// Returns the class of the enriched term
    pub fn class(&self) -> Option<&str> {
        self.term.class()
    }

    /// Returns the p-value of the enrichment
    ///
    /// The p-value indicates the probability that the enrichment
    /// occured by chance. Depending on the [`EnrichmentTable`] it is
    /// the raw or the adjusted p-value.
    pub fn pvalue(&self) -> f64 {
        self.pvalue
    }

    /// Returns the number of genes of the list that are annotated to the term
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the number of genes annotated to the term
    pub fn term_size(&self) -> usize {
        self.term_size
    }

    /// Returns the fold enrichment over the background population
    pub fn enrichment(&self) -> f64 {
        self.enrichment
    }

    /// Returns `-log10(pvalue)`
    ///
    /// A p-value of `0` is treated as the smallest positive `f64`.
    pub fn score(&self) -> f64 {
        -self.pvalue.max(f64::MIN_POSITIVE).log10()
    }

    fn cmp_pvalue(&self, other: &Self) -> Ordering {
        self.pvalue
            .total_cmp(&other.pvalue)
            .then_with(|| self.id().cmp(other.id()))
    }

    fn cmp_enrichment(&self, other: &Self) -> Ordering {
        other
            .enrichment
            .total_cmp(&self.enrichment)
            .then_with(|| self.cmp_pvalue(other))
    }
}

/// All enriched terms of one analysis, ordered by ascending p-value
///
/// # Examples
///
/// ```
/// use gsea::{GeneList, GeneSetIndex};
/// use gsea::parser::Go;
/// use gsea::stats::hypergeom::term_enrichment;
/// use gsea::stats::EnrichmentConfig;
///
/// let index = GeneSetIndex::from_file("tests/go.anno.tsv", &Go::default()).unwrap();
/// let genes = GeneList::from_file("tests/genes.txt").unwrap();
///
/// let table = term_enrichment(&genes, &index, &EnrichmentConfig::default());
/// assert!(!table.is_adjusted());
///
/// let pvalues: Vec<f64> = table.iter().map(|row| row.pvalue()).collect();
/// assert!(pvalues.windows(2).all(|w| w[0] <= w[1]));
///
/// let adjusted = table.adjust(0.05);
/// assert!(adjusted.is_adjusted());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentTable {
    rows: Vec<Enrichment>,
    adjusted: bool,
}

impl EnrichmentTable {
    /// Constructs a new table of raw p-values
    pub fn new(mut rows: Vec<Enrichment>) -> Self {
        rows.sort_by(Enrichment::cmp_pvalue);
        Self {
            rows,
            adjusted: false,
        }
    }

    /// Returns the number of enriched terms
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table does not contain any term
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns `true` if the p-values are adjusted for multiple testing
    pub fn is_adjusted(&self) -> bool {
        self.adjusted
    }

    /// Returns the row at `idx`
    pub fn get(&self, idx: usize) -> Option<&Enrichment> {
        self.rows.get(idx)
    }

    /// Returns an iterator of all rows, ordered by ascending p-value
    pub fn iter(&self) -> std::slice::Iter<'_, Enrichment> {
        self.rows.iter()
    }

    /// Returns all rows, ordered by descending fold enrichment
    ///
    /// Rows with the same enrichment are ordered by p-value.
    pub fn ranked(&self) -> Vec<&Enrichment> {
        let mut rows: Vec<&Enrichment> = self.rows.iter().collect();
        rows.sort_by(|a, b| a.cmp_enrichment(b));
        rows
    }

    /// Corrects the p-values for multiple testing
    ///
    /// All p-values are replaced by their Benjamini-Hochberg adjusted
    /// p-value and only terms with an adjusted p-value less or equal to
    /// `threshold` are kept.
    ///
    /// Adjusting a table a second time does not change it.
    #[must_use]
    pub fn adjust(self, threshold: f64) -> Self {
        if self.adjusted {
            warn!("p-values are already adjusted");
            return self;
        }
        let pvalues: Vec<f64> = self.rows.iter().map(Enrichment::pvalue).collect();
        let adjusted = correction::benjamini_hochberg(&pvalues);

        let mut rows: Vec<Enrichment> = self
            .rows
            .into_iter()
            .zip(adjusted)
            .filter(|(_, pvalue)| *pvalue <= threshold)
            .map(|(mut row, pvalue)| {
                row.pvalue = pvalue;
                row
            })
            .collect();
        rows.sort_by(Enrichment::cmp_pvalue);
        Self {
            rows,
            adjusted: true,
        }
    }

    /// The header of the p-value column
    pub fn pvalue_column(&self) -> &'static str {
        if self.adjusted {
            "Adjusted P-value"
        } else {
            "P-value"
        }
    }

    /// The column names of the tabular representation
    pub fn header(&self) -> [&'static str; 7] {
        [
            "Term",
            "Term_name",
            self.pvalue_column(),
            "Count",
            "Term_size",
            "Fold_enrichment",
            "Score",
        ]
    }

    /// Writes the table as tab separated values, ordered by p-value
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error if writing fails
    pub fn write_tsv<W: std::io::Write>(&self, writer: W) -> std::io::Result<()> {
        write_tsv_rows(self.header(), self.iter(), writer)
    }

    /// Writes the table as tab separated values, ordered by fold enrichment
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error if writing fails
    pub fn write_ranked_tsv<W: std::io::Write>(&self, writer: W) -> std::io::Result<()> {
        write_tsv_rows(self.header(), self.ranked().into_iter(), writer)
    }
}

/// P-values and scores are written in exponent form (`1e-3`)
pub(crate) fn record(row: &Enrichment) -> [String; 7] {
    [
        row.id().to_string(),
        row.name().to_string(),
        format!("{:e}", row.pvalue()),
        row.count().to_string(),
        row.term_size().to_string(),
        row.enrichment().to_string(),
        format!("{:e}", row.score()),
    ]
}

fn write_tsv_rows<'a, I, W>(header: [&str; 7], rows: I, writer: W) -> std::io::Result<()>
where
    I: Iterator<Item = &'a Enrichment>,
    W: std::io::Write,
{
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(record(row))?;
    }
    wtr.flush()
}

impl<'a> IntoIterator for &'a EnrichmentTable {
    type Item = &'a Enrichment;
    type IntoIter = std::slice::Iter<'a, Enrichment>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for EnrichmentTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.header().join("\t"))?;
        for row in self {
            writeln!(f, "{}", record(row).join("\t"))?;
        }
        Ok(())
    }
}

/// We have to frequently do divisions starting with usize values
/// and need to return f64 values.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn f64_from_usize(n: usize) -> f64 {
    n as f64
}

#[cfg(test)]
mod test {
    use super::*;

    fn row(id: &str, pvalue: f64, enrichment: f64) -> Enrichment {
        Enrichment::new(Term::new(id, id, None), pvalue, 3, 10, enrichment)
    }

    fn table() -> EnrichmentTable {
        EnrichmentTable::new(vec![
            row("T3", 0.04, 8.0),
            row("T1", 0.001, 2.0),
            row("T2", 0.01, 5.0),
            row("T0", 0.01, 1.0),
        ])
    }

    #[test]
    fn sorted_by_pvalue() {
        let table = table();
        let ids: Vec<&str> = table.iter().map(|r| r.id().as_str()).collect();
        assert_eq!(ids, vec!["T1", "T0", "T2", "T3"]);
    }

    #[test]
    fn ranked_by_enrichment() {
        let table = table();
        let ids: Vec<&str> = table.ranked().iter().map(|r| r.id().as_str()).collect();
        assert_eq!(ids, vec!["T3", "T2", "T1", "T0"]);
    }

    #[test]
    fn score() {
        assert!((row("T", 0.001, 1.0).score() - 3.0).abs() < 1e-12);
        assert!(row("T", 0.0, 1.0).score().is_finite());
    }

    #[test]
    fn adjust_filters_and_marks() {
        let adjusted = table().adjust(0.02);
        assert!(adjusted.is_adjusted());
        assert_eq!(adjusted.pvalue_column(), "Adjusted P-value");
        assert_eq!(adjusted.len(), 3);
        assert!((adjusted.get(0).unwrap().pvalue() - 0.004).abs() < 1e-12);
        assert!(adjusted.iter().all(|r| r.id().as_str() != "T3"));
    }

    #[test]
    fn adjust_twice_is_noop() {
        let once = table().adjust(1.0);
        let twice = once.clone().adjust(1.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_table() {
        let table = EnrichmentTable::default().adjust(0.05);
        assert!(table.is_empty());
        assert_eq!(
            table.to_string(),
            "Term\tTerm_name\tAdjusted P-value\tCount\tTerm_size\tFold_enrichment\tScore\n"
        );
    }

    #[test]
    fn tsv_output() {
        let mut out = Vec::new();
        table().write_tsv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Term\tTerm_name\tP-value\tCount\tTerm_size\tFold_enrichment\tScore"
        );
        assert!(lines.next().unwrap().starts_with("T1\tT1\t1e-3\t3\t10\t2\t"));
        assert_eq!(lines.count(), 3);
    }

    #[test]
    fn tiny_pvalue_in_exponent_form() {
        let fields = record(&row("T9", 1e-200, 4.0));
        assert_eq!(fields[2], "1e-200");
        assert!(fields[6].len() < 25);
        assert!(fields[6].contains('e'));

        let mut out = Vec::new();
        EnrichmentTable::new(vec![row("T9", 1e-200, 4.0)])
            .write_tsv(&mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().all(|line| line.len() < 80));
    }

    #[test]
    fn ranked_tsv_output() {
        let mut out = Vec::new();
        table().write_ranked_tsv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("T3\t"));
    }
}
