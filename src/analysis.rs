//! Run the enrichment of one gene list against several annotation databases
//!
//! [`Analysis`] bundles a [`GeneList`] with one [`GeneSetIndex`] per
//! [`AnnotationSource`]. GO annotations are additionally tested per
//! namespace (`bp`, `cc`, `mf`).
//!
//! # Examples
//!
//! ```
//! use gsea::{Analysis, AnnotationSource};
//! use gsea::export::OutputFormat;
//!
//! let analysis = Analysis::from_file("tests/genes.txt")
//!     .unwrap()
//!     .with_annotation(AnnotationSource::Go, "tests/go.anno.tsv")
//!     .unwrap()
//!     .with_annotation(AnnotationSource::Kegg, "tests/kegg.anno.tsv")
//!     .unwrap()
//!     .with_correction(Some(0.05));
//!
//! let results = analysis.run();
//! let names: Vec<&str> = results.iter().map(|res| res.name()).collect();
//! assert_eq!(names, ["go_res", "go_bp_res", "go_cc_res", "go_mf_res", "kegg_res"]);
//!
//! let dir = tempfile::tempdir().unwrap();
//! let files = analysis.save(dir.path(), OutputFormat::Tsv).unwrap();
//! assert_eq!(files.len(), 10);
//! ```
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, warn};

use crate::export::{OutputFormat, ResultExporter};
use crate::parser::{namespace_abbreviation, Go, Kegg, Kog, Pfam};
use crate::stats::hypergeom::term_enrichment;
use crate::{EnrichmentConfig, EnrichmentTable, GeneList, GeneSetIndex, GseaError, GseaResult};

/// The annotation databases an [`Analysis`] can use
///
/// The order of the variants is the order of the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnnotationSource {
    /// Gene Ontology
    Go,
    /// KEGG pathways
    Kegg,
    /// Eukaryotic orthologous groups
    Kog,
    /// Pfam protein domains
    Pfam,
    /// Gene sets in GMT format
    Gmt,
}

impl AnnotationSource {
    /// The stem of result names, e.g. `go` for `go_res`
    pub fn stem(&self) -> &'static str {
        match self {
            AnnotationSource::Go => "go",
            AnnotationSource::Kegg => "kegg",
            AnnotationSource::Kog => "kog",
            AnnotationSource::Pfam => "pfam",
            AnnotationSource::Gmt => "gmt",
        }
    }

    /// Parses an annotation file in the layout of the source
    ///
    /// # Errors
    ///
    /// - [`GseaError::CannotOpenFile`]: Source file not present or can't be opened
    /// - [`GseaError::InvalidInput`]: The file contains malformed lines
    pub fn load<P: AsRef<Path>>(&self, file: P) -> GseaResult<GeneSetIndex> {
        match self {
            AnnotationSource::Go => GeneSetIndex::from_file(file, &Go::default()),
            AnnotationSource::Kegg => GeneSetIndex::from_file(file, &Kegg::default()),
            AnnotationSource::Kog => GeneSetIndex::from_file(file, &Kog),
            AnnotationSource::Pfam => GeneSetIndex::from_file(file, &Pfam::default()),
            AnnotationSource::Gmt => GeneSetIndex::from_gmt(file),
        }
    }
}

impl FromStr for AnnotationSource {
    type Err = GseaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "go" => Ok(AnnotationSource::Go),
            "kegg" => Ok(AnnotationSource::Kegg),
            "kog" => Ok(AnnotationSource::Kog),
            "pfam" => Ok(AnnotationSource::Pfam),
            "gmt" => Ok(AnnotationSource::Gmt),
            _ => Err(GseaError::InvalidInput(format!(
                "unknown annotation source {s}"
            ))),
        }
    }
}

impl Display for AnnotationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.stem())
    }
}

/// One result table together with its name
#[derive(Debug, Clone, PartialEq)]
pub struct NamedResult {
    name: String,
    table: EnrichmentTable,
}

impl NamedResult {
    /// The result name, such as `go_bp_res`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The enriched terms
    pub fn table(&self) -> &EnrichmentTable {
        &self.table
    }

    /// Consumes `self` and returns the table
    pub fn into_table(self) -> EnrichmentTable {
        self.table
    }
}

/// Enrichment analysis of one gene list
#[derive(Debug, Clone)]
pub struct Analysis {
    genes: GeneList,
    indexes: BTreeMap<AnnotationSource, GeneSetIndex>,
    config: EnrichmentConfig,
    correction: Option<f64>,
}

impl Analysis {
    /// Constructs a new [`Analysis`] without any annotations
    pub fn new(genes: GeneList) -> Self {
        Self {
            genes,
            indexes: BTreeMap::new(),
            config: EnrichmentConfig::default(),
            correction: None,
        }
    }

    /// Reads the gene list from a file with one gene per line
    ///
    /// # Errors
    ///
    /// - [`GseaError::CannotOpenFile`]: Source file not present or can't be opened
    /// - [`GseaError::InvalidInput`]: The file contains invalid UTF-8 data
    pub fn from_file<P: AsRef<Path>>(file: P) -> GseaResult<Self> {
        Ok(Self::new(GeneList::from_file(file)?))
    }

    /// Loads the annotation file of `source`
    ///
    /// Loading the same source twice replaces the previous annotations.
    ///
    /// # Errors
    ///
    /// - [`GseaError::CannotOpenFile`]: Source file not present or can't be opened
    /// - [`GseaError::InvalidInput`]: The file contains malformed lines
    pub fn with_annotation<P: AsRef<Path>>(
        self,
        source: AnnotationSource,
        file: P,
    ) -> GseaResult<Self> {
        let index = source.load(file)?;
        Ok(self.with_index(source, index))
    }

    /// Uses an already built [`GeneSetIndex`] for `source`
    #[must_use]
    pub fn with_index(mut self, source: AnnotationSource, index: GeneSetIndex) -> Self {
        if self.indexes.insert(source, index).is_some() {
            warn!("Replacing {} annotations", source);
        }
        self
    }

    /// Sets the thresholds of the hypergeometric test
    #[must_use]
    pub fn with_config(mut self, config: EnrichmentConfig) -> Self {
        self.config = config;
        self
    }

    /// Enables Benjamini-Hochberg correction with the given cutoff
    ///
    /// `None` reports raw p-values.
    #[must_use]
    pub fn with_correction(mut self, threshold: Option<f64>) -> Self {
        self.correction = threshold;
        self
    }

    /// The query genes
    pub fn genes(&self) -> &GeneList {
        &self.genes
    }

    /// The annotations of `source`, if loaded
    pub fn index(&self, source: AnnotationSource) -> Option<&GeneSetIndex> {
        self.indexes.get(&source)
    }

    /// Tests the gene list against all loaded annotations
    ///
    /// Every source yields one `<source>_res` table. GO annotations also
    /// yield `go_bp_res`, `go_cc_res` and `go_mf_res` for every namespace
    /// that is present.
    pub fn run(&self) -> Vec<NamedResult> {
        let mut results = Vec::new();
        for (source, index) in &self.indexes {
            info!(
                "Testing {} genes against {} {} terms",
                self.genes.len(),
                index.len(),
                source
            );
            results.push(self.named(format!("{}_res", source.stem()), index));

            if *source == AnnotationSource::Go {
                for (namespace, sub_index) in index.partition_by_class() {
                    match namespace_abbreviation(&namespace) {
                        Some(abbr) => results.push(self.named(format!("go_{abbr}_res"), &sub_index)),
                        None => warn!("Skipping unknown GO namespace {}", namespace),
                    }
                }
            }
        }
        results
    }

    /// Runs the analysis and saves all non-empty results into `dir`
    ///
    /// Returns the paths of all written files.
    ///
    /// # Errors
    ///
    /// - [`GseaError::CannotWriteFile`]: A file or the directory can't be created
    /// - [`GseaError::Spreadsheet`]: The xlsx encoder failed
    pub fn save<P: AsRef<Path>>(&self, dir: P, format: OutputFormat) -> GseaResult<Vec<PathBuf>> {
        let exporter = ResultExporter::new(dir)?;
        let mut files = Vec::new();
        for result in self.run() {
            if result.table.is_empty() {
                info!("No enriched terms in {}", result.name);
                continue;
            }
            files.extend(exporter.save(&result.name, &result.table, format)?);
        }
        Ok(files)
    }

    fn named(&self, name: String, index: &GeneSetIndex) -> NamedResult {
        let table = term_enrichment(&self.genes, index, &self.config);
        let table = match self.correction {
            Some(threshold) => table.adjust(threshold),
            None => table,
        };
        info!("{}: {} enriched terms", name, table.len());
        NamedResult { name, table }
    }
}
