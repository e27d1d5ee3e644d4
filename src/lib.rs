//! `gsea` tests lists of genes for over-representation of functional
//! annotations, such as Gene Ontology terms, KEGG pathways, Pfam domains
//! or KOG groups.
//!
//! A typical use-case is the characterisation of marker genes of a
//! single-cell cluster: Which biological processes are represented more
//! often in the marker genes than expected by chance?
//!
//! The crate is built around three parts:
//! - [`GeneSetIndex`] holds all terms of an annotation database together
//!   with the genes they annotate. It is parsed from an annotation file
//!   through one of the [`parser`] formats.
//! - [`GeneList`] is the set of query (foreground) genes.
//! - [`stats::hypergeom`] runs a one-sided hypergeometric test for every term
//!   and returns an [`EnrichmentTable`], which can be corrected for multiple
//!   testing and written to disk with the [`export`] module.
//!
//! # Examples
//!
//! ```
//! use gsea::{GeneList, GeneSetIndex};
//! use gsea::parser::Go;
//! use gsea::stats::hypergeom::term_enrichment;
//! use gsea::stats::EnrichmentConfig;
//!
//! let index = GeneSetIndex::from_file("tests/go.anno.tsv", &Go::default()).unwrap();
//! let genes = GeneList::from_file("tests/genes.txt").unwrap();
//!
//! let results = term_enrichment(&genes, &index, &EnrichmentConfig::default());
//!
//! for enrichment in &results {
//!     println!("{}\t{}\t{:e}", enrichment.id(), enrichment.name(), enrichment.pvalue());
//! }
//! ```
use core::fmt::Debug;
use thiserror::Error;

pub mod analysis;
pub mod annotations;
pub mod export;
mod gene_list;
mod index;
pub mod parser;
pub mod stats;

pub use analysis::{Analysis, AnnotationSource, NamedResult};
pub use annotations::{GeneId, Genes, Term, TermId};
pub use gene_list::GeneList;
pub use index::{Builder, GeneSetIndex, TermGenes};
pub use stats::{Enrichment, EnrichmentConfig, EnrichmentTable};

/// Terms with an overlap of this many genes or fewer are never tested
const DEFAULT_MIN_COUNT: usize = 1;
/// Default significance cutoff for raw and adjusted p-values
const DEFAULT_PVALUE_THRESHOLD: f64 = 0.05;

/// Main Error type for this crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GseaError {
    /// Input file is not present or can't be read
    #[error("cannot open file {0}")]
    CannotOpenFile(String),
    /// Output file or directory can't be created or written
    #[error("cannot write file {0}")]
    CannotWriteFile(String),
    /// Input data is malformed
    #[error("invalid input data: {0}")]
    InvalidInput(String),
    /// Requested output encoding is not supported
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),
    /// The spreadsheet writer failed
    #[error("unable to create spreadsheet: {0}")]
    Spreadsheet(String),
}

/// Shortcut for `Result<T, GseaError>`
pub type GseaResult<T> = Result<T, GseaError>;
