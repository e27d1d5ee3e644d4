use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::debug;

use crate::annotations::{GeneId, Genes, Term, TermId, TermIds};
use crate::parser::AnnotationRow;
use crate::GeneSetIndex;

/// Collects gene annotations and builds a [`GeneSetIndex`]
///
/// All parsers feed their rows into a [`Builder`]. Once all annotations
/// are added, [`Builder::build`] freezes the data into an immutable
/// [`GeneSetIndex`].
///
/// Every gene of the annotation table is part of the universe, even if
/// none of its annotations could be parsed.
///
/// # Examples
///
/// ```
/// use gsea::{Builder, Term};
///
/// let autophagy = Term::new("GO:0006914", "autophagy", Some("biological_process"));
///
/// let mut builder = Builder::new();
/// builder.add_annotation("Gene1", &autophagy);
/// builder.add_annotation("gene1", &autophagy);
/// builder.add_annotation("gene2", &autophagy);
///
/// let index = builder.build();
/// assert_eq!(index.len(), 1);
/// assert_eq!(index.universe_size(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    terms: HashMap<TermId, Term>,
    term_genes: HashMap<TermId, Genes>,
    gene_terms: HashMap<GeneId, TermIds>,
    universe: Genes,
}

impl Builder {
    /// Constructs a new, empty [`Builder`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of terms added so far
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if no term was added yet
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Registers a [`Term`] without connecting any genes to it
    ///
    /// The name and class of the first registration of a [`TermId`] are
    /// kept, later registrations do not change them.
    ///
    /// Returns whether the term was newly added.
    pub fn add_term(&mut self, term: &Term) -> bool {
        match self.terms.entry(term.id().clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(term.clone());
                self.term_genes.insert(term.id().clone(), Genes::new());
                true
            }
        }
    }

    /// Adds a gene to the universe without connecting it to a term
    ///
    /// Returns whether the gene is new. Blank identifiers are ignored.
    pub fn add_gene<G: Into<GeneId>>(&mut self, gene: G) -> bool {
        let gene = gene.into();
        !gene.is_empty() && self.universe.insert(gene)
    }

    /// Connects a gene to a [`Term`]
    ///
    /// The term is registered if it was not seen before. The gene
    /// becomes part of the universe.
    ///
    /// Returns whether the connection is new.
    pub fn add_annotation<G: Into<GeneId>>(&mut self, gene: G, term: &Term) -> bool {
        let gene = gene.into();
        if gene.is_empty() {
            debug!("Ignoring empty gene for {}", term.id());
            return false;
        }
        self.add_term(term);
        self.universe.insert(gene.clone());

        let is_new = self
            .term_genes
            .get_mut(term.id())
            .map(|genes| genes.insert(gene.clone()))
            .unwrap_or_default();

        self.gene_terms
            .entry(gene)
            .or_default()
            .insert(term.id().clone());

        is_new
    }

    /// Adds all connections of a parsed annotation line
    ///
    /// The genes of the row join the universe, also when the row has no terms.
    pub fn add_row(&mut self, row: AnnotationRow) {
        for gene in row.genes() {
            self.add_gene(gene.clone());
        }
        for term in row.terms() {
            for gene in row.genes() {
                self.add_annotation(gene.clone(), term);
            }
        }
    }

    /// Finalizes the [`GeneSetIndex`]
    #[must_use]
    pub fn build(self) -> GeneSetIndex {
        debug!(
            "Building index with {} terms and {} genes",
            self.terms.len(),
            self.universe.len()
        );
        GeneSetIndex::new(self.terms, self.term_genes, self.gene_terms, self.universe)
    }
}
