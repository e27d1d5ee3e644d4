use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::annotations::{GeneId, Genes};
use crate::{GseaError, GseaResult};

/// The query (foreground) genes of an enrichment analysis
///
/// A [`GeneList`] is usually the list of marker genes of a cluster. All
/// identifiers are normalized (trimmed and lower-cased), blank entries are
/// dropped and duplicates are only counted once.
///
/// # Examples
///
/// ```
/// use gsea::GeneList;
///
/// let genes = GeneList::new(["NAT2", " nat2", "", "EZH2\n"]);
/// assert_eq!(genes.len(), 2);
/// assert!(genes.contains(&"ezh2".into()));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GeneList {
    genes: Genes,
}

impl GeneList {
    /// Constructs a [`GeneList`] from gene identifiers
    pub fn new<I, S>(genes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        genes.into_iter().collect()
    }

    /// Reads a gene list file with one gene per line
    ///
    /// # Errors
    ///
    /// - [`GseaError::CannotOpenFile`]: Source file not present or can't be opened
    /// - [`GseaError::InvalidInput`]: The file contains invalid UTF-8 data
    pub fn from_file<P: AsRef<Path>>(file: P) -> GseaResult<Self> {
        Self::read(file, false)
    }

    /// Reads a gene list file with one gene per line and a header line
    ///
    /// The first line is ignored.
    ///
    /// # Errors
    ///
    /// - [`GseaError::CannotOpenFile`]: Source file not present or can't be opened
    /// - [`GseaError::InvalidInput`]: The file contains invalid UTF-8 data
    pub fn from_file_with_header<P: AsRef<Path>>(file: P) -> GseaResult<Self> {
        Self::read(file, true)
    }

    fn read<P: AsRef<Path>>(file: P, header: bool) -> GseaResult<Self> {
        let filename = file.as_ref().display().to_string();
        let file = File::open(file).map_err(|_| GseaError::CannotOpenFile(filename.clone()))?;
        let mut lines = BufReader::new(file).lines();
        if header {
            if let Some(line) = lines.next() {
                let line = line.map_err(|_| GseaError::InvalidInput(filename.clone()))?;
                debug!("Skipping gene list header {}", line);
            }
        }
        let mut genes = Genes::new();
        for line in lines {
            let gene = GeneId::new(&line.map_err(|_| GseaError::InvalidInput(filename.clone()))?);
            if !gene.is_empty() {
                genes.insert(gene);
            }
        }
        debug!("Read {} genes from {}", genes.len(), filename);
        Ok(Self { genes })
    }

    /// Returns the number of unique genes
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Returns `true` if the list does not contain any gene
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Returns `true` if the gene is part of the list
    pub fn contains(&self, gene: &GeneId) -> bool {
        self.genes.contains(gene)
    }

    /// Adds a gene to the list
    ///
    /// Returns whether the gene was newly added. Blank identifiers are ignored.
    pub fn insert<G: Into<GeneId>>(&mut self, gene: G) -> bool {
        let gene = gene.into();
        !gene.is_empty() && self.genes.insert(gene)
    }

    /// Returns an iterator of all genes
    pub fn iter(&self) -> std::collections::hash_set::Iter<'_, GeneId> {
        self.genes.iter()
    }

    /// Returns the underlying set of genes
    pub fn genes(&self) -> &Genes {
        &self.genes
    }

    /// Returns the number of genes that are also part of `other`
    pub fn overlap(&self, other: &Genes) -> usize {
        if self.genes.len() <= other.len() {
            self.genes.iter().filter(|gene| other.contains(*gene)).count()
        } else {
            other.iter().filter(|gene| self.genes.contains(*gene)).count()
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for GeneList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut list = GeneList::default();
        for gene in iter {
            list.insert(gene.as_ref());
        }
        list
    }
}

impl<'a> IntoIterator for &'a GeneList {
    type Item = &'a GeneId;
    type IntoIter = std::collections::hash_set::Iter<'a, GeneId>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
