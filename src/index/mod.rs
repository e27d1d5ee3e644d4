use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::annotations::{GeneId, Genes, Term, TermId, TermIds};
use crate::parser::{self, namespace_abbreviation, AnnotationFormat, Gmt};
use crate::{GseaError, GseaResult};

mod builder;
pub use builder::Builder;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// `GeneSetIndex` contains all terms of one annotation source and their genes
///
/// The index is the gene-set side of every enrichment analysis. It maps
/// each [`Term`] to the set of genes it annotates, provides the reverse
/// lookup from a gene to its terms and keeps track of the universe, the
/// set of all genes listed in the annotation table.
///
/// The index is immutable. It is created by parsing an annotation file
/// with [`GeneSetIndex::from_file`] or manually through a [`Builder`].
///
/// # Examples
///
/// ```
/// use gsea::GeneSetIndex;
/// use gsea::parser::Go;
///
/// let index = GeneSetIndex::from_file("tests/go.anno.tsv", &Go::default()).unwrap();
///
/// let ribosome = index.term(&"GO:0005840".into()).unwrap();
/// assert_eq!(ribosome.name(), "ribosome");
/// assert_eq!(ribosome.class(), Some("cellular_component"));
/// assert_eq!(ribosome.len(), 4);
///
/// // every gene of the table, including Gene21 without a valid term
/// assert_eq!(index.universe_size(), 21);
///
/// for term in &index {
///     println!("{}\t{}\t{}", term.id(), term.name(), term.len());
/// }
/// ```
///
/// # Layout
///
/// ```mermaid
/// erDiagram
///     GENESETINDEX ||--|{ TERM : contains
///     GENESETINDEX ||--|{ GENE : universe
///     TERM }|--|{ GENE : annotates
///     TERM {
///         str id
///         str name
///         str class
///     }
///     GENE {
///         str id
///     }
/// ```
#[derive(Debug, Default, Clone)]
pub struct GeneSetIndex {
    /// Term ids in ascending order
    ids: Vec<TermId>,
    terms: HashMap<TermId, Term>,
    term_genes: HashMap<TermId, Genes>,
    gene_terms: HashMap<GeneId, TermIds>,
    universe: Genes,
}

impl GeneSetIndex {
    pub(crate) fn new(
        terms: HashMap<TermId, Term>,
        term_genes: HashMap<TermId, Genes>,
        gene_terms: HashMap<GeneId, TermIds>,
        universe: Genes,
    ) -> Self {
        let mut ids: Vec<TermId> = terms.keys().cloned().collect();
        ids.sort();
        Self {
            ids,
            terms,
            term_genes,
            gene_terms,
            universe,
        }
    }

    /// Parses an annotation file in the given format
    ///
    /// # Errors
    ///
    /// - [`GseaError::CannotOpenFile`]: Source file not present or can't be opened
    /// - [`GseaError::InvalidInput`]: A line of the file is missing required columns
    pub fn from_file<P: AsRef<Path>, F: AnnotationFormat + ?Sized>(
        file: P,
        format: &F,
    ) -> GseaResult<Self> {
        let index = parser::parse(file.as_ref(), format)?.build();
        info!(
            "Loaded {} terms and {} genes from {}",
            index.len(),
            index.universe_size(),
            file.as_ref().display()
        );
        Ok(index)
    }

    /// Parses a GMT file
    ///
    /// Shortcut for `GeneSetIndex::from_file(file, &Gmt)`
    ///
    /// # Errors
    ///
    /// [`GseaError::CannotOpenFile`]: Source file not present or can't be opened
    pub fn from_gmt<P: AsRef<Path>>(file: P) -> GseaResult<Self> {
        Self::from_file(file, &Gmt)
    }

    /// Returns the number of terms
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the index does not contain any term
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns all genes that are annotated to at least one term
    pub fn universe(&self) -> &Genes {
        &self.universe
    }

    /// Returns the number of genes in the universe
    pub fn universe_size(&self) -> usize {
        self.universe.len()
    }

    /// Returns `true` if the gene is annotated to any term
    pub fn contains_gene(&self, gene: &GeneId) -> bool {
        self.universe.contains(gene)
    }

    /// Returns the term with its genes
    pub fn term(&self, id: &TermId) -> Option<TermGenes<'_>> {
        let term = self.terms.get(id)?;
        let genes = self.term_genes.get(id)?;
        Some(TermGenes { term, genes })
    }

    /// Returns the genes that are annotated to the term
    pub fn genes_of(&self, id: &TermId) -> Option<&Genes> {
        self.term_genes.get(id)
    }

    /// Returns all terms that annotate the gene
    pub fn terms_of(&self, gene: &GeneId) -> Option<&TermIds> {
        self.gene_terms.get(gene)
    }

    /// Returns an iterator of all terms and their genes, ordered by [`TermId`]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            index: self,
            ids: self.ids.iter(),
        }
    }

    /// Splits the index into one sub-index per term class
    ///
    /// This is mostly used to analyse the three GO namespaces independently.
    /// Each sub-index is a complete [`GeneSetIndex`] whose universe is
    /// restricted to the genes of its own terms. Terms without a class
    /// are not part of any sub-index.
    ///
    /// # Examples
    ///
    /// ```
    /// use gsea::GeneSetIndex;
    /// use gsea::parser::Go;
    ///
    /// let index = GeneSetIndex::from_file("tests/go.anno.tsv", &Go::default()).unwrap();
    /// let namespaces = index.partition_by_class();
    ///
    /// assert_eq!(namespaces.len(), 3);
    /// let bp = &namespaces["biological_process"];
    /// assert!(bp.iter().all(|term| term.class() == Some("biological_process")));
    /// ```
    pub fn partition_by_class(&self) -> BTreeMap<String, GeneSetIndex> {
        let mut builders: BTreeMap<String, Builder> = BTreeMap::new();
        for term in self {
            let Some(class) = term.class() else {
                debug!("Term {} has no class", term.id());
                continue;
            };
            let builder = builders.entry(class.to_string()).or_default();
            builder.add_term(term.term());
            for gene in term.genes() {
                builder.add_annotation(gene.clone(), term.term());
            }
        }
        builders
            .into_iter()
            .map(|(class, builder)| (class, builder.build()))
            .collect()
    }

    /// Writes the index in GMT format
    ///
    /// One line per term, `term <TAB> name <TAB> genes...`. Terms are
    /// ordered by [`TermId`], genes alphabetically. Terms without genes
    /// are omitted since GMT can't represent them.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error if writing fails
    pub fn write_gmt<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for term in self {
            if term.is_empty() {
                continue;
            }
            let mut genes: Vec<&str> = term.genes().iter().map(GeneId::as_str).collect();
            genes.sort_unstable();
            writeln!(writer, "{}\t{}\t{}", term.id(), term.name(), genes.join("\t"))?;
        }
        Ok(())
    }

    /// Saves the index as GMT file
    ///
    /// # Errors
    ///
    /// [`GseaError::CannotWriteFile`]: The file can't be created or written
    pub fn save_gmt<P: AsRef<Path>>(&self, file: P) -> GseaResult<()> {
        let filename = file.as_ref().display().to_string();
        let file = File::create(file).map_err(|_| GseaError::CannotWriteFile(filename.clone()))?;
        let mut writer = BufWriter::new(file);
        self.write_gmt(&mut writer)
            .and_then(|()| writer.flush())
            .map_err(|_| GseaError::CannotWriteFile(filename))
    }

    /// Saves one GMT file per term class
    ///
    /// The files are named `<prefix>_<class>.gmt`. GO namespaces use their
    /// abbreviation (`bp`, `mf`, `cc`), other classes are lower-cased and
    /// non alphanumeric characters are replaced by `_`.
    ///
    /// Returns the paths of all written files.
    ///
    /// # Errors
    ///
    /// [`GseaError::CannotWriteFile`]: A file can't be created or written
    pub fn save_gmt_by_class(&self, prefix: &str) -> GseaResult<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for (class, index) in self.partition_by_class() {
            let path = PathBuf::from(format!("{prefix}_{}.gmt", class_file_stem(&class)));
            index.save_gmt(&path)?;
            paths.push(path);
        }
        Ok(paths)
    }
}

fn class_file_stem(class: &str) -> String {
    if let Some(abbreviation) = namespace_abbreviation(class) {
        return abbreviation.to_string();
    }
    class
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

impl<'a> IntoIterator for &'a GeneSetIndex {
    type Item = TermGenes<'a>;
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A [`Term`] together with its genes
///
/// This is a borrowed view into a [`GeneSetIndex`].
#[derive(Debug, Clone, Copy)]
pub struct TermGenes<'a> {
    term: &'a Term,
    genes: &'a Genes,
}

impl<'a> TermGenes<'a> {
    /// The [`TermId`] of the term
    pub fn id(&self) -> &'a TermId {
        self.term.id()
    }

    /// The name of the term
    pub fn name(&self) -> &'a str {
        self.term.name()
    }

    /// The class of the term, if present
    pub fn class(&self) -> Option<&'a str> {
        self.term.class()
    }

    /// The [`Term`] record
    pub fn term(&self) -> &'a Term {
        self.term
    }

    /// All genes annotated to the term
    pub fn genes(&self) -> &'a Genes {
        self.genes
    }

    /// Returns the number of genes annotated to the term
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Returns `true` if no gene is annotated to the term
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

/// An iterator of [`TermGenes`], ordered by [`TermId`]
pub struct Iter<'a> {
    index: &'a GeneSetIndex,
    ids: std::slice::Iter<'a, TermId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = TermGenes<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        let id = self.ids.next()?;
        self.index.term(id).or_else(|| self.next())
    }
}

impl std::fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermGenes Iterator")
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::*;
    use crate::parser::{parse_reader, Go, Kegg};

    const GO_DATA: &str = "Gene_id\tGO_number\tGO\n\
        g1\t2\tGO:1; one; biological_process\tGO:2; two; molecular_function\n\
        g2\t1\tGO:1; one; biological_process\n\
        G2\t1\tGO:3; three; cellular_component\n\
        g3\t1\tGO:2; two; molecular_function\tGO:9; NA\n\
        g4\t1\tGO:9; NA\n";

    fn go_index() -> GeneSetIndex {
        parse_reader(GO_DATA.as_bytes(), &Go::default())
            .unwrap()
            .build()
    }

    #[test]
    fn universe_contains_all_row_genes() {
        let index = go_index();
        let union: HashSet<&GeneId> = index.iter().flat_map(|term| term.genes().iter()).collect();
        assert_eq!(union.len(), 3);
        assert_eq!(index.universe_size(), 4);
        assert!(index.contains_gene(&"g4".into()));
        assert!(index.terms_of(&"g4".into()).is_none());
    }

    #[test]
    fn kegg_rows_without_pathway() {
        let data = "Query	Subject	KO	Name	Definition	EC	Pathway
            g1	s	K1	n	d	-	ko03010;A;B;C
            g2	s	K2	n	d	-	ko03010;A;B;C
            g3	s	K3	n	d	-	-
";
        let index = parse_reader(data.as_bytes(), &Kegg::default())
            .unwrap()
            .build();
        assert_eq!(index.len(), 1);
        assert_eq!(index.universe_size(), 3);
        assert!(index.contains_gene(&"g3".into()));
    }

    #[test]
    fn term_sizes() {
        let index = go_index();
        assert_eq!(index.len(), 3);
        assert_eq!(index.term(&"GO:1".into()).unwrap().len(), 2);
        assert_eq!(index.term(&"GO:2".into()).unwrap().len(), 2);
        assert_eq!(index.term(&"GO:3".into()).unwrap().len(), 1);
        assert!(index.term(&"GO:9".into()).is_none());
    }

    #[test]
    fn reverse_lookup() {
        let index = go_index();
        let terms = index.terms_of(&"g2".into()).unwrap();
        let ids: Vec<&str> = terms.iter().map(TermId::as_str).collect();
        assert_eq!(ids, vec!["GO:1", "GO:3"]);
    }

    #[test]
    fn deterministic() {
        let a = go_index();
        let b = go_index();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.id(), y.id());
            assert_eq!(x.genes(), y.genes());
        }
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn ordered_iteration() {
        let index = go_index();
        let ids: Vec<&str> = index.iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["GO:1", "GO:2", "GO:3"]);
    }

    #[test]
    fn partition() {
        let index = go_index();
        let parts = index.partition_by_class();
        assert_eq!(parts.len(), 3);

        let mf = &parts["molecular_function"];
        assert_eq!(mf.len(), 1);
        assert_eq!(mf.universe_size(), 2);
        assert!(mf.contains_gene(&"g3".into()));
        assert!(!mf.contains_gene(&"g2".into()));
        assert_eq!(mf.terms_of(&"g1".into()).unwrap().len(), 1);
    }

    #[test]
    fn partition_skips_terms_without_class() {
        let mut builder = Builder::new();
        builder.add_annotation("g1", &Term::new("PF1", "kinase", None));
        assert!(builder.build().partition_by_class().is_empty());
    }

    #[test]
    fn gmt_round_trip() {
        let index = go_index();
        let mut out = Vec::new();
        index.write_gmt(&mut out).unwrap();

        let gmt = String::from_utf8(out.clone()).unwrap();
        assert!(gmt.starts_with("GO:1\tone\tg1\tg2\n"));

        let reparsed = parse_reader(&out[..], &Gmt).unwrap().build();
        assert_eq!(reparsed.len(), index.len());
        // g4 has no term and can't be represented in GMT
        assert!(reparsed.universe().is_subset(index.universe()));
        assert_eq!(reparsed.universe_size(), index.universe_size() - 1);
        for term in &index {
            let other = reparsed.term(term.id()).unwrap();
            assert_eq!(other.name(), term.name());
            assert_eq!(other.genes(), term.genes());
            assert!(other.class().is_none());
        }
    }

    #[test]
    fn gmt_skips_empty_terms() {
        let mut builder = Builder::new();
        builder.add_term(&Term::new("T0", "empty", None));
        builder.add_annotation("g1", &Term::new("T1", "full", None));
        let mut out = Vec::new();
        builder.build().write_gmt(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "T1\tfull\tg1\n");
    }

    #[test]
    fn gmt_files_per_class() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("go");
        let paths = go_index()
            .save_gmt_by_class(&prefix.display().to_string())
            .unwrap();
        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["go_bp.gmt", "go_cc.gmt", "go_mf.gmt"]);

        let cc = GeneSetIndex::from_gmt(&paths[1]).unwrap();
        assert_eq!(cc.len(), 1);
    }

    #[test]
    fn class_stems() {
        assert_eq!(class_file_stem("cellular_component"), "cc");
        assert_eq!(
            class_file_stem("Signaling mechanisms"),
            "signaling_mechanisms"
        );
    }
}
