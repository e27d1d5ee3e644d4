//! Parsing of functional annotation tables
//!
//! Every annotation database ships its own table layout, but all of them
//! boil down to the same information: some genes are linked to some terms.
//! Each layout is described by a type implementing [`AnnotationFormat`],
//! which turns a single line into an [`AnnotationRow`]. The loader in this
//! module drives any format and feeds the rows into a [`Builder`].
//!
//! Supported formats:
//! - [`Go`]: Gene Ontology annotation (`GO:id; name; namespace` fields)
//! - [`Kegg`]: KEGG pathway annotation of KO hits
//! - [`Pfam`]: Pfam domain annotation (`PFid:description` fields)
//! - [`Kog`]: KOG annotation, one KOG group per line
//! - [`Gmt`]: plain gene set files, one term per line

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::annotations::{GeneId, Term};
use crate::index::Builder;
use crate::{GseaError, GseaResult};

mod gmt;
mod go;
mod kegg;
mod kog;
mod pfam;

pub use gmt::Gmt;
pub use go::{namespace_abbreviation, Go};
pub use kegg::Kegg;
pub use kog::Kog;
pub use pfam::Pfam;

/// The information of a single line of an annotation table
///
/// Every gene of the row is linked to every term of the row. Most annotation
/// tables have one gene and several terms per line, GMT files have one
/// term and several genes.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AnnotationRow {
    genes: Vec<GeneId>,
    terms: Vec<Term>,
}

impl AnnotationRow {
    /// Constructs a row with a single gene and its terms
    pub fn gene(gene: GeneId, terms: Vec<Term>) -> Self {
        Self {
            genes: vec![gene],
            terms,
        }
    }

    /// Constructs a row with a single term and its genes
    pub fn term(term: Term, genes: Vec<GeneId>) -> Self {
        Self {
            genes,
            terms: vec![term],
        }
    }

    /// The genes of the row
    pub fn genes(&self) -> &[GeneId] {
        &self.genes
    }

    /// The terms of the row
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }
}

/// Describes the layout of one annotation table
///
/// Implementors only need to know how to parse a single line; reading
/// files and building the [`GeneSetIndex`](crate::GeneSetIndex) is
/// handled by [`parse`].
///
/// # Examples
///
/// Implementing a custom two-column format `gene <TAB> term`:
///
/// ```
/// use gsea::parser::{AnnotationFormat, AnnotationRow};
/// use gsea::{GeneId, GseaResult, Term};
///
/// struct TwoColumns;
///
/// impl AnnotationFormat for TwoColumns {
///     fn has_header(&self) -> bool {
///         false
///     }
///
///     fn parse_line(&self, line: &str) -> GseaResult<Option<AnnotationRow>> {
///         let Some((gene, term)) = line.split_once('\t') else {
///             return Ok(None);
///         };
///         Ok(Some(AnnotationRow::gene(
///             GeneId::new(gene),
///             vec![Term::new(term, term, None)],
///         )))
///     }
/// }
///
/// let data = "a\tT1\nb\tT1\nb\tT2\n".as_bytes();
/// let index = gsea::parser::parse_reader(data, &TwoColumns).unwrap()
///     .build();
/// assert_eq!(index.len(), 2);
/// assert_eq!(index.universe_size(), 2);
/// ```
pub trait AnnotationFormat {
    /// Returns `true` if the first line of the table is a header line
    fn has_header(&self) -> bool;

    /// Parses a single (non-empty) line of the table
    ///
    /// Returns `Ok(None)` if the line should be ignored.
    ///
    /// # Errors
    ///
    /// [`GseaError::InvalidInput`] if required columns are missing
    fn parse_line(&self, line: &str) -> GseaResult<Option<AnnotationRow>>;
}

/// Splits a single term field into exactly `N` parts
///
/// Returns `None` if the field does not have exactly `N` parts. Used by
/// the formats to skip malformed term annotations.
pub(crate) fn split_exact<'a, const N: usize>(
    field: &'a str,
    separator: &str,
) -> Option<[&'a str; N]> {
    let mut parts = [""; N];
    let mut split = field.split(separator);
    for part in &mut parts {
        *part = split.next()?.trim();
    }
    if split.next().is_some() {
        return None;
    }
    Some(parts)
}

/// Parses an annotation file and returns a [`Builder`] with all annotations
///
/// # Errors
///
/// - [`GseaError::CannotOpenFile`]: Source file not present or can't be opened
/// - [`GseaError::InvalidInput`]: A line is missing required columns
pub fn parse<P: AsRef<Path>, F: AnnotationFormat + ?Sized>(
    file: P,
    format: &F,
) -> GseaResult<Builder> {
    let filename = file.as_ref().display().to_string();
    let file = File::open(file).map_err(|_| GseaError::CannotOpenFile(filename.clone()))?;
    let mut builder = Builder::new();
    parse_into(BufReader::new(file), format, &mut builder).map_err(|err| match err {
        GseaError::InvalidInput(line) => GseaError::InvalidInput(format!("{filename}: {line}")),
        err => err,
    })?;
    Ok(builder)
}

/// Parses annotations from any buffered reader and returns a [`Builder`]
///
/// # Errors
///
/// [`GseaError::InvalidInput`]: The data is not valid UTF-8 or a line is
/// missing required columns
pub fn parse_reader<R: BufRead, F: AnnotationFormat + ?Sized>(
    reader: R,
    format: &F,
) -> GseaResult<Builder> {
    let mut builder = Builder::new();
    parse_into(reader, format, &mut builder)?;
    Ok(builder)
}

fn parse_into<R: BufRead, F: AnnotationFormat + ?Sized>(
    reader: R,
    format: &F,
    builder: &mut Builder,
) -> GseaResult<()> {
    let mut lines = reader.lines();
    let mut first_line = 1;

    if format.has_header() {
        if let Some(header) = lines.next() {
            let header = header.map_err(|_| invalid_data(1))?;
            debug!("Skipping header: {}", header);
        }
        first_line += 1;
    }

    for (idx, line) in lines.enumerate() {
        let line = line.map_err(|_| invalid_data(idx + first_line))?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        if let Some(row) = format.parse_line(line)? {
            builder.add_row(row);
        }
    }
    Ok(())
}

fn invalid_data(line_number: usize) -> GseaError {
    GseaError::InvalidInput(format!("unreadable data in line {line_number}"))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn split_exact_parts() {
        assert_eq!(
            split_exact::<3>("GO:1; foo ; bar", ";"),
            Some(["GO:1", "foo", "bar"])
        );
        assert!(split_exact::<3>("GO:1; foo", ";").is_none());
        assert!(split_exact::<3>("GO:1; foo; bar; baz", ";").is_none());
        assert_eq!(split_exact::<2>("PF1:desc", ":"), Some(["PF1", "desc"]));
    }

    #[test]
    fn split_parts_outlive_separator() {
        let field = String::from("ko03010|Metabolism");
        let parts = {
            let separator = String::from("|");
            split_exact::<2>(&field, &separator)
        };
        assert_eq!(parts, Some(["ko03010", "Metabolism"]));
    }

    #[test]
    fn missing_file() {
        let err = parse("tests/does_not_exist.tsv", &Go::default()).unwrap_err();
        match err {
            GseaError::CannotOpenFile(path) => assert!(path.contains("does_not_exist.tsv")),
            _ => panic!("wrong error: {err}"),
        }
    }

    #[test]
    fn header_and_blank_lines_are_skipped() {
        let data = "Gene_id\tGO_number\tGO\n\
                    \n\
                    g1\t1\tGO:1; foo; biological_process\r\n   \n";
        let index = parse_reader(data.as_bytes(), &Go::default())
            .unwrap()
            .build();
        assert_eq!(index.len(), 1);
        assert_eq!(index.universe_size(), 1);
    }

    #[test]
    fn dyn_format() {
        let format: Box<dyn AnnotationFormat> = Box::new(Pfam::default());
        let data = "Gene_id\tPfam_number\tPfam\ng1\t1\tPF00069:Protein kinase\n";
        let index = parse_reader(data.as_bytes(), format.as_ref())
            .unwrap()
            .build();
        assert_eq!(index.len(), 1);
    }
}
