use tracing::debug;

use crate::annotations::{GeneId, Term};
use crate::parser::{AnnotationFormat, AnnotationRow};
use crate::GseaResult;

/// GMT gene set file
///
/// ```text
/// GO:0005515 <TAB> protein binding <TAB> gene1 <TAB> gene2 <TAB> ... <TAB> geneN
/// ```
///
/// One term per line, no header. Lines with fewer than three fields
/// (a term without genes) are ignored. GMT files do not store a term class.
///
/// A [`GeneSetIndex`](crate::GeneSetIndex) can be written as GMT using
/// [`GeneSetIndex::write_gmt`](crate::GeneSetIndex::write_gmt).
#[derive(Debug, Clone, Copy, Default)]
pub struct Gmt;

impl AnnotationFormat for Gmt {
    fn has_header(&self) -> bool {
        false
    }

    fn parse_line(&self, line: &str) -> GseaResult<Option<AnnotationRow>> {
        let fields: Vec<&str> = line.trim().split('\t').collect();
        if fields.len() < 3 || fields[0].trim().is_empty() {
            debug!("Ignoring GMT line {:?}", line);
            return Ok(None);
        }

        let genes: Vec<GeneId> = fields[2..]
            .iter()
            .map(|gene| GeneId::new(gene))
            .filter(|gene| !gene.is_empty())
            .collect();

        Ok(Some(AnnotationRow::term(
            Term::new(fields[0], fields[1], None),
            genes,
        )))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_correct_line() {
        let row = Gmt
            .parse_line("GO:0005515\tprotein binding\tGeneA\tgeneb\n")
            .unwrap()
            .unwrap();
        assert_eq!(row.terms()[0].id().as_str(), "GO:0005515");
        assert_eq!(row.terms()[0].name(), "protein binding");
        assert_eq!(
            row.genes(),
            &[GeneId::new("genea"), GeneId::new("geneb")]
        );
    }

    #[test]
    fn skip_term_without_genes() {
        assert!(Gmt.parse_line("GO:1\tfoo").unwrap().is_none());
        assert!(Gmt.parse_line("GO:1").unwrap().is_none());
    }
}
