use tracing::trace;

use crate::annotations::{GeneId, Term};
use crate::parser::{split_exact, AnnotationFormat, AnnotationRow};
use crate::{GseaError, GseaResult};

/// Gene Ontology annotation table
///
/// ```text
/// Gene_id <TAB> GO_number <TAB> GO_id; GO_description; GO_class <TAB> ...
/// transcript0/f8p0/9897   1   GO:0005515; protein binding; molecular_function
/// transcript1/f2p0/9329   2   GO:0006914; autophagy; biological_process   GO:0005198; NA
/// ```
///
/// Every field after the second column holds one term. Fields that do not
/// split into exactly three parts (like `GO:0005198; NA` above) are ignored.
#[derive(Debug, Clone)]
pub struct Go {
    separator: String,
}

impl Default for Go {
    fn default() -> Self {
        Self {
            separator: ";".to_string(),
        }
    }
}

impl Go {
    /// Uses a different separator between id, name and namespace
    #[must_use]
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }
}

impl AnnotationFormat for Go {
    fn has_header(&self) -> bool {
        true
    }

    fn parse_line(&self, line: &str) -> GseaResult<Option<AnnotationRow>> {
        let mut cols = line.split('\t');

        // Column 1 is the gene
        let gene = match cols.next().map(GeneId::new) {
            Some(gene) if !gene.is_empty() => gene,
            _ => return Err(GseaError::InvalidInput(line.to_string())),
        };

        // Column 2 is the number of GO terms
        if cols.next().is_none() {
            return Err(GseaError::InvalidInput(line.to_string()));
        }

        let mut terms = Vec::new();
        for field in cols {
            match split_exact::<3>(field, &self.separator) {
                Some([id, name, class]) if !id.is_empty() => {
                    terms.push(Term::new(id, name, Some(class)));
                }
                _ => trace!("Ignoring GO field of {}: {:?}", gene, field),
            }
        }
        Ok(Some(AnnotationRow::gene(gene, terms)))
    }
}

/// Returns the common abbreviation of a GO namespace
///
/// ```
/// use gsea::parser::namespace_abbreviation;
///
/// assert_eq!(namespace_abbreviation("biological_process"), Some("bp"));
/// assert_eq!(namespace_abbreviation("KOG"), None);
/// ```
pub fn namespace_abbreviation(namespace: &str) -> Option<&'static str> {
    match namespace {
        "biological_process" => Some("bp"),
        "molecular_function" => Some("mf"),
        "cellular_component" => Some("cc"),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::TermId;

    #[test]
    fn parse_correct_line() {
        let line = "Transcript1/f2p0/9329\t2\tGO:0006914; autophagy; biological_process\tGO:0003677; DNA binding; molecular_function";
        let row = Go::default().parse_line(line).unwrap().unwrap();
        assert_eq!(row.genes(), &[GeneId::new("transcript1/f2p0/9329")]);
        assert_eq!(row.terms().len(), 2);
        assert_eq!(row.terms()[0].id(), &TermId::from("GO:0006914"));
        assert_eq!(row.terms()[0].name(), "autophagy");
        assert_eq!(row.terms()[1].class(), Some("molecular_function"));
    }

    #[test]
    fn skip_malformed_field() {
        let line = "t1\t2\tGO:0006914; autophagy; biological_process\tGO:0005198; NA";
        let row = Go::default().parse_line(line).unwrap().unwrap();
        assert_eq!(row.terms().len(), 1);
        assert_eq!(row.terms()[0].id(), &TermId::from("GO:0006914"));
    }

    #[test]
    fn only_malformed_fields() {
        let line = "t1\t1\tGO:0005198; NA";
        let row = Go::default().parse_line(line).unwrap().unwrap();
        assert_eq!(row.genes().len(), 1);
        assert!(row.terms().is_empty());
    }

    #[test]
    fn missing_count_column() {
        assert!(Go::default().parse_line("t1").is_err());
    }

    #[test]
    fn missing_gene() {
        assert!(Go::default().parse_line("\t1\tGO:1; a; b").is_err());
    }

    #[test]
    fn custom_separator() {
        let line = "t1\t1\tGO:1|foo|biological_process";
        let row = Go::default()
            .with_separator("|")
            .parse_line(line)
            .unwrap()
            .unwrap();
        assert_eq!(row.terms()[0].name(), "foo");
    }
}
