use tracing::trace;

use crate::annotations::{GeneId, Term};
use crate::parser::{split_exact, AnnotationFormat, AnnotationRow};
use crate::{GseaError, GseaResult};

/// Column of the pathway annotations
const PATHWAY_COLUMN: usize = 6;

/// KEGG annotation of KO hits
///
/// ```text
/// Query_id <TAB> Subject_id <TAB> KO_ID <TAB> KO_NAME <TAB> KO_DEFINITION <TAB> KO_EC <TAB> KO_PATHWAY
/// t0  hsa:6175  K02941  RP-LP0  large subunit ribosomal protein LP0  -  ko03010;Genetic Information Processing;Translation;Ribosome
/// ```
///
/// The last column lists all pathways, separated by ` | `. Each pathway
/// has four parts: id, top-level category, sub-category and name.
///
/// - The pathway id is lower-cased (`ko03010`)
/// - The term name joins category, sub-category and name with the separator
/// - The top-level category becomes the term class
/// - A `-` means the KO is not part of any pathway
#[derive(Debug, Clone)]
pub struct Kegg {
    separator: String,
    pathway_separator: String,
}

impl Default for Kegg {
    fn default() -> Self {
        Self {
            separator: ";".to_string(),
            pathway_separator: " | ".to_string(),
        }
    }
}

impl Kegg {
    /// Uses a different separator between the parts of a pathway
    #[must_use]
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    /// Uses a different separator between pathways
    #[must_use]
    pub fn with_pathway_separator(mut self, separator: &str) -> Self {
        self.pathway_separator = separator.to_string();
        self
    }

    fn pathway(&self, field: &str) -> Option<Term> {
        let [id, class, subclass, name] = split_exact::<4>(field, &self.separator)?;
        if id.is_empty() {
            return None;
        }
        Some(Term::new(
            id.to_lowercase(),
            &[class, subclass, name].join(self.separator.as_str()),
            Some(class),
        ))
    }
}

impl AnnotationFormat for Kegg {
    fn has_header(&self) -> bool {
        true
    }

    fn parse_line(&self, line: &str) -> GseaResult<Option<AnnotationRow>> {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() <= PATHWAY_COLUMN {
            return Err(GseaError::InvalidInput(line.to_string()));
        }

        let gene = GeneId::new(cols[0]);
        if gene.is_empty() {
            return Err(GseaError::InvalidInput(line.to_string()));
        }

        let pathways = cols[PATHWAY_COLUMN].trim();
        if pathways == "-" || pathways.is_empty() {
            return Ok(Some(AnnotationRow::gene(gene, Vec::new())));
        }

        let mut terms = Vec::new();
        for field in pathways.split(self.pathway_separator.as_str()) {
            match self.pathway(field) {
                Some(term) => terms.push(term),
                None => trace!("Ignoring KEGG pathway of {}: {:?}", gene, field),
            }
        }
        Ok(Some(AnnotationRow::gene(gene, terms)))
    }
}
