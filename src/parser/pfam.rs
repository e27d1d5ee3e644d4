use tracing::trace;

use crate::annotations::{GeneId, Term};
use crate::parser::{split_exact, AnnotationFormat, AnnotationRow};
use crate::{GseaError, GseaResult};

/// Pfam domain annotation table
///
/// ```text
/// Gene_id <TAB> Pfam_number <TAB> Pfam_id:Pfam_description <TAB> ...
/// transcript0/f8p0/9897   2   PF00069:Protein kinase domain   PF07714:Protein tyrosine kinase
/// ```
///
/// Pfam has no class dimension, so terms are created without a class.
/// Descriptions containing the separator themselves are treated as
/// malformed and ignored.
#[derive(Debug, Clone)]
pub struct Pfam {
    separator: String,
}

impl Default for Pfam {
    fn default() -> Self {
        Self {
            separator: ":".to_string(),
        }
    }
}

impl Pfam {
    /// Uses a different separator between id and description
    #[must_use]
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }
}

impl AnnotationFormat for Pfam {
    fn has_header(&self) -> bool {
        true
    }

    fn parse_line(&self, line: &str) -> GseaResult<Option<AnnotationRow>> {
        let mut cols = line.split('\t');

        let gene = match cols.next().map(GeneId::new) {
            Some(gene) if !gene.is_empty() => gene,
            _ => return Err(GseaError::InvalidInput(line.to_string())),
        };

        if cols.next().is_none() {
            return Err(GseaError::InvalidInput(line.to_string()));
        }

        let terms = cols
            .filter_map(|field| match split_exact::<2>(field, &self.separator) {
                Some([id, description]) if !id.is_empty() => {
                    Some(Term::new(id, description, None))
                }
                _ => {
                    trace!("Ignoring Pfam field of {}: {:?}", gene, field);
                    None
                }
            })
            .collect();

        Ok(Some(AnnotationRow::gene(gene, terms)))
    }
}
