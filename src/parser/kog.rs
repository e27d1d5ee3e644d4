use tracing::trace;

use crate::annotations::{GeneId, Term};
use crate::parser::{AnnotationFormat, AnnotationRow};
use crate::{GseaError, GseaResult};

/// Number of columns of a KOG annotation line
const KOG_COLUMNS: usize = 8;

/// KOG annotation table
///
/// ```text
/// Gene_id <TAB> Identity <TAB> E_value <TAB> KOG_gene_id <TAB> KOG_num <TAB> Functional_description <TAB> Functional_class <TAB> Class_description
/// t0  57.1  1e-50  7295417  KOG0001  Ubiquitin and ubiquitin-like proteins  O  Posttranslational modification, protein turnover, chaperones
/// ```
///
/// Each line links the gene to exactly one KOG group. The class description
/// becomes the class of the term.
#[derive(Debug, Clone, Copy, Default)]
pub struct Kog;

impl AnnotationFormat for Kog {
    fn has_header(&self) -> bool {
        true
    }

    fn parse_line(&self, line: &str) -> GseaResult<Option<AnnotationRow>> {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < KOG_COLUMNS {
            return Err(GseaError::InvalidInput(line.to_string()));
        }

        let gene = GeneId::new(cols[0]);
        if gene.is_empty() {
            return Err(GseaError::InvalidInput(line.to_string()));
        }

        let kog_id = cols[4].trim();
        if kog_id.is_empty() {
            trace!("Ignoring KOG line of {} without KOG id", gene);
            return Ok(Some(AnnotationRow::gene(gene, Vec::new())));
        }

        let term = Term::new(kog_id, cols[5], Some(cols[7]));
        Ok(Some(AnnotationRow::gene(gene, vec![term])))
    }
}
