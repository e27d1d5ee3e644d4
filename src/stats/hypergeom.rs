//! Calculate the enrichment of annotation terms in a [`GeneList`] and the
//! probability of enrichment within the hypergeometric distribution.
//!
//! For every term of a [`GeneSetIndex`] the test compares the number of
//! list genes annotated to the term with the number expected by chance:
//!
//! - population (`N`): all genes of the universe
//! - successes (`K`): genes annotated to the term
//! - draws (`n`): genes of the list that are part of the universe
//! - observed (`k`): genes of the list annotated to the term
//!
//! The p-value is `P(X >= k)`. Genes of the list that are not part of the
//! annotation table are not counted as draws.
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
//! let enrichments = term_enrichment(&genes, &index, &EnrichmentConfig::default());
//!
//! let ribosome = enrichments.get(0).unwrap();
//! assert_eq!(ribosome.id().as_str(), "GO:0005840");
//! assert_eq!(ribosome.count(), 4);
//!
//! for term in &enrichments {
//!     println!("{}\t{:e}\t({})", term.name(), term.pvalue(), term.enrichment());
//! }
//! ```

use statrs::distribution::{DiscreteCDF, Hypergeometric};
use tracing::{debug, trace, warn};

use crate::stats::{f64_from_usize, Enrichment, EnrichmentConfig, EnrichmentTable};
use crate::{GeneList, GeneSetIndex};

/// Calculates the hypergeometric enrichment of all terms of `index` within `genes`
///
/// Terms with an overlap of `min_count` genes or fewer are not tested.
/// Only terms with a p-value less or equal to the `pvalue_threshold`
/// are part of the returned table.
pub fn term_enrichment(
    genes: &GeneList,
    index: &GeneSetIndex,
    config: &EnrichmentConfig,
) -> EnrichmentTable {
    let population = index.universe_size();
    let draws = genes.overlap(index.universe());
    debug!(
        "Population: {}, Draws: {} ({} genes in list)",
        population,
        draws,
        genes.len()
    );

    let mut res = Vec::new();
    for term in index {
        let observed_successes = genes.overlap(term.genes());
        if observed_successes <= config.min_count() {
            trace!("Skipping {}: {} hits", term.id(), observed_successes);
            continue;
        }
        let successes = term.len();

        let Some(pvalue) = pvalue(population, successes, draws, observed_successes) else {
            warn!(
                "Invalid distribution for {}: Population: {}, Successes: {}, Draws: {}",
                term.id(),
                population,
                successes,
                draws
            );
            continue;
        };

        if pvalue > config.pvalue_threshold() {
            trace!("Skipping {}: p-value {}", term.id(), pvalue);
            continue;
        }

        let enrichment = (f64_from_usize(observed_successes) / f64_from_usize(draws))
            / (f64_from_usize(successes) / f64_from_usize(population));

        debug!(
            "Term:{}\tPopulation: {}, Successes: {}, Draws: {}, Observed: {}",
            term.id(),
            population,
            successes,
            draws,
            observed_successes
        );
        res.push(Enrichment::new(
            term.term().clone(),
            pvalue,
            observed_successes,
            successes,
            enrichment,
        ));
    }
    EnrichmentTable::new(res)
}

/// Returns the probability to observe `observed` or more successes
///
/// Returns `None` if the parameters do not describe a valid hypergeometric
/// distribution, i.e. if `successes` or `draws` is larger than `population`.
///
/// # Examples
///
/// ```
/// use gsea::stats::hypergeom::pvalue;
///
/// let p = pvalue(1000, 50, 40, 10).unwrap();
/// assert!((p - 1.0652378031481489e-05).abs() < 1e-10);
///
/// // observing nothing or more is always certain
/// assert_eq!(pvalue(1000, 50, 40, 0), Some(1.0));
///
/// assert!(pvalue(10, 11, 1, 1).is_none());
/// ```
pub fn pvalue(population: usize, successes: usize, draws: usize, observed: usize) -> Option<f64> {
    if observed == 0 {
        return (successes <= population && draws <= population).then_some(1.0);
    }
    let hyper = Hypergeometric::new(
        u64::try_from(population).ok()?,
        u64::try_from(successes).ok()?,
        u64::try_from(draws).ok()?,
    )
    .ok()?;

    // subtracting 1, because we want to test including observed
    // e.g. "7 or more", but sf by default calculates "more than 7"
    Some(hyper.sf(u64::try_from(observed - 1).ok()?))
}
