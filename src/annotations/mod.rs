//! Genes and annotation terms are the building blocks of every gene set
//!
//! This module contains the identifiers for [`GeneId`]s and [`TermId`]s and
//! the [`Term`] record that describes an annotation category.
//!
//! The underlying principle for all annotation databases is the same:
//! - Each term (GO term, KEGG pathway, Pfam domain, KOG group) has a unique
//!   identifier and a human readable name.
//! - Some databases group their terms into classes, e.g. the three GO namespaces.
//! - Terms are connected to genes in a many-to-many relationship. The
//!   connection itself is stored in the [`GeneSetIndex`](crate::GeneSetIndex).

mod gene;
mod term;

pub use gene::{GeneId, Genes};
pub use term::{Term, TermId, TermIds};
