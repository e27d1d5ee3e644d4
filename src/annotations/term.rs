use std::collections::BTreeSet;
use std::fmt::Display;

/// A sorted set of [`TermId`]s
///
/// Used for the gene → term reverse lookup.
pub type TermIds = BTreeSet<TermId>;

/// A unique identifier of an annotation term
///
/// The identifier is kept as it appears in the annotation source,
/// only surrounding whitespace is removed, e.g. `GO:0005515`, `ko03010`,
/// `PF00069` or `KOG0001`.
#[derive(Clone, Default, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct TermId {
    inner: String,
}

impl TermId {
    /// Constructs a new [`TermId`]
    pub fn new(raw: &str) -> Self {
        Self {
            inner: raw.trim().to_string(),
        }
    }

    /// Returns the identifier as `&str`
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for TermId {
    fn from(raw: &str) -> Self {
        TermId::new(raw)
    }
}

impl From<String> for TermId {
    fn from(raw: String) -> Self {
        TermId::new(&raw)
    }
}

impl PartialEq<str> for TermId {
    fn eq(&self, other: &str) -> bool {
        self.inner == other
    }
}

impl PartialEq<&str> for TermId {
    fn eq(&self, other: &&str) -> bool {
        self.inner == *other
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// A single annotation term
///
/// A term has a unique [`TermId`], a name and, depending on the
/// annotation source, a class label. GO terms use their namespace
/// (`biological_process`, `molecular_function` or `cellular_component`)
/// as class.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Term {
    id: TermId,
    name: String,
    class: Option<String>,
}

impl Term {
    /// Initializes a new Term
    pub fn new<I: Into<TermId>>(id: I, name: &str, class: Option<&str>) -> Term {
        Term {
            id: id.into(),
            name: name.trim().to_string(),
            class: class.map(|c| c.trim().to_string()),
        }
    }

    /// The unique [`TermId`] of the term
    pub fn id(&self) -> &TermId {
        &self.id
    }

    /// The human readable name of the term
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The class label of the term, if the annotation source provides one
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }
}
