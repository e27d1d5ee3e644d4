use std::collections::HashSet;
use std::fmt::Display;

/// A set of genes
///
/// Currently implemented using [`HashSet`] but any other implementation
/// should work as well given that each [`GeneId`] must appear only once
/// and it provides an iterator of [`GeneId`]
pub type Genes = HashSet<GeneId>;

/// A unique identifier for a gene
///
/// Gene identifiers come from many different sources (transcript names of
/// a de-novo assembly, gene symbols, etc) and are not consistently cased.
/// A [`GeneId`] is therefore always normalized: surrounding whitespace is
/// removed and all characters are lower-cased. Two [`GeneId`]s are equal
/// iff their normalized forms are equal.
///
/// # Examples
///
/// ```
/// use gsea::GeneId;
///
/// let gene = GeneId::new("  Transcript_HQ_P2_transcript0/f8p0/9897 ");
/// assert_eq!(gene.as_str(), "transcript_hq_p2_transcript0/f8p0/9897");
/// assert_eq!(gene, GeneId::from("TRANSCRIPT_HQ_P2_TRANSCRIPT0/F8P0/9897"));
/// ```
#[derive(Clone, Default, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct GeneId {
    inner: String,
}

impl GeneId {
    /// Constructs a new, normalized [`GeneId`]
    pub fn new(raw: &str) -> Self {
        Self {
            inner: raw.trim().to_lowercase(),
        }
    }

    /// Returns the normalized identifier
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns `true` if the identifier is empty after normalization
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<&str> for GeneId {
    fn from(raw: &str) -> Self {
        GeneId::new(raw)
    }
}

impl From<String> for GeneId {
    fn from(raw: String) -> Self {
        GeneId::new(&raw)
    }
}

impl AsRef<str> for GeneId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for GeneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn normalize_case_and_whitespace() {
        assert_eq!(GeneId::new(" NAT2\t").as_str(), "nat2");
        assert_eq!(GeneId::new("Nat2"), GeneId::new("nAT2"));
    }

    #[test]
    fn blank_is_empty() {
        assert!(GeneId::new("   ").is_empty());
        assert!(!GeneId::new(" a ").is_empty());
    }

    #[test]
    fn set_semantics() {
        let mut genes = Genes::new();
        assert!(genes.insert("FOO".into()));
        assert!(!genes.insert(" foo".into()));
        assert_eq!(genes.len(), 1);
    }
}
