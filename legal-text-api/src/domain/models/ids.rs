use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest identifier accepted for a new book.
///
/// The identifier is embedded in partition and index names, which PostgreSQL
/// caps at 63 bytes.
pub const MAX_COLLECTION_ID_LEN: usize = 40;

const PARTITION_PREFIX: &str = "articles_";

/// Stable key of a book and of the physical partition holding its articles.
///
/// Wraps the raw string as received from the request layer. Whether it is
/// acceptable for *registration* is checked with [`CollectionId::is_valid`];
/// lookups accept any string and simply find nothing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(String);

impl CollectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` when the identifier is 1 to [`MAX_COLLECTION_ID_LEN`] characters
    /// of lower-case ASCII letters, digits and `_`.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= MAX_COLLECTION_ID_LEN
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
    }

    /// Name of the table partition holding this book's articles.
    pub fn partition_name(&self) -> String {
        format!("{PARTITION_PREFIX}{}", self.0)
    }

    /// Inverse of [`CollectionId::partition_name`].
    pub fn from_partition_name(name: &str) -> Option<Self> {
        name.strip_prefix(PARTITION_PREFIX)
            .filter(|id| !id.is_empty())
            .map(Self::new)
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CollectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for CollectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for CollectionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lowercase_identifiers() {
        assert!(CollectionId::new("alcons").is_valid());
        assert!(CollectionId::new("us_const_1787").is_valid());
    }

    #[test]
    fn rejects_unsafe_identifiers() {
        assert!(!CollectionId::new("").is_valid());
        assert!(!CollectionId::new("AlCons").is_valid());
        assert!(!CollectionId::new("al-cons").is_valid());
        assert!(!CollectionId::new("al cons").is_valid());
        assert!(!CollectionId::new("books\"; DROP TABLE books; --").is_valid());
        assert!(!CollectionId::new("a".repeat(MAX_COLLECTION_ID_LEN + 1)).is_valid());
    }

    #[test]
    fn partition_name_round_trip() {
        let id = CollectionId::new("alcons");
        assert_eq!(id.partition_name(), "articles_alcons");
        assert_eq!(
            CollectionId::from_partition_name("articles_alcons"),
            Some(id)
        );
        assert_eq!(CollectionId::from_partition_name("articles_"), None);
        assert_eq!(CollectionId::from_partition_name("books"), None);
    }
}
