//! Article store port (outbound).
//!
//! One partition of articles per book, searchable through a full-text index.
//! Callers must check the book exists in the [`BookRegistry`] first;
//! operating on a missing partition is an error of the store.
//!
//! [`BookRegistry`]: super::BookRegistry

use async_trait::async_trait;

use crate::domain::{
    models::{Article, CollectionId, NewArticle},
    LibraryError,
};

#[async_trait]
pub trait ArticleStore: Send + Sync + 'static {
    /// All articles of a book, ordered by ordinal.
    async fn list_articles(&self, book: &CollectionId) -> Result<Vec<Article>, LibraryError>;

    /// Articles whose indexed text matches `query`, in the index's match
    /// order.
    ///
    /// Matching is token based, case-insensitive and may include stemmed
    /// variants, so a hit need not contain `query` literally.
    async fn full_text_search(
        &self,
        book: &CollectionId,
        query: &str,
    ) -> Result<Vec<Article>, LibraryError>;

    /// Create the partition's text index if it does not exist yet.
    async fn ensure_text_index(&self, book: &CollectionId) -> Result<(), LibraryError>;

    /// Append articles after the current last ordinal.
    ///
    /// Returns the number of articles stored.
    async fn append_articles(
        &self,
        book: &CollectionId,
        articles: &[NewArticle],
    ) -> Result<usize, LibraryError>;

    /// Drop the book's partition with all its articles. No-op if absent.
    async fn purge_articles(&self, book: &CollectionId) -> Result<(), LibraryError>;

    /// Books that currently own a physical partition.
    async fn list_partitions(&self) -> Result<Vec<CollectionId>, LibraryError>;
}
