use async_trait::async_trait;

use crate::domain::{
    models::{Book, BrowsedArticle, CollectionId, NewArticle, SearchResults},
    LibraryError,
};

/// Inbound port for the legal text library.
///
/// This trait defines the use cases that HTTP handlers can invoke. Mutations
/// assume the caller has already authorized the actor.
#[async_trait]
pub trait LibraryService: Send + Sync + 'static {
    /// All registered books, for navigation.
    async fn list_books(&self) -> Result<Vec<Book>, LibraryError>;

    async fn get_book(&self, id: &CollectionId) -> Result<Book, LibraryError>;

    /// Register a new, read-only book with an empty article partition.
    ///
    /// A rejected registration is reported as [`LibraryError::Validation`].
    async fn register_book(&self, id: &CollectionId, title: &str) -> Result<Book, LibraryError>;

    /// Flip the editable flag, returning the new value.
    async fn toggle_editable(&self, id: &CollectionId) -> Result<bool, LibraryError>;

    /// Remove an editable book from the registry, and with `purge` also its
    /// articles.
    async fn remove_book(&self, id: &CollectionId, purge: bool) -> Result<(), LibraryError>;

    /// Append articles to an editable book, returning how many were stored.
    async fn import_articles(
        &self,
        id: &CollectionId,
        articles: Vec<NewArticle>,
    ) -> Result<usize, LibraryError>;

    /// Search one book, returning a snippet per displayable hit.
    async fn search(&self, id: &CollectionId, query: &str) -> Result<SearchResults, LibraryError>;

    /// Open the article at zero-based browse index `index`.
    async fn browse(&self, id: &CollectionId, index: usize) -> Result<BrowsedArticle, LibraryError>;

    /// Partitions without a registry entry. Logged, never deleted.
    async fn reconcile(&self) -> Result<Vec<CollectionId>, LibraryError>;
}
