//! Book registry port (outbound).
//!
//! Defines the interface for the metadata partition: which books exist,
//! their titles and whether they are editable.

use async_trait::async_trait;

use crate::domain::{
    models::{Book, CollectionId},
    LibraryError,
};

/// Outbound port for book metadata persistence.
///
/// Methods return `Err` only for store failures. "No such book" is reported
/// through the `Ok` value, except for [`BookRegistry::get_book_title`].
#[async_trait]
pub trait BookRegistry: Send + Sync + 'static {
    /// All registered books, ordered by collection identifier.
    async fn list_books(&self) -> Result<Vec<Book>, LibraryError>;

    async fn has_book(&self, id: &CollectionId) -> Result<bool, LibraryError>;

    /// Register a book and create its article partition.
    ///
    /// Returns `false` without changing anything when either field is empty,
    /// the identifier is not a valid partition key, or the identifier is
    /// already taken by a registry entry or an existing partition.
    /// Concurrent registrations of one identifier are serialized, so at most
    /// one of them returns `true`.
    async fn add_book(&self, id: &CollectionId, title: &str) -> Result<bool, LibraryError>;

    /// Atomically flip the editable flag.
    ///
    /// Returns the new value, or `None` if the book does not exist.
    async fn set_book_editable(&self, id: &CollectionId) -> Result<Option<bool>, LibraryError>;

    /// The editable flag, or `None` if the book does not exist.
    async fn is_book_editable(&self, id: &CollectionId) -> Result<Option<bool>, LibraryError>;

    /// Remove the registry entry. No-op if the book does not exist.
    async fn delete_book(&self, id: &CollectionId) -> Result<(), LibraryError>;

    async fn get_book(&self, id: &CollectionId) -> Result<Option<Book>, LibraryError>;

    /// Title of a book the caller already knows exists.
    ///
    /// Fails with [`LibraryError::NotFound`] otherwise.
    async fn get_book_title(&self, id: &CollectionId) -> Result<String, LibraryError>;
}
