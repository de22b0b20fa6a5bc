use std::{collections::HashSet, future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use itertools::Itertools;
use tracing::instrument;

use crate::domain::{
    models::{Book, BrowsedArticle, CollectionId, NewArticle, NewBook, SearchResults},
    ports::{
        inbound::LibraryService,
        outbound::{ArticleStore, BookRegistry},
    },
    snippet::{self, DEFAULT_SNIPPET_WINDOW},
    LibraryError,
};

/// Configuration for the library service.
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Excerpt length for body matches, in characters
    pub snippet_window: usize,
    /// Deadline for a single store call
    pub store_timeout: Duration,
    /// Pause before retrying a read after the store was unavailable
    pub retry_backoff: Duration,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            snippet_window: DEFAULT_SNIPPET_WINDOW,
            store_timeout: Duration::from_secs(5),
            retry_backoff: Duration::from_millis(200),
        }
    }
}

/// Implementation of the LibraryService inbound port.
///
/// Orchestrates the book registry and the article store: existence checks,
/// the editable policy on mutations, search with snippet extraction, and
/// browsing. Every store call runs under `store_timeout`; reads are retried
/// once when the store is unavailable, mutations are not.
pub struct LibraryServiceImpl<R, S> {
    registry: Arc<R>,
    store: Arc<S>,
    config: LibraryConfig,
}

impl<R: BookRegistry, S: ArticleStore> LibraryServiceImpl<R, S> {
    pub fn new(registry: Arc<R>, store: Arc<S>, config: LibraryConfig) -> Self {
        Self {
            registry,
            store,
            config,
        }
    }

    /// Run one store call under the configured deadline.
    async fn attempt<T, Fut>(&self, operation: &'static str, call: Fut) -> Result<T, LibraryError>
    where
        Fut: Future<Output = Result<T, LibraryError>>,
    {
        match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(LibraryError::StoreUnavailable(format!(
                "{} timed out after {:?}",
                operation, self.config.store_timeout
            ))),
        }
    }

    /// Read from the store, retrying once after a backoff if it is unavailable.
    async fn read<T, F, Fut>(&self, operation: &'static str, mut call: F) -> Result<T, LibraryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LibraryError>>,
    {
        match self.attempt(operation, call()).await {
            Err(err) if err.is_transient() => {
                tracing::warn!("{} failed, retrying once: {}", operation, err);
                tokio::time::sleep(self.config.retry_backoff).await;
                self.attempt(operation, call()).await
            }
            result => result,
        }
    }

    async fn require_book(&self, id: &CollectionId) -> Result<(), LibraryError> {
        let registry = &self.registry;
        if self.read("has_book", || registry.has_book(id)).await? {
            Ok(())
        } else {
            Err(LibraryError::NotFound(id.clone()))
        }
    }

    async fn require_editable(&self, id: &CollectionId) -> Result<(), LibraryError> {
        let registry = &self.registry;
        match self.read("is_book_editable", || registry.is_book_editable(id)).await? {
            None => Err(LibraryError::NotFound(id.clone())),
            Some(false) => Err(LibraryError::NotEditable(id.clone())),
            Some(true) => Ok(()),
        }
    }
}

#[async_trait]
impl<R: BookRegistry, S: ArticleStore> LibraryService for LibraryServiceImpl<R, S> {
    async fn list_books(&self) -> Result<Vec<Book>, LibraryError> {
        let registry = &self.registry;
        self.read("list_books", || registry.list_books()).await
    }

    async fn get_book(&self, id: &CollectionId) -> Result<Book, LibraryError> {
        let registry = &self.registry;
        self.read("get_book", || registry.get_book(id))
            .await?
            .ok_or_else(|| LibraryError::NotFound(id.clone()))
    }

    #[instrument(skip(self))]
    async fn register_book(&self, id: &CollectionId, title: &str) -> Result<Book, LibraryError> {
        let registered = self
            .attempt("add_book", self.registry.add_book(id, title))
            .await?;

        if !registered {
            tracing::warn!("Rejected registration of book '{}'", id);
            return Err(LibraryError::validation(format!(
                "Failed to add book '{}'. The collection must be 1-40 characters of a-z, 0-9 or '_' \
                 and not already in use, and the title must not be empty.",
                id
            )));
        }

        tracing::info!("Registered book '{}'", id);
        Ok(NewBook::new(id, title).into_book())
    }

    #[instrument(skip(self))]
    async fn toggle_editable(&self, id: &CollectionId) -> Result<bool, LibraryError> {
        let editable = self
            .attempt("set_book_editable", self.registry.set_book_editable(id))
            .await?
            .ok_or_else(|| LibraryError::NotFound(id.clone()))?;

        tracing::info!("Toggled book '{}' editability to {}", id, editable);
        Ok(editable)
    }

    #[instrument(skip(self))]
    async fn remove_book(&self, id: &CollectionId, purge: bool) -> Result<(), LibraryError> {
        self.require_editable(id).await?;

        // Partition goes first: a failure leaves the book registered, so the
        // removal can be retried.
        if purge {
            self.attempt("purge_articles", self.store.purge_articles(id))
                .await?;
        }
        self.attempt("delete_book", self.registry.delete_book(id))
            .await?;

        tracing::info!("Deleted book '{}' (purged articles: {})", id, purge);
        Ok(())
    }

    #[instrument(skip(self, articles), fields(count = articles.len()))]
    async fn import_articles(
        &self,
        id: &CollectionId,
        articles: Vec<NewArticle>,
    ) -> Result<usize, LibraryError> {
        self.require_editable(id).await?;
        if articles.is_empty() {
            return Ok(0);
        }

        let imported = self
            .attempt("append_articles", self.store.append_articles(id, &articles))
            .await?;

        tracing::info!("Imported {} articles into '{}'", imported, id);
        Ok(imported)
    }

    #[instrument(skip(self))]
    async fn search(&self, id: &CollectionId, query: &str) -> Result<SearchResults, LibraryError> {
        self.require_book(id).await?;

        let query = query.trim();
        let store = &self.store;
        let candidates = if query.is_empty() {
            Vec::new()
        } else {
            self.read("full_text_search", || store.full_text_search(id, query))
                .await?
        };

        self.read("ensure_text_index", || store.ensure_text_index(id))
            .await?;

        let results = candidates
            .iter()
            .filter_map(|article| snippet::extract(article, query, self.config.snippet_window))
            .collect_vec();

        tracing::debug!(
            "Search in '{}' kept {} of {} candidates",
            id,
            results.len(),
            candidates.len()
        );
        Ok(SearchResults::new(query, results))
    }

    #[instrument(skip(self))]
    async fn browse(&self, id: &CollectionId, index: usize) -> Result<BrowsedArticle, LibraryError> {
        self.require_book(id).await?;

        let (registry, store) = (&self.registry, &self.store);
        let articles = self.read("list_articles", || store.list_articles(id)).await?;
        let book_title = self
            .read("get_book_title", || registry.get_book_title(id))
            .await?;

        let titles = articles.iter().map(|a| a.title.clone()).collect_vec();
        let count = articles.len();
        let article = articles
            .into_iter()
            .nth(index)
            .ok_or(LibraryError::IndexOutOfRange { index, count })?;

        Ok(BrowsedArticle {
            collection: id.clone(),
            book_title,
            index,
            article,
            titles,
        })
    }

    #[instrument(skip(self))]
    async fn reconcile(&self) -> Result<Vec<CollectionId>, LibraryError> {
        let (registry, store) = (&self.registry, &self.store);
        let registered: HashSet<CollectionId> = self
            .read("list_books", || registry.list_books())
            .await?
            .into_iter()
            .map(|book| book.collection)
            .collect();

        let orphans = self
            .read("list_partitions", || store.list_partitions())
            .await?
            .into_iter()
            .filter(|id| !registered.contains(id))
            .collect_vec();

        for orphan in &orphans {
            tracing::warn!(
                "Partition '{}' has no registry entry",
                orphan.partition_name()
            );
        }
        Ok(orphans)
    }
}
