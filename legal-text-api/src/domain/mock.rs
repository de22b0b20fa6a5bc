//! In-memory library store for testing.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::domain::{
    models::{Article, Book, CollectionId, NewArticle, NewBook, Section},
    ports::outbound::{ArticleStore, BookRegistry},
    LibraryError,
};

#[derive(Default)]
struct MockState {
    books: BTreeMap<CollectionId, Book>,
    partitions: HashMap<CollectionId, Vec<Article>>,
    indexed: HashSet<CollectionId>,
    /// Fixed full-text candidates per book (overrides token matching).
    candidates: HashMap<CollectionId, Vec<Article>>,
}

/// Mock store implementing both outbound ports over one in-memory state.
///
/// Full-text search matches an article when any whitespace-separated query
/// token occurs in its text, which is deliberately broader than snippet
/// matching, like a real index.
///
/// # Examples
///
/// ```ignore
/// let store = MockLibraryStore::new()
///     .with_book("demo", "Demo Constitution", false)
///     .with_articles("demo", vec![article]);
/// ```
#[derive(Clone, Default)]
pub struct MockLibraryStore {
    state: Arc<RwLock<MockState>>,
    search_calls: Arc<AtomicUsize>,
    index_calls: Arc<AtomicUsize>,
    /// Number of upcoming calls that fail with `StoreUnavailable`.
    failures_left: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

#[allow(dead_code)]
impl MockLibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a book with an empty partition.
    pub fn with_book(self, id: &str, title: &str, editable: bool) -> Self {
        {
            let mut state = self.state.write().unwrap();
            let id = CollectionId::new(id);
            state.books.insert(
                id.clone(),
                Book {
                    collection: id.clone(),
                    title: title.to_string(),
                    editable,
                },
            );
            state.partitions.entry(id).or_default();
        }
        self
    }

    /// Store articles in a book's partition, assigning ordinals in order.
    pub fn with_articles(self, id: &str, articles: Vec<Article>) -> Self {
        {
            let mut state = self.state.write().unwrap();
            let partition = state.partitions.entry(CollectionId::new(id)).or_default();
            for (ordinal, mut article) in articles.into_iter().enumerate() {
                article.ordinal = ordinal as i32;
                partition.push(article);
            }
        }
        self
    }

    /// Create a partition with no registry entry.
    pub fn with_orphan_partition(self, id: &str) -> Self {
        self.state
            .write()
            .unwrap()
            .partitions
            .entry(CollectionId::new(id))
            .or_default();
        self
    }

    /// Make full-text search return exactly these articles for a book.
    pub fn with_candidates(self, id: &str, articles: Vec<Article>) -> Self {
        self.state
            .write()
            .unwrap()
            .candidates
            .insert(CollectionId::new(id), articles);
        self
    }

    /// Fail the next `count` calls with `StoreUnavailable`.
    pub fn failing(self, count: usize) -> Self {
        self.failures_left.store(count, Ordering::SeqCst);
        self
    }

    /// Delay every call, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn index_calls(&self) -> usize {
        self.index_calls.load(Ordering::SeqCst)
    }

    pub fn has_partition(&self, id: &str) -> bool {
        self.state
            .read()
            .unwrap()
            .partitions
            .contains_key(&CollectionId::new(id))
    }

    pub fn is_indexed(&self, id: &str) -> bool {
        self.state
            .read()
            .unwrap()
            .indexed
            .contains(&CollectionId::new(id))
    }

    async fn enter(&self) -> Result<(), LibraryError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failed {
            return Err(LibraryError::StoreUnavailable("mock outage".to_string()));
        }
        Ok(())
    }

    fn missing_partition(id: &CollectionId) -> LibraryError {
        LibraryError::Store(format!("relation \"{}\" does not exist", id.partition_name()))
    }
}

fn article_text(article: &Article) -> String {
    let mut text = article.title.to_lowercase();
    for section in &article.legal {
        match section {
            Section::Header(heading) => {
                text.push(' ');
                text.push_str(&heading.subtitle.to_lowercase());
            }
            Section::Content(block) => {
                for paragraph in &block.content {
                    text.push(' ');
                    text.push_str(&paragraph.to_lowercase());
                }
            }
        }
    }
    text
}

#[async_trait]
impl BookRegistry for MockLibraryStore {
    async fn list_books(&self) -> Result<Vec<Book>, LibraryError> {
        self.enter().await?;
        Ok(self.state.read().unwrap().books.values().cloned().collect())
    }

    async fn has_book(&self, id: &CollectionId) -> Result<bool, LibraryError> {
        self.enter().await?;
        Ok(self.state.read().unwrap().books.contains_key(id))
    }

    async fn add_book(&self, id: &CollectionId, title: &str) -> Result<bool, LibraryError> {
        self.enter().await?;
        let new_book = NewBook::new(id, title);
        if !new_book.is_well_formed() {
            return Ok(false);
        }

        let mut state = self.state.write().unwrap();
        if state.books.contains_key(id) || state.partitions.contains_key(id) {
            return Ok(false);
        }
        state.partitions.insert(id.clone(), Vec::new());
        state.books.insert(id.clone(), new_book.into_book());
        Ok(true)
    }

    async fn set_book_editable(&self, id: &CollectionId) -> Result<Option<bool>, LibraryError> {
        self.enter().await?;
        let mut state = self.state.write().unwrap();
        Ok(state.books.get_mut(id).map(|book| {
            book.editable = !book.editable;
            book.editable
        }))
    }

    async fn is_book_editable(&self, id: &CollectionId) -> Result<Option<bool>, LibraryError> {
        self.enter().await?;
        Ok(self.state.read().unwrap().books.get(id).map(|b| b.editable))
    }

    async fn delete_book(&self, id: &CollectionId) -> Result<(), LibraryError> {
        self.enter().await?;
        self.state.write().unwrap().books.remove(id);
        Ok(())
    }

    async fn get_book(&self, id: &CollectionId) -> Result<Option<Book>, LibraryError> {
        self.enter().await?;
        Ok(self.state.read().unwrap().books.get(id).cloned())
    }

    async fn get_book_title(&self, id: &CollectionId) -> Result<String, LibraryError> {
        self.enter().await?;
        self.state
            .read()
            .unwrap()
            .books
            .get(id)
            .map(|b| b.title.clone())
            .ok_or_else(|| LibraryError::NotFound(id.clone()))
    }
}

#[async_trait]
impl ArticleStore for MockLibraryStore {
    async fn list_articles(&self, book: &CollectionId) -> Result<Vec<Article>, LibraryError> {
        self.enter().await?;
        self.state
            .read()
            .unwrap()
            .partitions
            .get(book)
            .cloned()
            .ok_or_else(|| Self::missing_partition(book))
    }

    async fn full_text_search(
        &self,
        book: &CollectionId,
        query: &str,
    ) -> Result<Vec<Article>, LibraryError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;

        let state = self.state.read().unwrap();
        if !state.partitions.contains_key(book) {
            return Err(Self::missing_partition(book));
        }

        if let Some(candidates) = state.candidates.get(book) {
            return Ok(candidates.clone());
        }

        let tokens: Vec<String> = query
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .collect();
        let articles = state.partitions.get(book).map(Vec::as_slice).unwrap_or_default();
        Ok(articles
            .iter()
            .filter(|article| {
                let text = article_text(article);
                tokens.iter().any(|token| text.contains(token.as_str()))
            })
            .cloned()
            .collect())
    }

    async fn ensure_text_index(&self, book: &CollectionId) -> Result<(), LibraryError> {
        self.index_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;
        let mut state = self.state.write().unwrap();
        if !state.partitions.contains_key(book) {
            return Err(Self::missing_partition(book));
        }
        state.indexed.insert(book.clone());
        Ok(())
    }

    async fn append_articles(
        &self,
        book: &CollectionId,
        articles: &[NewArticle],
    ) -> Result<usize, LibraryError> {
        self.enter().await?;
        let mut state = self.state.write().unwrap();
        let partition = state
            .partitions
            .get_mut(book)
            .ok_or_else(|| Self::missing_partition(book))?;
        let next = partition.last().map(|a| a.ordinal + 1).unwrap_or(0);
        for (offset, article) in articles.iter().enumerate() {
            partition.push(article.clone().into_article(next + offset as i32));
        }
        Ok(articles.len())
    }

    async fn purge_articles(&self, book: &CollectionId) -> Result<(), LibraryError> {
        self.enter().await?;
        let mut state = self.state.write().unwrap();
        state.partitions.remove(book);
        state.indexed.remove(book);
        Ok(())
    }

    async fn list_partitions(&self) -> Result<Vec<CollectionId>, LibraryError> {
        self.enter().await?;
        let mut ids: Vec<_> = self.state.read().unwrap().partitions.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ContentBlock;

    fn article(title: &str, paragraph: &str) -> Article {
        Article {
            ordinal: 0,
            number: 1,
            title: title.to_string(),
            legal: vec![Section::Content(ContentBlock {
                content: vec![paragraph.to_string()],
            })],
        }
    }

    #[tokio::test]
    async fn add_book_creates_partition() {
        let store = MockLibraryStore::new();
        let id = CollectionId::new("demo");

        assert!(store.add_book(&id, "Demo").await.unwrap());
        assert!(store.has_partition("demo"));
        assert!(!store.add_book(&id, "Demo").await.unwrap());
    }

    #[tokio::test]
    async fn add_book_refuses_existing_partition() {
        let store = MockLibraryStore::new().with_orphan_partition("demo");
        assert!(!store.add_book(&CollectionId::new("demo"), "Demo").await.unwrap());
    }

    #[tokio::test]
    async fn search_matches_any_token() {
        let store = MockLibraryStore::new().with_book("demo", "Demo", false).with_articles(
            "demo",
            vec![article("One", "Alpha beta"), article("Two", "Gamma delta")],
        );

        let hits = store
            .full_text_search(&CollectionId::new("demo"), "BETA omega")
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "One");
        assert!(!store.is_indexed("demo"));
    }

    #[tokio::test]
    async fn failing_fails_then_recovers() {
        let store = MockLibraryStore::new().with_book("demo", "Demo", false).failing(1);
        let id = CollectionId::new("demo");

        assert!(store.has_book(&id).await.unwrap_err().is_transient());
        assert!(store.has_book(&id).await.unwrap());
    }
}
