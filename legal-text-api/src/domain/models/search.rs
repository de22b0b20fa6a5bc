use serde::Serialize;

use super::{Article, CollectionId};

/// A displayable excerpt for one matched article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnippetResult {
    pub title: String,
    pub art_number: i32,
    /// Anchor of the matched heading within the article page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
    /// Excerpt around a body match, with `…` marking truncation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Snippets for one query against one book, in index match order.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<SnippetResult>,
    pub num_results: usize,
}

impl SearchResults {
    pub fn new(query: impl Into<String>, results: Vec<SnippetResult>) -> Self {
        Self {
            query: query.into(),
            num_results: results.len(),
            results,
        }
    }
}

/// One article opened by browse index, with the book's title list for
/// navigation.
#[derive(Debug, Clone, Serialize)]
pub struct BrowsedArticle {
    pub collection: CollectionId,
    pub book_title: String,
    pub index: usize,
    pub article: Article,
    pub titles: Vec<String>,
}
