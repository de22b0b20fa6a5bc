//! PostgreSQL implementation of the ArticleStore port.

use async_trait::async_trait;
use sqlx::{types::Json, PgPool};

use super::{
    book_lock_sql, create_text_index_sql, drop_partition_sql, search_vector_sql,
    TEXT_SEARCH_CONFIG,
};
use crate::domain::{
    models::{Article, CollectionId, NewArticle, Section},
    ports::outbound::ArticleStore,
    LibraryError,
};

/// Article store over the list-partitioned `articles` table.
///
/// Full-text search uses `websearch_to_tsquery`, so matching is per token,
/// case-insensitive and stemmed. Hits are ordered by `ts_rank_cd`, then by
/// ordinal.
#[derive(Clone)]
pub struct PgArticleStore {
    pool: PgPool,
}

impl PgArticleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ArticleRow {
    ordinal: i32,
    number: i32,
    title: String,
    legal: Json<Vec<Section>>,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Article {
            ordinal: row.ordinal,
            number: row.number,
            title: row.title,
            legal: row.legal.0,
        }
    }
}

#[async_trait]
impl ArticleStore for PgArticleStore {
    async fn list_articles(&self, book: &CollectionId) -> Result<Vec<Article>, LibraryError> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT ordinal, number, title, legal
            FROM articles
            WHERE collection_id = $1
            ORDER BY ordinal
            "#,
        )
        .bind(book.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Article::from).collect())
    }

    async fn full_text_search(
        &self,
        book: &CollectionId,
        query: &str,
    ) -> Result<Vec<Article>, LibraryError> {
        let sql = format!(
            r#"
            SELECT ordinal, number, title, legal
            FROM articles
            WHERE collection_id = $1
              AND {vector} @@ websearch_to_tsquery('{cfg}', $2)
            ORDER BY ts_rank_cd({vector}, websearch_to_tsquery('{cfg}', $2)) DESC, ordinal
            "#,
            vector = search_vector_sql(),
            cfg = TEXT_SEARCH_CONFIG,
        );

        let rows = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(book.as_str())
            .bind(query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Article::from).collect())
    }

    async fn ensure_text_index(&self, book: &CollectionId) -> Result<(), LibraryError> {
        sqlx::query(&create_text_index_sql(book))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn append_articles(
        &self,
        book: &CollectionId,
        articles: &[NewArticle],
    ) -> Result<usize, LibraryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(book_lock_sql())
            .bind(book.as_str())
            .execute(&mut *tx)
            .await?;

        let next_ordinal = sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(ordinal) + 1, 0) FROM articles WHERE collection_id = $1",
        )
        .bind(book.as_str())
        .fetch_one(&mut *tx)
        .await?;

        for (offset, article) in articles.iter().cloned().enumerate() {
            let article = article.into_article(next_ordinal + offset as i32);
            sqlx::query(
                r#"
                INSERT INTO articles (collection_id, ordinal, number, title, legal)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(book.as_str())
            .bind(article.ordinal)
            .bind(article.number)
            .bind(&article.title)
            .bind(Json(&article.legal))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(articles.len())
    }

    async fn purge_articles(&self, book: &CollectionId) -> Result<(), LibraryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(book_lock_sql())
            .bind(book.as_str())
            .execute(&mut *tx)
            .await?;

        sqlx::query(&drop_partition_sql(book))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_partitions(&self) -> Result<Vec<CollectionId>, LibraryError> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT child.relname::text
            FROM pg_inherits
            JOIN pg_class parent ON parent.oid = pg_inherits.inhparent
            JOIN pg_class child ON child.oid = pg_inherits.inhrelid
            WHERE parent.relname = 'articles'
            ORDER BY child.relname
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names
            .iter()
            .filter_map(|name| CollectionId::from_partition_name(name))
            .collect())
    }
}
