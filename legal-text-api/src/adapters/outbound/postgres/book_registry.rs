//! PostgreSQL implementation of the BookRegistry port.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{book_lock_sql, create_partition_sql};
use crate::domain::{
    models::{Book, CollectionId, NewBook},
    ports::outbound::BookRegistry,
    LibraryError,
};

/// Registry backed by the `books` table.
#[derive(Clone)]
pub struct PgBookRegistry {
    pool: PgPool,
}

impl PgBookRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    collection_id: String,
    title: String,
    editable: bool,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            collection: CollectionId::new(row.collection_id),
            title: row.title,
            editable: row.editable,
        }
    }
}

#[async_trait]
impl BookRegistry for PgBookRegistry {
    async fn list_books(&self) -> Result<Vec<Book>, LibraryError> {
        let rows = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT collection_id, title, editable
            FROM books
            ORDER BY collection_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn has_book(&self, id: &CollectionId) -> Result<bool, LibraryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM books WHERE collection_id = $1)",
        )
        .bind(id.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn add_book(&self, id: &CollectionId, title: &str) -> Result<bool, LibraryError> {
        if !NewBook::new(id, title).is_well_formed() {
            return Ok(false);
        }

        // Lock, checks, partition DDL and insert commit or roll back together.
        let mut tx = self.pool.begin().await?;

        sqlx::query(book_lock_sql())
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;

        let registered = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM books WHERE collection_id = $1)",
        )
        .bind(id.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let partition_exists = sqlx::query_scalar::<_, bool>(
            "SELECT to_regclass($1::text) IS NOT NULL",
        )
        .bind(id.partition_name())
        .fetch_one(&mut *tx)
        .await?;

        if registered || partition_exists {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(&create_partition_sql(id))
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO books (collection_id, title) VALUES ($1, $2)")
            .bind(id.as_str())
            .bind(title)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn set_book_editable(&self, id: &CollectionId) -> Result<Option<bool>, LibraryError> {
        let editable = sqlx::query_scalar::<_, bool>(
            r#"
            UPDATE books
            SET editable = NOT editable
            WHERE collection_id = $1
            RETURNING editable
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(editable)
    }

    async fn is_book_editable(&self, id: &CollectionId) -> Result<Option<bool>, LibraryError> {
        let editable =
            sqlx::query_scalar::<_, bool>("SELECT editable FROM books WHERE collection_id = $1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await?;

        Ok(editable)
    }

    async fn delete_book(&self, id: &CollectionId) -> Result<(), LibraryError> {
        sqlx::query("DELETE FROM books WHERE collection_id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_book(&self, id: &CollectionId) -> Result<Option<Book>, LibraryError> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT collection_id, title, editable
            FROM books
            WHERE collection_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Book::from))
    }

    async fn get_book_title(&self, id: &CollectionId) -> Result<String, LibraryError> {
        sqlx::query_scalar::<_, String>("SELECT title FROM books WHERE collection_id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| LibraryError::NotFound(id.clone()))
    }
}
