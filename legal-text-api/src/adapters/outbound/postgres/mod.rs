//! PostgreSQL implementations of the outbound library ports.
//!
//! Layout: table `books` is the registry. Table `articles` is declared
//! `PARTITION BY LIST (collection_id)`, with one partition per book named
//! after [`CollectionId::partition_name`]. Partition and index DDL is built
//! from identifiers that passed [`CollectionId::is_valid`], and quoted
//! regardless.

mod article_store;
mod book_registry;

pub use article_store::PgArticleStore;
pub use book_registry::PgBookRegistry;

use crate::domain::models::CollectionId;

/// Text configuration used for both the index and the queries.
const TEXT_SEARCH_CONFIG: &str = "english";

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn quote_literal(literal: &str) -> String {
    format!("'{}'", literal.replace('\'', "''"))
}

fn create_partition_sql(id: &CollectionId) -> String {
    format!(
        "CREATE TABLE {} PARTITION OF articles FOR VALUES IN ({})",
        quote_ident(&id.partition_name()),
        quote_literal(id.as_str())
    )
}

fn drop_partition_sql(id: &CollectionId) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(&id.partition_name()))
}

/// Expression the text index is built on. Queries must repeat it verbatim
/// for the planner to use the index.
fn search_vector_sql() -> String {
    format!(
        "(to_tsvector('{cfg}', title) || jsonb_to_tsvector('{cfg}', legal, '[\"string\"]'))",
        cfg = TEXT_SEARCH_CONFIG
    )
}

fn create_text_index_sql(id: &CollectionId) -> String {
    let partition = id.partition_name();
    format!(
        "CREATE INDEX IF NOT EXISTS {} ON {} USING GIN ({})",
        quote_ident(&format!("{partition}_fts_idx")),
        quote_ident(&partition),
        search_vector_sql()
    )
}

/// Key for `pg_advisory_xact_lock`, serializing writers of one book.
fn book_lock_sql() -> &'static str {
    "SELECT pg_advisory_xact_lock(hashtext('book:' || $1))"
}
