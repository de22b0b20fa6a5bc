mod article_store;
mod book_registry;

pub use article_store::*;
pub use book_registry::*;
