use serde::{Deserialize, Serialize};

use super::CollectionId;

/// A registered collection of legal text, e.g. a state constitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub collection: CollectionId,
    pub title: String,
    /// Gates deletion and article import.
    pub editable: bool,
}

/// Registration request for a book.
#[derive(Debug, Clone)]
pub struct NewBook<'a> {
    pub collection: &'a CollectionId,
    pub title: &'a str,
}

impl<'a> NewBook<'a> {
    pub fn new(collection: &'a CollectionId, title: &'a str) -> Self {
        Self { collection, title }
    }

    /// Field-level preconditions of registration. Uniqueness is the
    /// registry's concern.
    pub fn is_well_formed(&self) -> bool {
        self.collection.is_valid() && !self.title.trim().is_empty()
    }

    /// The book as it exists right after registration.
    pub fn into_book(self) -> Book {
        Book {
            collection: self.collection.clone(),
            title: self.title.to_string(),
            editable: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_requires_both_fields() {
        let id = CollectionId::new("alcons");
        let empty = CollectionId::new("");

        assert!(NewBook::new(&id, "Alabama Constitution").is_well_formed());
        assert!(!NewBook::new(&empty, "Alabama Constitution").is_well_formed());
        assert!(!NewBook::new(&id, "").is_well_formed());
        assert!(!NewBook::new(&id, "   ").is_well_formed());
    }

    #[test]
    fn new_books_start_read_only() {
        let id = CollectionId::new("alcons");
        let book = NewBook::new(&id, "Alabama Constitution").into_book();
        assert!(!book.editable);
        assert_eq!(book.title, "Alabama Constitution");
    }
}
