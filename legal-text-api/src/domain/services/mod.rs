mod library;

pub use library::{LibraryConfig, LibraryServiceImpl};
