mod error;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod ports;
pub mod services;
pub mod snippet;

pub use error::LibraryError;
