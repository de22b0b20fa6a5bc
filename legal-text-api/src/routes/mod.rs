pub(crate) mod books;
pub(crate) mod browse;
pub(crate) mod error;
pub(crate) mod extract;
pub(crate) mod search;

pub(crate) use error::ApiError;
