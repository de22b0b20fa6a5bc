mod article;
mod book;
mod ids;
mod search;

pub use article::*;
pub use book::*;
pub use ids::*;
pub use search::*;
