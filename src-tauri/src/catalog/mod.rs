pub mod commands;
pub mod engine;
pub mod query;
pub mod store;

pub use query::{CatalogQuery, SortKey};
pub use store::Catalog;
