pub mod cache;
pub mod db;
pub mod documents;
pub mod facets;
pub mod models;
pub mod query_log;
pub mod schema;
pub mod taxonomy;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
