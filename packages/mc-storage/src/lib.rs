pub mod activity;
pub mod db;
pub mod documents;
pub mod models;
pub mod schema;
pub mod search;
pub mod tasks;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
