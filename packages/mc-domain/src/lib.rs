//! Storage-agnostic rules shared by the service, the HTTP surface, and the feeder binaries.

pub mod clock;
pub mod feed;
pub mod metadata;
pub mod search_text;
pub mod vocab;
pub mod workspace;

pub use metadata::EventMetadata;
pub use vocab::{DocumentKind, EventSource, EventStatus, TaskKind, UnknownValue};
