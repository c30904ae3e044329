//! Network-backed collaborators for the court core.

pub mod wikipedia;

pub use wikipedia::{WikiError, WikipediaLookup};
