//! Localization: supported languages and the string catalog

pub mod catalog;
pub mod language;

pub use catalog::{Catalog, MessageKey};
pub use language::Language;
