//! Upstream API clients

pub mod bnm;

pub use bnm::{BnmClient, RateSource, parse_document};
