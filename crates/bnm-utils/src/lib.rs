//! Shared utilities for the BNM rates bot
//!
//! This crate provides the ambient pieces used across the workspace:
//! tracing setup and typed access to process environment variables.

pub mod config;
pub mod logging;

pub use config::{EnvError, env_or, env_parse_or, required_env};
pub use logging::{LogFormat, init_tracing};
