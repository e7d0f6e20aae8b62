//! Environment configuration helpers

use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// A required variable is not set or is blank
    #[error("{0} not set")]
    Missing(String),

    /// A variable is set but cannot be parsed
    #[error("invalid value for {name}: {value}")]
    Invalid { name: String, value: String },
}

/// Read a required, non-empty variable
pub fn required_env(name: &str) -> Result<String, EnvError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(EnvError::Missing(name.to_string())),
    }
}

/// Read an optional variable, falling back to `default`
pub fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Read and parse an optional variable, falling back to `default` when unset
pub fn env_parse_or<T: FromStr>(name: &str, default: T) -> Result<T, EnvError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            value.trim().parse().map_err(|_| EnvError::Invalid {
                name: name.to_string(),
                value,
            })
        }
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable name; the process environment is shared.

    #[test]
    fn test_required_env_missing() {
        let err = required_env("BNM_UTILS_TEST_MISSING").unwrap_err();
        assert_eq!(err, EnvError::Missing("BNM_UTILS_TEST_MISSING".to_string()));
        assert_eq!(err.to_string(), "BNM_UTILS_TEST_MISSING not set");
    }

    #[test]
    fn test_required_env_blank_is_missing() {
        unsafe { std::env::set_var("BNM_UTILS_TEST_BLANK", "   ") };
        assert!(required_env("BNM_UTILS_TEST_BLANK").is_err());
        unsafe { std::env::remove_var("BNM_UTILS_TEST_BLANK") };
    }

    #[test]
    fn test_env_or_default() {
        assert_eq!(env_or("BNM_UTILS_TEST_UNSET", "fallback"), "fallback");
    }

    #[test]
    fn test_env_parse_or() {
        assert_eq!(env_parse_or("BNM_UTILS_TEST_NUM_UNSET", 15_u64), Ok(15));

        unsafe { std::env::set_var("BNM_UTILS_TEST_NUM", "42") };
        assert_eq!(env_parse_or("BNM_UTILS_TEST_NUM", 15_u64), Ok(42));

        unsafe { std::env::set_var("BNM_UTILS_TEST_NUM", "abc") };
        assert!(matches!(
            env_parse_or("BNM_UTILS_TEST_NUM", 15_u64),
            Err(EnvError::Invalid { .. })
        ));
        unsafe { std::env::remove_var("BNM_UTILS_TEST_NUM") };
    }
}
