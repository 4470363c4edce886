// Environment variable loading

use super::{ConfigError, Result};
use std::collections::HashMap;
use std::env;
use std::str::FromStr;

/// Prefixed environment variable lookup over a snapshot of the environment
pub struct EnvLoader {
    prefix: String,
    vars: HashMap<String, String>,
}

impl EnvLoader {
    /// Snapshot the process environment
    pub fn from_env(prefix: impl Into<String>) -> Self {
        Self::from_map(prefix, env::vars().collect())
    }

    /// Use an explicit variable set
    pub fn from_map(prefix: impl Into<String>, vars: HashMap<String, String>) -> Self {
        Self {
            prefix: prefix.into(),
            vars,
        }
    }

    fn full_key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_uppercase()
        } else {
            format!("{}_{}", self.prefix, key.to_uppercase())
        }
    }

    /// Raw value of `<PREFIX>_<KEY>`; empty values count as unset
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars
            .get(&self.full_key(key))
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }

    /// Parsed value of `<PREFIX>_<KEY>`
    pub fn parse<T: FromStr>(&self, key: &str) -> Result<Option<T>>
    where
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw.trim().parse().map(Some).map_err(|e| {
                ConfigError::Parse(format!("{}={:?}: {}", self.full_key(key), raw, e))
            }),
        }
    }

    /// Comma-separated list value of `<PREFIX>_<KEY>`
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
    }
}
