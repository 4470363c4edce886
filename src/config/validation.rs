// Configuration validation

use super::{ConfigError, Result};

/// Field-level validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a value is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
        }
        Ok(())
    }

    /// Validate that a number is not zero
    pub fn non_zero(value: u64, field: &str) -> Result<()> {
        if value == 0 {
            return Err(ConfigError::Validation(format!(
                "{} must be greater than zero",
                field
            )));
        }
        Ok(())
    }

    /// Validate URL scheme
    pub fn is_url(value: &str, field: &str) -> Result<()> {
        if !value.starts_with("http://") && !value.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "{} must be a valid URL, got {:?}",
                field, value
            )));
        }
        Ok(())
    }

    /// Validate that a value is one of the allowed choices
    pub fn one_of(value: &str, allowed: &[&str], field: &str) -> Result<()> {
        if !allowed.contains(&value) {
            return Err(ConfigError::Validation(format!(
                "{} must be one of {:?}, got {:?}",
                field, allowed, value
            )));
        }
        Ok(())
    }

    /// Username and password are set together or not at all
    pub fn paired(a: &Option<String>, b: &Option<String>, fields: (&str, &str)) -> Result<()> {
        if a.is_some() != b.is_some() {
            return Err(ConfigError::Validation(format!(
                "{} and {} must be set together",
                fields.0, fields.1
            )));
        }
        Ok(())
    }
}
