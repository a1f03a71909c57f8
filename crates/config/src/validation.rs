//! Validation helpers for config sections

pub use crate::error::ValidationError;

/// A table of the config file
pub trait ConfigSection: Default {
    /// All problems in the section, or `Ok` when it is usable
    fn validate(&self) -> Result<(), Vec<ValidationError>>;
}

/// Field checks shared by the sections
pub struct Validator;

impl Validator {
    /// Inclusive range check; NaN is always out of range
    pub fn in_range<T>(value: T, min: T, max: T, field: &str) -> Result<(), ValidationError>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value >= min && value <= max {
            return Ok(());
        }
        Err(ValidationError::with_value(
            field,
            format!("must be between {} and {}", min, max),
            value,
        ))
    }

    /// Rejects empty and whitespace-only strings
    pub fn not_empty(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, "must not be empty"));
        }
        Ok(())
    }

    /// Reports the first value that appears twice
    pub fn unique<T>(values: &[T], field: &str) -> Result<(), ValidationError>
    where
        T: PartialEq + std::fmt::Display,
    {
        match values
            .iter()
            .enumerate()
            .find(|&(i, value)| values[..i].contains(value))
        {
            Some((_, duplicate)) => Err(ValidationError::with_value(
                field,
                "contains a duplicate",
                duplicate,
            )),
            None => Ok(()),
        }
    }

    /// Keeps the failures out of a batch of checks
    pub fn collect_errors(
        results: Vec<Result<(), ValidationError>>,
    ) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = results.into_iter().filter_map(Result::err).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
