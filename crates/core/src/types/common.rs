//! Common helpers shared across domain models

/// Formats a position in seconds as `M:SS`
///
/// Negative and non-finite values render as `0:00`. Minutes are not wrapped
/// into hours, so a 75 minute track shows `75:00`.
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Parses an `M:SS` or `H:MM:SS` label back into seconds
pub fn parse_clock(label: &str) -> Option<f64> {
    let mut total: u64 = 0;
    let mut parts = 0;
    for part in label.trim().split(':') {
        let value: u64 = part.parse().ok()?;
        if parts > 0 && value >= 60 {
            return None;
        }
        total = total.checked_mul(60)?.checked_add(value)?;
        parts += 1;
    }
    if (2..=3).contains(&parts) {
        Some(total as f64)
    } else {
        None
    }
}

/// Clamps a value into `[min, max]`, mapping NaN to `min`
pub fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

/// Trait for types that can validate themselves
pub trait Validator {
    /// Validates the instance and returns errors if invalid
    fn validate(&self) -> Result<(), Vec<String>>;

    /// Returns true if the instance is valid
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
