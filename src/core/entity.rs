//! Entity trait - common interface for stored records, plus shared field rules

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::core::identity::EntityId;

/// Category used when none is given
pub const OTHER_CATEGORY: &str = "Other";

/// Unit used when none is given
pub const DEFAULT_UNIT: &str = "unit";

/// Common trait for all larder records
pub trait Entity: Serialize + DeserializeOwned {
    /// The entity type prefix (e.g., "STK", "RCP")
    const PREFIX: &'static str;

    /// Get the record's unique ID
    fn id(&self) -> &EntityId;

    /// Get the display name
    fn name(&self) -> &str;

    /// Get the creation timestamp
    fn created(&self) -> DateTime<Utc>;
}

/// Errors raised when input is incomplete or out of range
///
/// The operation that raised it has not mutated anything.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("Invalid quantity {value}: must be a finite, non-negative number")]
    InvalidQuantity { value: f64 },

    #[error("Recipe '{recipe}' needs at least one complete ingredient (name, positive quantity, unit)")]
    NoIngredients { recipe: String },
}

/// Trim and upper-case the first character, leaving the rest untouched
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Blank units fall back to [`DEFAULT_UNIT`]
pub fn normalize_unit(unit: Option<&str>) -> String {
    match unit.map(str::trim) {
        Some(u) if !u.is_empty() => u.to_string(),
        _ => DEFAULT_UNIT.to_string(),
    }
}

/// Blank categories fall back to [`OTHER_CATEGORY`]
pub fn normalize_category(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => OTHER_CATEGORY.to_string(),
    }
}

pub fn is_other(category: &str) -> bool {
    category == OTHER_CATEGORY
}

/// Case-insensitive exact name comparison
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Reject blank names, returning the normalized form
pub fn require_name(name: &str, field: &'static str) -> Result<String, ValidationError> {
    let normalized = normalize_name(name);
    if normalized.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(normalized)
}

/// Quantities must be finite and non-negative
pub fn require_quantity(value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidQuantity { value });
    }
    Ok(value)
}

/// Format a quantity without trailing zeros ("6", "0.5")
pub fn format_quantity(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    format!("{}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  apple "), "Apple");
        assert_eq!(normalize_name("óvári cheese"), "Óvári cheese");
        assert_eq!(normalize_name("Milk"), "Milk");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn test_defaults_for_blank_fields() {
        assert_eq!(normalize_unit(None), "unit");
        assert_eq!(normalize_unit(Some("  ")), "unit");
        assert_eq!(normalize_unit(Some("kg")), "kg");
        assert_eq!(normalize_category(Some("")), "Other");
        assert_eq!(normalize_category(Some("Dairy")), "Dairy");
    }

    #[test]
    fn test_require_quantity() {
        assert_eq!(require_quantity(0.0), Ok(0.0));
        assert!(require_quantity(-1.0).is_err());
        assert!(require_quantity(f64::NAN).is_err());
        assert!(require_quantity(f64::INFINITY).is_err());
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(6.0), "6");
        assert_eq!(format_quantity(0.5), "0.5");
        assert_eq!(format_quantity(0.1 + 0.2), "0.3");
    }
}
