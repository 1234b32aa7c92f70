//! Validation rules for registry fields

use serde::Serialize;

/// Validation rules for a field
/// Copy trait for efficient passing
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ValidationRules {
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl ValidationRules {
    /// Create empty validation rules (all optional, no constraints)
    pub const fn none() -> Self {
        Self {
            required: false,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
        }
    }

    /// Create validation rules for required field
    pub const fn required() -> Self {
        Self {
            required: true,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
        }
    }

    /// Check if field is required
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Validate a string value against the rules
    pub fn validate_string(&self, value: &str, field_label: &str) -> Result<(), String> {
        if self.required && value.trim().is_empty() {
            return Err(format!("{} не может быть пустым", field_label));
        }

        let len = value.chars().count();

        if let Some(min) = self.min_length {
            if len < min {
                return Err(format!(
                    "{} должен содержать минимум {} символов",
                    field_label, min
                ));
            }
        }

        if let Some(max) = self.max_length {
            if len > max {
                return Err(format!(
                    "{} не должен превышать {} символов",
                    field_label, max
                ));
            }
        }

        Ok(())
    }

    /// Validate a numeric value against min/max rules
    pub fn validate_number(&self, value: f64, field_label: &str) -> Result<(), String> {
        if let Some(min) = self.min {
            if value < min {
                return Err(format!("{} должен быть не менее {}", field_label, min));
            }
        }

        if let Some(max) = self.max {
            if value > max {
                return Err(format!("{} должен быть не более {}", field_label, max));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        let rules = ValidationRules::required();
        assert!(rules.validate_string("  ", "Название").is_err());
        assert!(rules.validate_string("Гранит", "Название").is_ok());
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        let rules = ValidationRules {
            max_length: Some(6),
            ..ValidationRules::none()
        };
        assert!(rules.validate_string("привет", "Поле").is_ok());
        assert!(rules.validate_string("приветы", "Поле").is_err());
    }

    #[test]
    fn test_number_bounds() {
        let rules = ValidationRules {
            min: Some(0.0),
            max: Some(10.0),
            ..ValidationRules::none()
        };
        assert!(rules.validate_number(-1.0, "Цена").is_err());
        assert!(rules.validate_number(5.0, "Цена").is_ok());
        assert!(rules.validate_number(11.0, "Цена").is_err());
    }
}
