//! Declarative form validation.
//!
//! Each form declares a table of per-field rules; [`validate`] evaluates the
//! table against submitted values and produces a [`ValidationReport`] that
//! every form template consumes the same way. The first failing rule wins
//! per field.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// A single validation rule.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Character count must fall within `min..=max`.
    Length { min: usize, max: usize },
    /// Value must look like an email address.
    Email,
    /// Value must equal the named other field.
    Matches { other: &'static str },
}

/// A rule bound to a field name.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub rule: Rule,
}

/// Login form rules.
pub const LOGIN_RULES: &[FieldRule] = &[
    FieldRule {
        field: "username",
        rule: Rule::Length { min: 8, max: 20 },
    },
    FieldRule {
        field: "password",
        rule: Rule::Length { min: 8, max: 20 },
    },
];

/// Registration form rules.
pub const REGISTER_RULES: &[FieldRule] = &[
    FieldRule {
        field: "username",
        rule: Rule::Length { min: 8, max: 20 },
    },
    FieldRule {
        field: "email",
        rule: Rule::Email,
    },
    FieldRule {
        field: "password",
        rule: Rule::Length { min: 8, max: 20 },
    },
    FieldRule {
        field: "confirm_password",
        rule: Rule::Length { min: 8, max: 20 },
    },
    FieldRule {
        field: "confirm_password",
        rule: Rule::Matches { other: "password" },
    },
];

/// Per-field validation outcome, rendered inline next to each input.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    field_errors: BTreeMap<&'static str, String>,
}

impl ValidationReport {
    /// Whether every rule passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty()
    }

    /// The error message for a field, if any.
    #[must_use]
    pub fn error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }

    /// Record an error for a field. The first error per field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.field_errors.entry(field).or_insert_with(|| message.into());
    }
}

/// Evaluate a rule table against submitted `(field, value)` pairs.
#[must_use]
pub fn validate(values: &[(&'static str, &str)], rules: &[FieldRule]) -> ValidationReport {
    let mut report = ValidationReport::default();

    for &FieldRule { field, rule } in rules {
        let value = lookup(values, field);
        match rule {
            Rule::Length { min, max } => {
                let count = value.chars().count();
                if count < min || count > max {
                    report.add(
                        field,
                        format!("Please fill this field with {min}-{max} characters"),
                    );
                }
            }
            Rule::Email => {
                if !EMAIL_PATTERN.is_match(value) {
                    report.add(field, "Please input a valid email.".to_string());
                }
            }
            Rule::Matches { other } => {
                if value != lookup(values, other) {
                    report.add(field, "Passwords do not match.".to_string());
                }
            }
        }
    }

    report
}

fn lookup<'a>(values: &[(&'static str, &'a str)], field: &str) -> &'a str {
    values
        .iter()
        .copied()
        .find(|(name, _)| *name == field)
        .map_or("", |(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_bounds() {
        let report = validate(&[("username", "short")], LOGIN_RULES);
        assert_eq!(
            report.error("username"),
            Some("Please fill this field with 8-20 characters")
        );

        let report = validate(
            &[("username", "exactly8c"), ("password", "longenough")],
            LOGIN_RULES,
        );
        assert!(report.is_valid());
    }

    #[test]
    fn test_length_over_max() {
        let report = validate(
            &[("username", "a-very-long-username-over-twenty")],
            LOGIN_RULES,
        );
        assert!(report.error("username").is_some());
    }

    #[test]
    fn test_missing_field_counts_as_empty() {
        let report = validate(&[], LOGIN_RULES);
        assert!(report.error("username").is_some());
        assert!(report.error("password").is_some());
        assert!(!report.is_valid());
    }

    #[test]
    fn test_email_pattern() {
        let ok = [("email", "user@example.com")];
        let bad = [("email", "not-an-email")];

        assert!(
            validate(&ok, &[FieldRule {
                field: "email",
                rule: Rule::Email
            }])
            .is_valid()
        );
        assert_eq!(
            validate(&bad, &[FieldRule {
                field: "email",
                rule: Rule::Email
            }])
            .error("email"),
            Some("Please input a valid email.")
        );
    }

    #[test]
    fn test_password_confirmation() {
        let values = [
            ("username", "validuser1"),
            ("email", "user@example.com"),
            ("password", "password1"),
            ("confirm_password", "password2"),
        ];
        let report = validate(&values, REGISTER_RULES);
        assert_eq!(
            report.error("confirm_password"),
            Some("Passwords do not match.")
        );
        // The other fields are fine
        assert!(report.error("username").is_none());
        assert!(report.error("password").is_none());
    }

    #[test]
    fn test_first_failing_rule_wins() {
        // A too-short confirmation both fails the length rule and mismatches;
        // only the length message is reported.
        let values = [("password", "password1"), ("confirm_password", "abc")];
        let report = validate(&values, REGISTER_RULES);
        assert_eq!(
            report.error("confirm_password"),
            Some("Please fill this field with 8-20 characters")
        );
    }

    #[test]
    fn test_valid_registration() {
        let values = [
            ("username", "validuser1"),
            ("email", "user@example.com"),
            ("password", "password1"),
            ("confirm_password", "password1"),
        ];
        assert!(validate(&values, REGISTER_RULES).is_valid());
    }
}
