use serde::Serialize;
use std::fmt;

/// FieldError
///
/// A single failed rule on a named request field. Serialized into the `errors`
/// array of a 400 response so forms can render inline messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// ValidationError
///
/// Every rule violation found while checking one payload. Checks never stop at
/// the first failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationError {}

/// Checks
///
/// Accumulator used by the `validate` methods on request payloads.
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Returns the trimmed value, or records `message` when it is absent or blank.
    pub fn require(
        &mut self,
        field: &'static str,
        value: Option<String>,
        message: &str,
    ) -> Option<String> {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                self.fail(field, message);
                None
            }
        }
    }

    /// Character-count bounds, inclusive on both ends.
    pub fn length(
        &mut self,
        field: &'static str,
        value: &str,
        min: usize,
        max: usize,
        message: &str,
    ) {
        let len = value.chars().count();
        if len < min || len > max {
            self.fail(field, message);
        }
    }

    pub fn email(&mut self, field: &'static str, value: &str) {
        if !is_email(value) {
            self.fail(field, "Please provide a valid email");
        }
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                errors: self.errors,
            })
        }
    }
}

/// Trims and drops empty optional text, so `""` from a form becomes `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && tld.len() >= 2 && !tld.ends_with('.'))
        && !value.chars().any(char::is_whitespace)
}
