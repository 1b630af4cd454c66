use crate::DomainError;
use std::fmt;
use std::sync::Arc;

/// Availability zone name, e.g. `us-west-2a`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Zone(Arc<str>);

impl Zone {
    /// Extracts the zone from a TXT payload that must hold exactly one value.
    pub fn classify<S: AsRef<str>>(values: &[S]) -> Result<Zone, DomainError> {
        let value = match values {
            [value] => value.as_ref().trim(),
            _ => {
                return Err(DomainError::classification(
                    "zone",
                    format!("expected exactly one value, found {}", values.len()),
                ))
            }
        };

        Self::validate(value)?;
        Ok(Zone(Arc::from(value)))
    }

    fn validate(value: &str) -> Result<(), DomainError> {
        if value.is_empty() {
            return Err(DomainError::classification("zone", "zone cannot be empty"));
        }

        if value.len() > 64 {
            return Err(DomainError::classification(
                "zone",
                "zone cannot exceed 64 characters",
            ));
        }

        if let Some(c) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
        {
            return Err(DomainError::classification(
                "zone",
                format!("unexpected character {:?} in '{}'", c, value),
            ));
        }

        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Zone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
