use crate::DomainError;
use std::fmt;
use std::str::FromStr;

/// Cloud platform the host runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Platform {
    Aws,
    #[default]
    Unknown,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Aws => "aws",
            Platform::Unknown => "unknown",
        }
    }

    /// Maps raw platform TXT values to a variant.
    ///
    /// Any value carrying a recognized signature wins; an empty or
    /// unrecognized payload is `Unknown`, never an error.
    pub fn classify<S: AsRef<str>>(values: &[S]) -> Platform {
        values
            .iter()
            .find_map(|value| Self::from_signature(value.as_ref()))
            .unwrap_or(Platform::Unknown)
    }

    fn from_signature(value: &str) -> Option<Platform> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("aws")
            || value.eq_ignore_ascii_case("amazon")
            || value.eq_ignore_ascii_case("amazon ec2")
            || value.to_ascii_lowercase().starts_with("aws:")
        {
            return Some(Platform::Aws);
        }
        None
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aws" => Ok(Platform::Aws),
            "unknown" => Ok(Platform::Unknown),
            _ => Err(DomainError::classification(
                "platform",
                format!("unrecognized platform '{}'", s),
            )),
        }
    }
}
