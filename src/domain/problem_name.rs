use std::fmt;
use std::str::FromStr;

use super::MAX_TEXT_LEN;

/// Name of the problem attempted during a practice
#[derive(Debug, PartialEq, Clone)]
pub struct ProblemName(String);

impl FromStr for ProblemName {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err("Problem name cannot be empty".into());
        }
        // Characters, not graphemes: the column is varchar(255)
        if value.chars().count() > MAX_TEXT_LEN {
            return Err("Problem name too long".into());
        }

        Ok(Self(value.to_string()))
    }
}

impl AsRef<str> for ProblemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProblemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
