use std::fmt;
use std::str::FromStr;

use super::MAX_TEXT_LEN;

/// Where the attempted problem can be found, usually a URL to a judge site
#[derive(Debug, PartialEq, Clone)]
pub struct ProblemLink(String);

impl FromStr for ProblemLink {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err("Problem link cannot be empty".into());
        }
        if value.chars().count() > MAX_TEXT_LEN {
            return Err("Problem link too long".into());
        }

        Ok(Self(value.to_string()))
    }
}

impl AsRef<str> for ProblemLink {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProblemLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
