use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Whether a rule takes part in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    #[default]
    Enabled,
    Disabled,
    /// Active only in test runs.
    Testing,
}

impl Status {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Enabled => "Enabled",
            Status::Disabled => "Disabled",
            Status::Testing => "Testing",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status '{0}'")]
pub struct ParseStatusError(String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Status::Enabled, Status::Disabled, Status::Testing]
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStatusError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_enabled() {
        assert_eq!(Status::default(), Status::Enabled);
    }

    #[test]
    fn parse_ignores_case() {
        assert_eq!("testing".parse::<Status>().unwrap(), Status::Testing);
        assert_eq!(" DISABLED ".parse::<Status>().unwrap(), Status::Disabled);
        assert_eq!(
            "paused".parse::<Status>().unwrap_err().to_string(),
            "unknown status 'paused'"
        );
    }
}
