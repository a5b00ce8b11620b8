//! Deployment mode selecting how much failure detail clients may see.

use std::str::FromStr;

/// Verbosity of client-facing error responses.
///
/// Set once at start-up and handed to the error renderer; never changed while
/// requests are in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeploymentMode {
    /// Full failure detail, including stacks, for any request.
    Development,
    /// Operational messages only; everything else is replaced by a generic
    /// message and reported to operators.
    Production,
}

impl DeploymentMode {
    /// Wire representation accepted by [`DeploymentMode::from_str`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl std::fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The supplied value names no known deployment mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown deployment mode '{value}'; expected development|production")]
pub struct UnknownDeploymentMode {
    /// Value as supplied.
    pub value: String,
}

impl FromStr for DeploymentMode {
    type Err = UnknownDeploymentMode;

    /// Parse `development` or `production`, exactly as written.
    ///
    /// # Examples
    /// ```
    /// use tour_backend::domain::DeploymentMode;
    ///
    /// assert_eq!("production".parse(), Ok(DeploymentMode::Production));
    /// assert!("staging".parse::<DeploymentMode>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(UnknownDeploymentMode {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("development", DeploymentMode::Development)]
    #[case("production", DeploymentMode::Production)]
    fn parses_known_modes(#[case] raw: &str, #[case] expected: DeploymentMode) {
        assert_eq!(raw.parse::<DeploymentMode>(), Ok(expected));
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    #[case("Production")]
    #[case(" development")]
    #[case("test")]
    #[case("")]
    fn rejects_anything_else(#[case] raw: &str) {
        let err = raw.parse::<DeploymentMode>().expect_err("unknown mode");
        assert_eq!(err.value, raw);
    }
}
