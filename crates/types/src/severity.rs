//! Severity types for diagnostics and rule configuration.

use serde::{Deserialize, Serialize};

/// Severity of a reported diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The code is wrong at runtime (for example a default value of the wrong type)
    Error,
    /// The code violates a convention
    Warning,
}

impl Severity {
    /// Returns true if this severity indicates an error.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// Rule severity for lint configuration.
///
/// This represents how a rule should be reported, as configured by the user.
/// Rules can be turned off, reported as warnings, or as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Rule is disabled
    Off,
    /// Rule violations are reported as warnings (default)
    #[default]
    Warn,
    /// Rule violations are reported as errors
    Error,
}

impl RuleSeverity {
    /// Returns true if the rule is enabled (warn or error).
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Off)
    }

    /// Convert to the severity attached to reported diagnostics.
    ///
    /// Returns `None` if the rule is off.
    #[must_use]
    pub const fn to_severity(self) -> Option<Severity> {
        match self {
            Self::Off => None,
            Self::Warn => Some(Severity::Warning),
            Self::Error => Some(Severity::Error),
        }
    }

    /// Parse the textual form used in configuration files.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "off" | "none" => Some(Self::Off),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl From<Severity> for RuleSeverity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => Self::Error,
            Severity::Warning => Self::Warn,
        }
    }
}

impl std::fmt::Display for RuleSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}
