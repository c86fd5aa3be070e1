//! Non-fatal diagnostics collected during one import or export.
//!
//! A [`WarningSet`] keeps at most one entry per warning type (see
//! [`Warning::key`]). When a warning of an existing type is added again, the
//! newer entry replaces the older one only if it carries more context.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Warning {
    /// A numeric element whose content could not be parsed.
    InvalidNumber { element: String, value: String },
    /// A keyword element whose content is not in the vocabulary table.
    UnknownValue { element: String, value: String },
    /// A motor descriptor that did not resolve against the motor database.
    MotorNotFound { descriptor: String },
    /// A feature present in the source that the target cannot represent.
    UnsupportedFeature {
        feature: String,
        detail: Option<String>,
    },
    Other(String),
}

/// Identity of a warning type; two warnings with equal keys are reconciled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKey<'a> {
    InvalidNumber(&'a str, &'a str),
    UnknownValue(&'a str, &'a str),
    MotorNotFound(&'a str),
    UnsupportedFeature(&'a str),
    Other(&'a str),
}

impl Warning {
    pub fn invalid_number(element: &str, value: &str) -> Self {
        Self::InvalidNumber {
            element: element.to_string(),
            value: value.to_string(),
        }
    }

    pub fn unknown_value(element: &str, value: &str) -> Self {
        Self::UnknownValue {
            element: element.to_string(),
            value: value.to_string(),
        }
    }

    pub fn unsupported(feature: &str, detail: Option<String>) -> Self {
        Self::UnsupportedFeature {
            feature: feature.to_string(),
            detail,
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    pub fn key(&self) -> WarningKey<'_> {
        match self {
            Self::InvalidNumber { element, value } => WarningKey::InvalidNumber(element, value),
            Self::UnknownValue { element, value } => WarningKey::UnknownValue(element, value),
            Self::MotorNotFound { descriptor } => WarningKey::MotorNotFound(descriptor),
            Self::UnsupportedFeature { feature, .. } => WarningKey::UnsupportedFeature(feature),
            Self::Other(message) => WarningKey::Other(message),
        }
    }

    fn specificity(&self) -> usize {
        match self {
            Self::UnsupportedFeature {
                detail: Some(_), ..
            } => 1,
            _ => 0,
        }
    }

    /// Whether `newer` should take this warning's place in a set.
    pub fn replace_by(&self, newer: &Warning) -> bool {
        newer.specificity() > self.specificity()
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNumber { element, value } => write!(
                f,
                "Could not convert {} value of {}. It is expected to be a number.",
                element, value
            ),
            Self::UnknownValue { element, value } => {
                write!(f, "Unknown {} value '{}', using default.", element, value)
            }
            Self::MotorNotFound { descriptor } => write!(
                f,
                "Could not find motor '{}' in the motor database. Please add it manually.",
                descriptor
            ),
            Self::UnsupportedFeature {
                feature,
                detail: Some(detail),
            } => write!(f, "{} is not supported: {}", feature, detail),
            Self::UnsupportedFeature {
                feature,
                detail: None,
            } => write!(f, "{} is not supported", feature),
            Self::Other(message) => f.write_str(message),
        }
    }
}

/// Ordered, de-duplicating warning collection for one operation.
#[derive(Debug, Clone, Default)]
pub struct WarningSet {
    warnings: Vec<Warning>,
}

impl WarningSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning. Returns `true` if a warning of the same type was already present.
    pub fn add(&mut self, warning: Warning) -> bool {
        match self.warnings.iter().position(|w| w.key() == warning.key()) {
            None => {
                tracing::debug!(%warning, "import warning");
                self.warnings.push(warning);
                false
            }
            Some(index) => {
                if self.warnings[index].replace_by(&warning) {
                    self.warnings[index] = warning;
                }
                true
            }
        }
    }

    pub fn add_other(&mut self, message: impl Into<String>) -> bool {
        self.add(Warning::other(message))
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Warning> {
        self.warnings.iter()
    }

    /// Freeze the set into the artifact handed back to callers.
    pub fn seal(self) -> SealedWarnings {
        SealedWarnings {
            warnings: self.warnings,
        }
    }
}

impl fmt::Display for WarningSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, &self.warnings)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, warnings: &[Warning]) -> fmt::Result {
    f.write_str("Warnings[")?;
    for (i, w) in warnings.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", w)?;
    }
    f.write_str("]")
}

/// Immutable warnings returned from a completed operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SealedWarnings {
    warnings: Vec<Warning>,
}

impl SealedWarnings {
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Warning> {
        self.warnings.iter()
    }

    pub fn as_slice(&self) -> &[Warning] {
        &self.warnings
    }
}

impl fmt::Display for SealedWarnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, &self.warnings)
    }
}

impl<'a> IntoIterator for &'a SealedWarnings {
    type Item = &'a Warning;
    type IntoIter = std::slice::Iter<'a, Warning>;

    fn into_iter(self) -> Self::IntoIter {
        self.warnings.iter()
    }
}
