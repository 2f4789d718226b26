//! Structured error types shared across the efficacy crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload shared by every [`EffError`] family.
///
/// Design failures carry `subjects`, `parameters` and one `n[<arm>]` entry
/// per treatment arm; loader failures carry `path` and, where relevant,
/// `column` or `row`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Kebab-case code such as `empty-arm` or `missing-column`.
    pub code: String,
    /// Diagnostic message.
    pub message: String,
    /// Context entries, rendered in key order.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Remediation hint or the underlying library error text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload without context.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds or replaces a context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets the hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the efficacy analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum EffError {
    /// A required column or value is absent and cannot be recovered by exclusion.
    #[error("missing data: {0}")]
    MissingData(ErrorInfo),
    /// The pooled design matrix cannot be fitted.
    #[error("singular design: {0}")]
    SingularDesign(ErrorInfo),
    /// The analysis plan is invalid.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// The analysis data disagrees with the plan.
    #[error("data error: {0}")]
    Data(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Filesystem errors.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl EffError {
    /// Payload of whichever family the error belongs to.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            EffError::MissingData(info)
            | EffError::SingularDesign(info)
            | EffError::Config(info)
            | EffError::Data(info)
            | EffError::Serde(info)
            | EffError::Io(info) => info,
        }
    }
}
