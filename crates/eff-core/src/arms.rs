use serde::{Deserialize, Serialize};

use crate::errors::{EffError, ErrorInfo};

/// Ordered list of treatment-arm labels. The first label is the reference arm.
///
/// The order is fixed at construction and drives the descriptive rows, the
/// indicator columns of the design matrix and the contrast rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TreatmentArms {
    labels: Vec<String>,
}

impl TreatmentArms {
    /// Builds the ordering, rejecting empty lists and duplicate labels.
    pub fn new<I, S>(labels: I) -> Result<Self, EffError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(EffError::Config(
                ErrorInfo::new("empty-treatments", "at least one treatment arm is required")
                    .with_hint("list the reference arm first"),
            ));
        }
        for (idx, label) in labels.iter().enumerate() {
            if labels[..idx].contains(label) {
                return Err(EffError::Config(
                    ErrorInfo::new("duplicate-treatment", "treatment labels must be unique")
                        .with_context("label", label.clone()),
                ));
            }
        }
        Ok(Self { labels })
    }

    /// Reference arm absorbed into the model intercept.
    pub fn reference(&self) -> &str {
        &self.labels[0]
    }

    /// Arms compared against the reference, in order.
    pub fn non_reference(&self) -> &[String] {
        &self.labels[1..]
    }

    /// Position of `label` in the ordering.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|candidate| candidate == label)
    }

    /// All labels in order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of arms.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false; an empty ordering cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates over the labels in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for TreatmentArms {
    type Error = EffError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(labels)
    }
}

impl From<TreatmentArms> for Vec<String> {
    fn from(arms: TreatmentArms) -> Self {
        arms.labels
    }
}
