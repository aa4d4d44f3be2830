//! Inbound diagnosis request

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{Result, VetgateError};

/// One diagnostic request, as handed over by the endpoint collaborator.
///
/// `requester_id` is the already-authenticated caller identity; the gateway
/// trusts it as-is. Missing, `null` or mistyped collection fields
/// deserialize as empty rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceRequest {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub symptoms: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub requester_id: String,
}

impl InferenceRequest {
    pub fn new(requester_id: impl Into<String>) -> Self {
        Self {
            requester_id: requester_id.into(),
            ..Self::default()
        }
    }

    pub fn image(mut self, reference: impl Into<String>) -> Self {
        self.images.push(reference.into());
        self
    }

    pub fn symptom(mut self, symptom: impl Into<String>) -> Self {
        self.symptoms.push(symptom.into());
        self
    }

    pub fn symptoms<I, S>(mut self, symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symptoms.extend(symptoms.into_iter().map(Into::into));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = subject_id.into();
        self
    }

    /// True when there is nothing to diagnose: no images, no symptoms and a
    /// blank description.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.symptoms.is_empty() && self.description.trim().is_empty()
    }

    /// Reject requests with no images, symptoms or description.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(VetgateError::InvalidInput(
                "at least one of images, symptoms or description is required".into(),
            ));
        }
        Ok(())
    }
}

/// Accept an array of strings; anything else (null, scalar, object) is
/// empty. Non-string array elements are dropped.
fn lenient_strings<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}
