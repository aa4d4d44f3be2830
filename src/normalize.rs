//! Extraction of a structured [`Diagnosis`] from raw completion text.
//!
//! Models are asked for bare JSON but often wrap it in a markdown fence
//! (```` ```json ... ``` ````). When a fenced block is present only its
//! interior is parsed; otherwise the whole text is. Nothing here touches
//! the network, so every failure mode is unit-testable.

use serde::Deserialize;

use crate::types::Diagnosis;
use crate::{Result, VetgateError};

const FENCE: &str = "```";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDiagnosis {
    diagnosis: String,
    confidence: i64,
    #[serde(alias = "treatment_plan")]
    treatment_plan: String,
}

/// Return the interior of the first fenced code block, if the text has one.
///
/// Whatever info string follows the opening fence (`json`, `jsonc`, `js`,
/// ...) is skipped up to the end of its line. A fence that is never closed
/// does not count as a block.
pub fn extract_fenced(raw: &str) -> Option<&str> {
    let start = raw.find(FENCE)? + FENCE.len();
    let mut body = &raw[start..];
    let end = body.find(FENCE)?;
    if let Some(newline) = body[..end].find('\n') {
        body = &body[newline + 1..];
    }
    let end = body.find(FENCE)?;
    Some(body[..end].trim())
}

/// Parse a completion into a [`Diagnosis`].
///
/// Requires `diagnosis` (non-blank string), `confidence` (integer in
/// `0..=100`; fractional numbers are rejected) and `treatmentPlan` (string;
/// `treatment_plan` is accepted too). Anything else is
/// [`VetgateError::Parse`].
pub fn normalize(raw: &str) -> Result<Diagnosis> {
    let payload = extract_fenced(raw).unwrap_or(raw).trim();
    if payload.is_empty() {
        return Err(VetgateError::Parse("empty completion".into()));
    }

    let parsed: RawDiagnosis =
        serde_json::from_str(payload).map_err(|e| VetgateError::Parse(e.to_string()))?;

    if parsed.diagnosis.trim().is_empty() {
        return Err(VetgateError::Parse("blank diagnosis".into()));
    }
    let confidence = u8::try_from(parsed.confidence)
        .ok()
        .filter(|c| *c <= 100)
        .ok_or_else(|| {
            VetgateError::Parse(format!("confidence {} outside 0..=100", parsed.confidence))
        })?;

    Ok(Diagnosis {
        diagnosis: parsed.diagnosis,
        confidence,
        treatment_plan: parsed.treatment_plan,
    })
}
