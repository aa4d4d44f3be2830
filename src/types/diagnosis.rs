//! Diagnosis result types

use serde::{Deserialize, Serialize};

use super::product::Product;

/// Structured result extracted from a model completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub diagnosis: String,
    /// 0..=100
    pub confidence: u8,
    pub treatment_plan: String,
}

/// Response returned to the caller, cached or fresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResponse {
    pub id: String,
    pub diagnosis: String,
    pub confidence: u8,
    pub treatment_plan: String,
    pub recommended_products: Vec<Product>,
    pub cached: bool,
}
