//! Model listing DTOs

use serde::{Deserialize, Serialize};

/// Name of the deterministic scoring model
pub const RULE_BASED_MODEL: &str = "rule-based-v1";

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub model_type: String,
    pub status: String,
}

impl ModelInfo {
    pub fn rule_based(version: impl Into<String>) -> Self {
        Self {
            name: RULE_BASED_MODEL.to_string(),
            version: version.into(),
            model_type: "deterministic".to_string(),
            status: "active".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}
