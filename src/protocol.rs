//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::GeneratedProblem;
use crate::validate::{LengthCheck, Suitability};

/// Body of `POST /api/v1/generate`.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(rename = "lengthKey")]
    pub length_key: Option<String>,
    pub levels: Option<Vec<String>>,
    #[serde(rename = "preferredCategory")]
    pub preferred_category: Option<String>,
    /// "custom" switches to the user-authored prompt path.
    #[serde(rename = "type")]
    pub request_type: Option<String>,
    pub prompt: Option<String>,
}

impl GenerateRequest {
    pub fn is_custom(&self) -> bool {
        self.request_type.as_deref() == Some("custom")
    }
}

/// Everything the client learns about how a problem was generated.
/// Warnings (length, suitability, count mismatch) ride along here and are
/// never fatal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMeta {
    pub problem_id: String,
    pub length_key: String,
    pub level: String,
    pub topic: String,
    pub genre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trap: Option<String>,
    pub requested_question_count: u32,
    pub question_count_mismatch: bool,
    pub length_check: LengthCheck,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suitability: Option<Suitability>,
}

/// Uniform reply shape. Both genuine success and graceful fallback are
/// HTTP 200; fallback is `success:false` with a populated `problem`.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<GeneratedProblem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<GenerationMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self {
            success: false,
            problem: None,
            metadata: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

//
// Catalog summary for the client's pickers
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthClassSummary {
    pub key: String,
    pub label: String,
    pub character_range: String,
    pub question_counts: Vec<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogOut {
    pub length_classes: Vec<LengthClassSummary>,
    pub categories: Vec<String>,
    pub levels: Vec<String>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_accepts_wire_field_names() {
        let req: GenerateRequest = serde_json::from_str(
            r#"{"lengthKey":"short","levels":["N1"],"preferredCategory":"society"}"#,
        )
        .unwrap();
        assert_eq!(req.length_key.as_deref(), Some("short"));
        assert_eq!(req.levels.as_deref(), Some(&["N1".to_string()][..]));
        assert!(!req.is_custom());
    }

    #[test]
    fn custom_request_is_detected() {
        let req: GenerateRequest =
            serde_json::from_str(r#"{"type":"custom","prompt":"書いて"}"#).unwrap();
        assert!(req.is_custom());
    }

    #[test]
    fn empty_body_fields_default_to_none() {
        let req: GenerateRequest = serde_json::from_str("{}").unwrap();
        assert!(req.length_key.is_none());
        assert!(req.levels.is_none());
    }
}
