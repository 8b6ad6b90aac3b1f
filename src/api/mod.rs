//! Wire payloads exchanged with the MindEase backend.
//!
//! Field names follow the backend's JSON (`snake_case`), so these types can be
//! sent and decoded without renames.

use serde::{Deserialize, Serialize};

pub mod client;

/// Body of `POST /chat`.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub model_name: &'a str,
}

/// Reply to `POST /chat`. `current_model` is whichever model the backend
/// actually used, which may differ from the one requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub current_model: String,
}

/// Reply to `GET /models`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub available_models: Vec<String>,
    pub current_model: String,
}

/// Body of `POST /models`.
#[derive(Debug, Serialize)]
pub struct ModelUpdateRequest<'a> {
    pub model_name: &'a str,
}

/// Reply to `POST /models`. Some backends echo the catalog as well; only the
/// confirmed model is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelUpdateResponse {
    pub current_model: String,
    #[serde(default)]
    pub available_models: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_uses_backend_field_names() {
        let body = serde_json::to_value(ChatRequest {
            message: "hi",
            model_name: "llama3-8b-8192",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"message": "hi", "model_name": "llama3-8b-8192"})
        );
    }

    #[test]
    fn model_update_response_tolerates_missing_catalog() {
        let parsed: ModelUpdateResponse =
            serde_json::from_str(r#"{"current_model":"mixtral-8x7b"}"#).unwrap();
        assert_eq!(parsed.current_model, "mixtral-8x7b");
        assert!(parsed.available_models.is_empty());
    }
}
