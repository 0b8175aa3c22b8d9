use crate::requests::generation::{error::GenerationError, response::GenerationResponse};
use serde::{Deserialize, Serialize};

/// Response body of the `models/{model}:generateContent` method. Only the fields the engine
/// consumes are modeled; unknown fields are ignored.
#[derive(Clone, Serialize, Default, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationResponse {
    pub candidates: Option<Vec<GeminiCandidate>>,
    pub model_version: Option<String>,
}

#[derive(Clone, Serialize, Default, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    pub content: Option<GeminiCandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Serialize, Default, Debug, Deserialize)]
pub struct GeminiCandidateContent {
    pub parts: Option<Vec<super::GeminiPart>>,
    pub role: Option<String>,
}

impl GenerationResponse {
    pub(crate) fn new_from_gemini(
        res: GeminiGenerationResponse,
    ) -> crate::Result<Self, GenerationError> {
        let candidate = res
            .candidates
            .as_ref()
            .and_then(|candidates| candidates.first())
            .ok_or(GenerationError::ResponseContentEmpty)?;

        let content: String = candidate
            .content
            .as_ref()
            .and_then(|content| content.parts.as_ref())
            .map(|parts| {
                parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<Vec<&str>>()
                    .join("")
            })
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(GenerationError::ResponseContentEmpty);
        }

        Ok(GenerationResponse {
            content,
            finish_reason: candidate.finish_reason.clone(),
        })
    }
}
