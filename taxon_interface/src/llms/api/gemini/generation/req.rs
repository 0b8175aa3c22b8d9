use crate::requests::generation::{error::GenerationError, request::GenerationRequest};
use serde::{Deserialize, Serialize};

/// Body for the `models/{model}:generateContent` method of the Generative Language API.
#[derive(Clone, Serialize, Default, Debug, Deserialize)]
pub struct GeminiGenerationRequest {
    /// The conversation so far. A single-turn request is one `user` content entry.
    pub contents: Vec<GeminiContent>,

    /// Sampling configuration for the request.
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

impl GeminiGenerationRequest {
    pub fn new(req: &GenerationRequest) -> crate::Result<Self, GenerationError> {
        if req.prompt.trim().is_empty() {
            return Err(GenerationError::RequestBuilderError(
                "Prompt is empty".to_string(),
            ));
        }
        Ok(GeminiGenerationRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: req.prompt.clone(),
                }],
            }],
            generation_config: Some(GeminiGenerationConfig {
                temperature: temperature(req.params.temperature)?,
                max_output_tokens: req.params.max_output_tokens,
                candidate_count: req.params.candidate_count,
            }),
        })
    }
}

/// Convert and bounds-check the temperature. The Generative Language API accepts 0.0 to 2.0.
fn temperature(value: f32) -> crate::Result<f32, GenerationError> {
    if (0.0..=2.0).contains(&value) {
        Ok(value)
    } else {
        Err(GenerationError::RequestBuilderError(
            "Temperature must be between 0.0 and 2.0".to_string(),
        ))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeminiContent {
    pub role: String,
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeminiPart {
    pub text: String,
}

#[derive(Clone, Serialize, Default, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u64,
    pub candidate_count: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::generation::request::SamplingParams;

    fn request_with(temperature: f32) -> GenerationRequest {
        GenerationRequest {
            prompt: "classify this".to_string(),
            params: SamplingParams {
                temperature,
                max_output_tokens: 40,
                candidate_count: 1,
            },
        }
    }

    #[test]
    fn builds_single_user_turn() {
        let wire = GeminiGenerationRequest::new(&request_with(0.1)).unwrap();
        assert_eq!(wire.contents.len(), 1);
        assert_eq!(wire.contents[0].role, "user");
        assert_eq!(wire.contents[0].parts[0].text, "classify this");
        let config = wire.generation_config.unwrap();
        assert_eq!(config.max_output_tokens, 40);
        assert_eq!(config.candidate_count, 1);
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        assert!(GeminiGenerationRequest::new(&request_with(3.0)).is_err());
    }

    #[test]
    fn serializes_camel_case_generation_config() {
        let wire = GeminiGenerationRequest::new(&request_with(0.1)).unwrap();
        let json = serde_json::to_string(&wire).unwrap();
        assert!(json.contains("generationConfig"));
        assert!(json.contains("maxOutputTokens"));
        assert!(json.contains("candidateCount"));
    }
}
