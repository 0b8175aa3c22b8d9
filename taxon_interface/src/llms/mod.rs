// Public modules
pub mod api;
pub mod scripted;

// Internal imports
use crate::requests::*;

// Public exports
pub use api::{
    gemini::{builder::GeminiBackendBuilder, GeminiBackend, GeminiConfig},
    ApiConfig, ApiError, ClientError, GenerationApiConfigTrait,
};
pub use scripted::{ScriptedBackend, ScriptedBackendBuilder, ScriptedReply};

pub enum GenerationBackend {
    Gemini(api::gemini::GeminiBackend),
    Scripted(scripted::ScriptedBackend),
}

impl GenerationBackend {
    pub async fn generation_request(
        &self,
        request: &GenerationRequest,
    ) -> crate::Result<GenerationResponse, GenerationError> {
        match self {
            GenerationBackend::Gemini(b) => b.generation_request(request).await,
            GenerationBackend::Scripted(b) => b.generation_request(request),
        }
    }

    pub fn model_id(&self) -> &str {
        match self {
            GenerationBackend::Gemini(b) => &b.model_id,
            GenerationBackend::Scripted(b) => &b.model_id,
        }
    }

    pub fn gemini(&self) -> crate::Result<&api::gemini::GeminiBackend> {
        match self {
            GenerationBackend::Gemini(b) => Ok(b),
            _ => crate::bail!("Backend is not gemini"),
        }
    }

    pub fn scripted(&self) -> crate::Result<&scripted::ScriptedBackend> {
        match self {
            GenerationBackend::Scripted(b) => Ok(b),
            _ => crate::bail!("Backend is not scripted"),
        }
    }
}
