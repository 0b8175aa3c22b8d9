mod req;
mod res;

pub use req::{GeminiContent, GeminiGenerationConfig, GeminiGenerationRequest, GeminiPart};
pub use res::{GeminiCandidate, GeminiCandidateContent, GeminiGenerationResponse};
