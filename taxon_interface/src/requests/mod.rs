pub mod generation;

pub use generation::{
    error::GenerationError,
    request::{GenerationRequest, SamplingParams, SamplingParamsTrait},
    response::GenerationResponse,
};
