pub mod client;
pub mod config;
pub mod error;
pub mod gemini;

pub use config::{ApiConfig, GenerationApiConfigTrait};
pub use error::{ApiError, ClientError};
