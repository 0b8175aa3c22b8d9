pub mod builder;
pub mod generation;

use super::{
    client::ApiClient,
    config::{ApiConfig, ApiConfigTrait},
};
use crate::logging::LoggingConfig;
use crate::requests::generation::{
    error::GenerationError, request::GenerationRequest, response::GenerationResponse,
};
use generation::GeminiGenerationRequest;
use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, Secret};

/// Default Generative Language API host
pub const GEMINI_API_HOST: &str = "generativelanguage.googleapis.com";
/// Header carrying the API key
pub const GEMINI_API_KEY_HEADER: &str = "x-goog-api-key";
/// Model used when the builder does not override it
pub const GEMINI_DEFAULT_MODEL_ID: &str = "gemini-2.0-flash-lite";

pub struct GeminiBackend {
    pub(crate) client: ApiClient<GeminiConfig>,
    pub model_id: String,
}

impl GeminiBackend {
    pub fn new(mut config: GeminiConfig, model_id: String) -> crate::Result<Self> {
        config.logging_config.load_logger()?;
        config.api_config.api_key = Some(config.api_config.load_api_key()?);
        Ok(Self {
            client: ApiClient::new(config),
            model_id,
        })
    }

    pub(crate) async fn generation_request(
        &self,
        request: &GenerationRequest,
    ) -> crate::Result<GenerationResponse, GenerationError> {
        let path = format!("/v1beta/models/{}:generateContent", self.model_id);
        match self
            .client
            .post(&path, GeminiGenerationRequest::new(request)?)
            .await
        {
            Err(e) => Err(GenerationError::ClientError(e)),
            Ok(res) => GenerationResponse::new_from_gemini(res),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_config: ApiConfig,
    pub logging_config: LoggingConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_config: ApiConfig {
                host: GEMINI_API_HOST.to_string(),
                api_key: None,
                api_key_env_var: "GEMINI_API_KEY".to_string(),
            },
            logging_config: LoggingConfig {
                logger_name: "gemini".to_string(),
                ..Default::default()
            },
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Default::default()
    }
}

impl ApiConfigTrait for GeminiConfig {
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = self.api_key() {
            if let Ok(value) = reqwest::header::HeaderValue::from_str(api_key.expose_secret()) {
                headers.insert(
                    reqwest::header::HeaderName::from_static(GEMINI_API_KEY_HEADER),
                    value,
                );
            }
        }
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("https://{}{}", self.api_config.host, path)
    }

    fn api_key(&self) -> &Option<Secret<String>> {
        &self.api_config.api_key
    }
}
