use crate::llms::api::error::ClientError;
use crate::llms::GenerationBackend;
use crate::requests::generation::{
    error::GenerationError, request::GenerationRequest, response::GenerationResponse,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A backend that replays a pre-arranged sequence of replies instead of calling out over the
/// network. Used by engine tests and by dry runs. Replies are consumed in insertion order; once
/// the script is exhausted the default reply (if any) is repeated.
pub struct ScriptedBackend {
    pub model_id: String,
    script: Mutex<VecDeque<ScriptedReply>>,
    default_reply: Option<String>,
    call_count: AtomicUsize,
}

#[derive(Clone, Debug)]
pub enum ScriptedReply {
    Text(String),
    FailWith(String),
    FailThrottled(String),
}

impl ScriptedBackend {
    /// Number of generation calls issued against this backend so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub(crate) fn generation_request(
        &self,
        request: &GenerationRequest,
    ) -> crate::Result<GenerationResponse, GenerationError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        crate::trace!("Scripted request for prompt: {}", request.prompt);
        let reply = self
            .script
            .lock()
            .map_err(|_| GenerationError::RequestBuilderError("script lock poisoned".to_string()))?
            .pop_front();
        match reply {
            Some(ScriptedReply::Text(text)) => Ok(GenerationResponse {
                content: text,
                finish_reason: Some("STOP".to_string()),
            }),
            Some(ScriptedReply::FailWith(message)) => Err(GenerationError::ClientError(
                ClientError::GenericError { message },
            )),
            Some(ScriptedReply::FailThrottled(message)) => Err(GenerationError::ClientError(
                ClientError::ApiError(crate::llms::api::error::ApiError {
                    message,
                    code: Some(429),
                    status: Some("RESOURCE_EXHAUSTED".to_string()),
                }),
            )),
            None => match &self.default_reply {
                Some(text) => Ok(GenerationResponse {
                    content: text.clone(),
                    finish_reason: Some("STOP".to_string()),
                }),
                None => Err(GenerationError::ResponseContentEmpty),
            },
        }
    }
}

#[derive(Default)]
pub struct ScriptedBackendBuilder {
    replies: Vec<ScriptedReply>,
    default_reply: Option<String>,
}

impl ScriptedBackendBuilder {
    /// Queue a successful reply.
    pub fn reply<S: Into<String>>(mut self, text: S) -> Self {
        self.replies.push(ScriptedReply::Text(text.into()));
        self
    }

    /// Queue a failed call.
    pub fn fail<S: Into<String>>(mut self, message: S) -> Self {
        self.replies.push(ScriptedReply::FailWith(message.into()));
        self
    }

    /// Queue a failed call that reports as throttling.
    pub fn fail_throttled<S: Into<String>>(mut self, message: S) -> Self {
        self.replies
            .push(ScriptedReply::FailThrottled(message.into()));
        self
    }

    /// Reply repeated once the queued script is exhausted.
    pub fn default_reply<S: Into<String>>(mut self, text: S) -> Self {
        self.default_reply = Some(text.into());
        self
    }

    pub fn init(self) -> std::sync::Arc<GenerationBackend> {
        std::sync::Arc::new(GenerationBackend::Scripted(ScriptedBackend {
            model_id: "scripted".to_string(),
            script: Mutex::new(self.replies.into()),
            default_reply: self.default_reply,
            call_count: AtomicUsize::new(0),
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::requests::generation::request::{GenerationRequest, SamplingParams};
    use crate::GenerationInterface;

    #[tokio::test]
    async fn replies_in_order_then_default() {
        let backend = GenerationInterface::scripted()
            .reply("first")
            .fail("boom")
            .default_reply("fallback")
            .init();
        let req = GenerationRequest {
            prompt: "p".to_string(),
            params: SamplingParams::default(),
        };

        let first = backend.generation_request(&req).await.unwrap();
        assert_eq!(first.content, "first");

        let second = backend.generation_request(&req).await;
        assert!(second.is_err());

        let third = backend.generation_request(&req).await.unwrap();
        assert_eq!(third.content, "fallback");

        assert_eq!(backend.scripted().unwrap().call_count(), 3);
    }

    #[tokio::test]
    async fn throttled_failures_report_as_throttle() {
        let backend = GenerationInterface::scripted()
            .fail_throttled("quota exceeded")
            .init();
        let req = GenerationRequest {
            prompt: "p".to_string(),
            params: SamplingParams::default(),
        };
        let err = backend.generation_request(&req).await.unwrap_err();
        assert!(err.is_throttle());
    }
}
