//! Prompt construction and label normalization around the generation backend.

use crate::categories::CategorySet;
use std::sync::Arc;
use taxon_interface::llms::GenerationBackend;
use taxon_interface::requests::{GenerationRequest, SamplingParams, SamplingParamsTrait};

/// Cell prefix for records whose classification call failed.
pub const ERROR_MARKER_PREFIX: &str = "classification error: ";

/// The result of classifying one record against one taxonomy. A failed call is a value, not an
/// error: the runner stores it and moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Label(String),
    CallFailed { description: String, throttled: bool },
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::CallFailed { .. })
    }

    /// The string written into the record's label column: the label itself, or the error marker.
    pub fn as_cell(&self) -> String {
        match self {
            Outcome::Label(label) => label.clone(),
            Outcome::CallFailed { description, .. } => {
                format!("{ERROR_MARKER_PREFIX}{description}")
            }
        }
    }
}

pub struct Classifier {
    pub backend: Arc<GenerationBackend>,
    pub params: SamplingParams,
    /// Extra attempts after a failed call. `0` keeps a failure terminal for its record.
    pub retry_after_fail_n_times: u8,
}

impl Classifier {
    pub fn new(backend: Arc<GenerationBackend>) -> Self {
        Self {
            backend,
            params: SamplingParams {
                temperature: 0.1,
                max_output_tokens: 40,
                candidate_count: 1,
            },
            retry_after_fail_n_times: 0,
        }
    }

    /// Classify `text` into exactly one category of `set`. Returns the model's label after
    /// normalization, or a failed-call outcome carrying the failure description.
    pub async fn classify(&self, text: &str, set: &CategorySet) -> Outcome {
        let request = GenerationRequest {
            prompt: self.prompt(text, set),
            params: self.params.clone(),
        };

        let mut attempt: u8 = 0;
        loop {
            match self.backend.generation_request(&request).await {
                Ok(res) => return Outcome::Label(normalize_label(&res.content)),
                Err(e) => {
                    if attempt < self.retry_after_fail_n_times {
                        attempt += 1;
                        crate::warn!(
                            "Classification call failed (attempt {attempt} of {}): {e}",
                            self.retry_after_fail_n_times
                        );
                        continue;
                    }
                    crate::warn!("Classification call failed: {e}");
                    return Outcome::CallFailed {
                        description: e.to_string(),
                        throttled: e.is_throttle(),
                    };
                }
            }
        }
    }

    fn prompt(&self, text: &str, set: &CategorySet) -> String {
        let kind = set.taxonomy.as_str();
        indoc::formatdoc! {"
            ##Task: Classify the input {kind} description into one of the {kind} categories below. You MUST select the most appropriate category from the list. Never refuse and never answer that no category matches. Output only the category name WITHOUT square brackets [].

            ##Categories:
            {categories}

            ##Instructions:
            1. Read the input description carefully
            2. Compare it with ALL categories
            3. Select the MOST appropriate category (even if not a perfect match)
            4. Output ONLY the category name without brackets []

            ##Input: {text}

            ##Answer (category name only, no brackets):",
            categories = set.render(),
        }
    }
}

impl SamplingParamsTrait for Classifier {
    fn sampling_params_mut(&mut self) -> &mut SamplingParams {
        &mut self.params
    }
}

/// Trim the raw model output and strip exactly one matching pair of square brackets when the
/// whole output is wrapped in them.
pub(crate) fn normalize_label(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('[') && trimmed.ends_with(']') {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}
