#[allow(unused_imports)]
pub(crate) use anyhow::{anyhow, bail, Result};
#[allow(unused_imports)]
pub(crate) use tracing::{debug, error, info, span, trace, warn, Level};

pub mod llms;
pub mod logging;
pub mod requests;

pub struct GenerationInterface {}

impl GenerationInterface {
    /// Creates a new instance of the [`GeminiBackendBuilder`]. The builder allows you to specify
    /// the model and other parameters. It is converted to a [`llms::GenerationBackend`] instance
    /// using the `init` method.
    pub fn gemini() -> llms::api::gemini::builder::GeminiBackendBuilder {
        llms::api::gemini::builder::GeminiBackendBuilder::default()
    }

    /// Creates a new instance of the [`ScriptedBackendBuilder`] for tests and dry runs. Replies
    /// are consumed in the order they were added.
    pub fn scripted() -> llms::scripted::ScriptedBackendBuilder {
        llms::scripted::ScriptedBackendBuilder::default()
    }
}
