/// A single prompt-in, text-out generation call. The backend executing it is passed separately;
/// the request itself is plain data so callers can build and log it freely.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    pub prompt: String,
    pub params: SamplingParams,
}

impl GenerationRequest {
    pub fn new<S: Into<String>>(prompt: S) -> Self {
        Self {
            prompt: prompt.into(),
            params: SamplingParams::default(),
        }
    }
}

impl std::fmt::Display for GenerationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "GenerationRequest:")?;
        writeln!(f, "  prompt: {:?}", self.prompt)?;
        write!(f, "  params: {}", self.params)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SamplingParams {
    /// Controls the randomness of the model's output. Accepts values between 0.0 and 2.0; lower
    /// values give more focused and deterministic responses.
    ///
    /// Defaults to `1.0`.
    pub temperature: f32,
    /// Upper limit on the number of tokens the model may generate for this request.
    ///
    /// Defaults to `256`.
    pub max_output_tokens: u64,
    /// Number of candidate responses requested from the model.
    ///
    /// Defaults to `1`.
    pub candidate_count: u8,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            max_output_tokens: 256,
            candidate_count: 1,
        }
    }
}

pub trait SamplingParamsTrait {
    fn sampling_params_mut(&mut self) -> &mut SamplingParams;

    /// Sets the value of [SamplingParams::temperature]. Out-of-range values fall back to the
    /// default.
    fn temperature(&mut self, temperature: f32) -> &mut Self {
        match temperature {
            value if (0.0..=2.0).contains(&value) => self.sampling_params_mut().temperature = value,
            _ => self.sampling_params_mut().temperature = 1.0,
        };
        self
    }

    /// Sets the value of [SamplingParams::max_output_tokens].
    fn max_output_tokens(&mut self, max_output_tokens: u64) -> &mut Self {
        self.sampling_params_mut().max_output_tokens = max_output_tokens;
        self
    }

    /// Sets the value of [SamplingParams::candidate_count].
    fn candidate_count(&mut self, candidate_count: u8) -> &mut Self {
        self.sampling_params_mut().candidate_count = candidate_count.max(1);
        self
    }
}

impl std::fmt::Display for SamplingParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "    temperature: {:?}", self.temperature)?;
        writeln!(f, "    max_output_tokens: {:?}", self.max_output_tokens)?;
        writeln!(f, "    candidate_count: {:?}", self.candidate_count)
    }
}
