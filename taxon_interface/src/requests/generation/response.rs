/// The generated text plus whatever the backend reported about why generation stopped.
#[derive(Debug)]
pub struct GenerationResponse {
    pub content: String,
    pub finish_reason: Option<String>,
}

impl std::fmt::Display for GenerationResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "GenerationResponse:")?;
        writeln!(f, "    content: {:?}", self.content)?;
        writeln!(f, "    finish_reason: {:?}", self.finish_reason)
    }
}
