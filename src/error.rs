use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid soil parameters:\n{}", format_violations(.0))]
    Validation(Vec<String>),

    #[error("reasoning call failed: {0}")]
    Reasoning(#[from] ReasoningError),

    #[error("missing reasoning credential: set {0}")]
    MissingCredential(&'static str),

    #[error(transparent)]
    Context(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search endpoint returned status {0}")]
    Status(u16),

    #[error("unparseable search response: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum ReasoningError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unparseable response: {0}")]
    Decode(String),

    #[error("response contained no text")]
    Empty,
}

fn format_violations(violations: &[String]) -> String {
    violations
        .iter()
        .map(|violation| format!("- {violation}"))
        .collect::<Vec<String>>()
        .join("\n")
}
