use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid target reference '{input}': {reason}")]
    InvalidTarget { input: String, reason: &'static str },

    #[error("inline task #{index} has an empty builder id")]
    EmptyBuilder { index: usize },

    #[error("unknown project: {0}")]
    UnknownProject(String),

    #[error("project '{project}' has no target '{target}'")]
    UnknownTarget { project: String, target: String },

    #[error("target '{target}' has no configuration '{configuration}'")]
    UnknownConfiguration { target: String, configuration: String },

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse workspace: {0}")]
    Parse(#[from] serde_json::Error),
}
