use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] phpcli_core::Error),

    #[error("stage `{stage}` needs the server service, which has not been built yet")]
    MissingServer { stage: &'static str },

    #[error("failed to resolve the working directory for the workdir mount")]
    WorkingDirectory { source: std::io::Error },

    #[error("working directory {path} is not valid UTF-8")]
    NonUtf8Path { path: PathBuf },

    /// Raised by a collaborator implementation outside this crate.
    #[error("{collaborator} failed: {message}")]
    Collaborator {
        collaborator: &'static str,
        message: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("unknown blueprint '{name}'; registered: {}", format_names(available))]
    Unknown {
        name: String,
        available: Vec<String>,
    },
}

fn format_names(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_owned()
    } else {
        names.join(", ")
    }
}
