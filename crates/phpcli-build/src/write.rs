use std::path::{Path, PathBuf};

use crate::compose::{self, RenderError};
use crate::infrastructure::Infrastructure;

/// Directory, relative to the project, that receives the rendered files.
pub const OUTPUT_DIR: &str = ".rancherize";

/// Rendered text of every file produced for an infrastructure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFiles {
    pub dockerfile: String,
    pub docker_compose: String,
    pub rancher_compose: String,
}

impl RenderedFiles {
    pub fn render(infrastructure: &Infrastructure) -> Result<Self, RenderError> {
        Ok(Self {
            dockerfile: infrastructure.dockerfile().render(),
            docker_compose: compose::docker_compose(infrastructure)?,
            rancher_compose: compose::rancher_compose(infrastructure)?,
        })
    }

    /// File name and content, in write order.
    pub fn entries(&self) -> [(&'static str, &str); 3] {
        [
            ("Dockerfile", self.dockerfile.as_str()),
            ("docker-compose.yml", self.docker_compose.as_str()),
            ("rancher-compose.yml", self.rancher_compose.as_str()),
        ]
    }
}

/// Writes Dockerfile, docker-compose.yml and rancher-compose.yml into
/// `<project_dir>/.rancherize/`, replacing files from a previous build.
pub fn write_infrastructure(
    project_dir: &Path,
    infrastructure: &Infrastructure,
) -> Result<PathBuf, WriteError> {
    let files = RenderedFiles::render(infrastructure)?;

    let output_dir = project_dir.join(OUTPUT_DIR);
    std::fs::create_dir_all(&output_dir).map_err(|e| WriteError::CreateDir {
        path: output_dir.clone(),
        source: e,
    })?;

    for (file, content) in files.entries() {
        let path = output_dir.join(file);
        std::fs::write(&path, content).map_err(|e| WriteError::Write {
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "wrote build output");
    }

    Ok(output_dir)
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to create output directory at {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
