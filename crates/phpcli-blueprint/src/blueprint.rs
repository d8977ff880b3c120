use phpcli_build::Infrastructure;
use phpcli_core::{Configuration, InitReport, ValidationFailure};

use crate::error::BuildError;

/// Flags given to `init`, e.g. `init php-cli --dev`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitFlags {
    /// Provide defaults for a local development environment.
    pub dev: bool,
}

/// Credentials of the Docker registry images are pushed to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DockerAccount {
    /// Registry URL, e.g. `https://registry.example.com`. Absent for Docker Hub.
    pub server: Option<String>,
    pub user: Option<String>,
}

impl DockerAccount {
    pub fn with_server(server: impl Into<String>) -> Self {
        Self {
            server: Some(server.into()),
            user: None,
        }
    }
}

/// Capability of blueprints that name images after the registry they are pushed to.
pub trait TakesDockerAccount {
    fn set_docker_account(&mut self, account: DockerAccount);
}

/// Lifecycle contract of a blueprint.
///
/// ```text
/// init      ── fill configuration gaps with defaults (never overwrites)
/// validate  ── check required keys, read-only
/// build     ── configuration + environment + version → Infrastructure
/// ```
pub trait Blueprint {
    fn init(
        &self,
        config: &mut Configuration,
        environment: &str,
        flags: &InitFlags,
    ) -> InitReport;

    fn validate(&self, config: &Configuration, environment: &str)
    -> Result<(), ValidationFailure>;

    fn build(
        &self,
        config: &Configuration,
        environment: &str,
        version: Option<&str>,
    ) -> Result<Infrastructure, BuildError>;

    /// `Some` when this blueprint accepts a Docker account.
    fn docker_account_sink(&mut self) -> Option<&mut dyn TakesDockerAccount> {
        None
    }
}
