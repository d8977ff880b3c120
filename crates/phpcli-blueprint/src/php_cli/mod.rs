//! The `php-cli` blueprint: runs a PHP (or plain shell) command in a
//! container built from the project sources.

mod image;
mod stages;

use phpcli_build::Infrastructure;
use phpcli_core::{
    Configuration, InitReport, Initializer, Rule, Target, Tier, TierView, TieredConfig,
    ValidationFailure, Validator,
};
use serde_json::json;

pub use image::{app_image_name, apply_registry};
pub use stages::{
    AppContainerStage, BuildContext, BuildStage, COMPOSER_INSTALL, CronStage, DatabaseStage,
    DockerfileStage, HealthcheckStage, ServerStage, VolumeStage, default_stages,
};

use crate::blueprint::{Blueprint, DockerAccount, InitFlags, TakesDockerAccount};
use crate::collaborators::{Collaborators, MainServiceBuilt};
use crate::error::BuildError;
use crate::registry::{BlueprintFactory, Provider};

/// Registry identifier of [`PhpCliBlueprint`].
pub const PHP_CLI: &str = "php-cli";

/// Where the project sources live inside every container.
pub const TARGET_DIRECTORY: &str = "/var/cli/app";

pub struct PhpCliBlueprint {
    collaborators: Collaborators,
    docker_account: Option<DockerAccount>,
    stages: Vec<Box<dyn BuildStage>>,
}

impl PhpCliBlueprint {
    pub fn new(collaborators: Collaborators) -> Self {
        Self::with_stages(collaborators, default_stages())
    }

    pub fn with_stages(collaborators: Collaborators, stages: Vec<Box<dyn BuildStage>>) -> Self {
        Self {
            collaborators,
            docker_account: None,
            stages,
        }
    }
}

impl Blueprint for PhpCliBlueprint {
    fn init(&self, config: &mut Configuration, environment: &str, flags: &InitFlags) -> InitReport {
        let mut init = Initializer::new(config, environment);

        if flags.dev {
            init.init("mount-workdir", true, Target::Environment);
            init.init("use-app-container", false, Target::Environment);
        } else {
            init.init("rancher.stack", "Project", Target::Environment);
            self.collaborators.scheduler_parser.init(&mut init);
        }

        init.init("external_links", json!({}), Target::Environment);
        init.init("docker.repository", "repo/name", Target::Project);
        init.init("docker.version-prefix", "", Target::Project);
        init.init("service-name", "Project", Target::Project);
        init.init("docker.base-image", "php:7.0-alpine", Target::Project);
        init.init("environment", json!({ "EXAMPLE": "value" }), Target::Environment);
        init.init("php", "7.0", Target::Project);
        init.init("add-composer", false, Target::Project);
        init.init("command", "-i", Target::Project);

        init.finish()
    }

    fn validate(
        &self,
        config: &Configuration,
        environment: &str,
    ) -> Result<(), ValidationFailure> {
        Validator::new()
            .rule("service-name", Rule::Required)
            .validate(&TieredConfig::for_environment(config, environment))
    }

    fn build(
        &self,
        config: &Configuration,
        environment: &str,
        version: Option<&str>,
    ) -> Result<Infrastructure, BuildError> {
        let tiered = TieredConfig::for_environment(config, environment);
        let mut ctx = BuildContext {
            config: &tiered,
            project: TierView::new(config, Tier::project()),
            environment: TierView::new(config, Tier::environment(environment)),
            version,
            docker_account: self.docker_account.as_ref(),
            collaborators: &self.collaborators,
            infrastructure: Infrastructure::new(),
            server: None,
            app: None,
        };

        for stage in &self.stages {
            tracing::debug!(stage = stage.name(), environment, "applying build stage");
            stage.apply(&mut ctx)?;
        }

        let server = ctx.server("main-service-built")?;
        let mut infrastructure = ctx.infrastructure;
        self.collaborators.dispatch(&mut MainServiceBuilt {
            infrastructure: &mut infrastructure,
            server,
            config: &tiered,
        })?;

        tracing::debug!(
            environment,
            services = infrastructure.len(),
            "php-cli build finished"
        );
        Ok(infrastructure)
    }

    fn docker_account_sink(&mut self) -> Option<&mut dyn TakesDockerAccount> {
        Some(self)
    }
}

impl TakesDockerAccount for PhpCliBlueprint {
    fn set_docker_account(&mut self, account: DockerAccount) {
        self.docker_account = Some(account);
    }
}

/// Registers `php-cli` with the collaborators every provider agreed on.
#[derive(Debug, Default)]
pub struct PhpCliProvider;

impl Provider for PhpCliProvider {
    fn boot(&self, factory: &mut BlueprintFactory, collaborators: &Collaborators) {
        let collaborators = collaborators.clone();
        factory.add(PHP_CLI, move || {
            Box::new(PhpCliBlueprint::new(collaborators.clone()))
        });
    }
}
