//! The php-cli build pipeline, one independent stage per concern.
//!
//! ```text
//! 1. dockerfile    ── app/data image
//! 2. server        ── the service running the command
//! 3. healthcheck   ── busybox httpd sidekick (healthcheck.enable)
//! 4. app-container ── built-image sidekick or workdir bind mount
//! 5. cron          ── schedule → cron annotations (no schedule: no-op)
//! 6. database      ── DatabaseBuilder
//! 7. volumes       ── VolumeService on the app container
//!                     (the server stage applies it to the server itself)
//! ```

use phpcli_build::{
    Dockerfile, Infrastructure, NetworkMode, RestartPolicy, Service, ServiceId, Volume,
};
use phpcli_core::{ConfigRead, TierView, TieredConfig};

use crate::blueprint::DockerAccount;
use crate::collaborators::Collaborators;
use crate::error::BuildError;
use crate::php_cli::TARGET_DIRECTORY;
use crate::php_cli::image::{app_image_name, apply_registry};

/// Installs composer in the image and installs production dependencies.
pub const COMPOSER_INSTALL: &str = "curl -sS https://getcomposer.org/installer | php \
     && COMPOSER_ALLOW_SUPERUSER=1 php composer.phar install --no-dev \
     && rm composer.phar";

/// State shared by the stages of one build.
pub struct BuildContext<'a> {
    /// Environment tier, then project defaults.
    pub config: &'a TieredConfig<'a>,
    pub project: TierView<'a>,
    pub environment: TierView<'a>,
    pub version: Option<&'a str>,
    pub docker_account: Option<&'a DockerAccount>,
    pub collaborators: &'a Collaborators,
    pub infrastructure: Infrastructure,
    pub server: Option<ServiceId>,
    pub app: Option<ServiceId>,
}

impl BuildContext<'_> {
    pub fn server(&self, stage: &'static str) -> Result<ServiceId, BuildError> {
        self.server.ok_or(BuildError::MissingServer { stage })
    }
}

pub trait BuildStage: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, ctx: &mut BuildContext<'_>) -> Result<(), BuildError>;
}

pub fn default_stages() -> Vec<Box<dyn BuildStage>> {
    vec![
        Box::new(DockerfileStage),
        Box::new(ServerStage),
        Box::new(HealthcheckStage),
        Box::new(AppContainerStage),
        Box::new(CronStage),
        Box::new(DatabaseStage),
        Box::new(VolumeStage),
    ]
}

// ── Dockerfile ──

/// Builds the app/data image. This is not the image the server runs.
pub struct DockerfileStage;

impl BuildStage for DockerfileStage {
    fn name(&self) -> &'static str {
        "dockerfile"
    }

    fn apply(&self, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        let config = ctx.config;
        let mut dockerfile = Dockerfile::new();

        dockerfile
            .set_from(config.get_str("docker.base-image", "php:7.0-alpine")?)
            .add_volume(TARGET_DIRECTORY)
            .set_workdir(TARGET_DIRECTORY);

        let copy_suffix = config.get_str("work-sub-directory", "")?;
        let target_suffix = config.get_str("target-sub-directory", "")?;
        dockerfile.copy(
            format!(".{copy_suffix}"),
            format!("{TARGET_DIRECTORY}{target_suffix}"),
        );

        if config.get_bool("add-composer", false)? {
            dockerfile.run(COMPOSER_INSTALL);
        }

        for (source, target) in config.get_string_map("add-files")? {
            dockerfile.copy(source, target);
        }
        for (_, path) in config.get_string_map("add-volumes")? {
            dockerfile.add_volume(path);
        }

        dockerfile.run(format!(
            "rm -Rf {TARGET_DIRECTORY}/.rancherize && rm -Rf {TARGET_DIRECTORY}/rancherize.json"
        ));

        ctx.infrastructure.set_dockerfile(dockerfile);
        Ok(())
    }
}

// ── Server ──

pub struct ServerStage;

impl ServerStage {
    fn command(config: &dyn ConfigRead) -> Result<String, BuildError> {
        if config.get_bool("no-php", false)? {
            Ok(config.get_str("command", "/bin/sh")?)
        } else {
            Ok(format!("php {}", config.get_str("command", "-i")?))
        }
    }

    fn restart(config: &dyn ConfigRead) -> Result<RestartPolicy, BuildError> {
        let policy = match config.get_opt_str("restart")?.as_deref() {
            Some("always") => RestartPolicy::Always,
            Some("unless-stopped") => RestartPolicy::UnlessStopped,
            Some(other) => {
                tracing::warn!(restart = other, "unknown restart policy, running once");
                RestartPolicy::StartOnce
            }
            None => RestartPolicy::StartOnce,
        };
        Ok(policy)
    }

    fn image(ctx: &BuildContext<'_>, service: &mut Service) -> Result<(), BuildError> {
        let config = ctx.config;
        let image = format!("php:{}-alpine", config.get_str("php", "7.0")?);

        if !config.get_bool("debug", false)? {
            service.image = image;
            return Ok(());
        }

        let xdebug = config.get_str("xdebug-version", "2.5.5")?;
        service.image = ctx
            .collaborators
            .debug_image_builder
            .debug_image(&image, &xdebug);

        let host = &ctx.collaborators.host;
        let listener = match config.get_opt_str("debug-listener")? {
            Some(listener) => listener,
            None => host
                .var("HOSTNAME")
                .or_else(|| host.hostname())
                .unwrap_or_else(|| "localhost".to_owned()),
        };
        service.set_environment_variable("XDEBUG_CONFIG", format!("remote_host={listener}"));
        Ok(())
    }

    fn sync_user(ctx: &BuildContext<'_>, service: &mut Service) {
        let host = &ctx.collaborators.host;
        let user_id = host
            .var("USER_ID")
            .unwrap_or_else(|| host.user_id().to_string());
        let group_id = host
            .var("GROUP_ID")
            .unwrap_or_else(|| host.group_id().to_string());
        service.set_environment_variable("USER_ID", user_id);
        service.set_environment_variable("GROUP_ID", group_id);
    }

    fn persistent_volumes(config: &dyn ConfigRead, service: &mut Service) -> Result<(), BuildError> {
        let volumes = config.get_string_map("persistent-volumes")?;
        if volumes.is_empty() {
            return Ok(());
        }

        let driver = config.get_str("docker.persistent-driver", "pxd")?;
        let options = config.get_string_map("docker.persistent-options")?;
        for (name, path) in volumes {
            service.add_volume(
                Volume::named(name, path)
                    .with_driver(driver.clone())
                    .with_options(options.clone()),
            );
        }
        Ok(())
    }
}

impl BuildStage for ServerStage {
    fn name(&self) -> &'static str {
        "server"
    }

    fn apply(&self, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        let config = ctx.config;
        let mut service = Service::new(config.get_str("service-name", "")?, "");
        service.command = Some(Self::command(config)?);
        Self::image(ctx, &mut service)?;

        service.tty = config.get_bool("tty", false)?;
        service.keep_stdin = config.get_bool("stdin", false)?;

        if config.get_bool("sync-user-into-container", false)? {
            Self::sync_user(ctx, &mut service);
        }

        service.restart = Self::restart(config)?;
        service.work_dir = Some(TARGET_DIRECTORY.to_owned());
        Self::persistent_volumes(config, &mut service)?;

        // Project defaults first, then the environment: the environment wins per key.
        for tier in [&ctx.project, &ctx.environment] {
            for (name, value) in tier.get_string_map("environment")? {
                service.set_environment_variable(name, value);
            }
            for (name, value) in tier.get_string_map("labels")? {
                service.add_label(name, value);
            }
        }

        for (alias, target) in config.get_string_map("external_links")? {
            service.add_external_link(target, alias);
        }

        ctx.collaborators.scheduler_parser.parse(&mut service, config)?;
        ctx.collaborators
            .healthcheck
            .parse_to_service(&mut service, config)?;
        ctx.collaborators.volume_service.parse(config, &mut service)?;

        tracing::debug!(service = %service.name, image = %service.image, "server service built");
        ctx.server = Some(ctx.infrastructure.add_service(service));
        Ok(())
    }
}

// ── Healthcheck sidekick ──

/// Minimal HTTP endpoint in the server's network namespace for the Rancher
/// probe. Rendered ahead of the server it serves.
pub struct HealthcheckStage;

impl BuildStage for HealthcheckStage {
    fn name(&self) -> &'static str {
        "healthcheck"
    }

    fn apply(&self, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        if !ctx.config.get_bool("healthcheck.enable", false)? {
            return Ok(());
        }
        let server = ctx.server(self.name())?;

        let mut httpd = Service::new(
            format!("{}-httpd", ctx.infrastructure[server].name),
            "busybox",
        );
        httpd.command = Some("httpd -f".to_owned());
        httpd.restart = RestartPolicy::UnlessStopped;
        httpd.network_mode = NetworkMode::ShareWith(server);

        let httpd = ctx.infrastructure.add_service_before(server, httpd);
        ctx.infrastructure[server].add_sidekick(httpd);
        Ok(())
    }
}

// ── App container ──

/// Exactly one of: built app image as sidekick (`use-app-container`, default),
/// or busybox bind-mounting the working directory (`mount-workdir`).
pub struct AppContainerStage;

impl AppContainerStage {
    fn app_service(ctx: &BuildContext<'_>) -> Result<Option<(Service, bool)>, BuildError> {
        let config = ctx.config;
        let name = format!("{}App", config.get_str("service-name", "")?);

        if config.get_bool("use-app-container", true)? {
            let image = app_image_name(
                &config.get_str("docker.repository", "")?,
                &config.get_str("docker.version-prefix", "")?,
                ctx.version,
            );
            let mut app = Service::new(name, apply_registry(image, ctx.docker_account));
            app.restart = RestartPolicy::Never;
            return Ok(Some((app, true)));
        }

        if config.get_bool("mount-workdir", false)? {
            let mount_suffix = config.get_str("work-sub-directory", "")?;
            let target_suffix = config.get_str("target-sub-directory", "")?;

            let cwd = ctx
                .collaborators
                .host
                .current_dir()
                .map_err(|e| BuildError::WorkingDirectory { source: e })?;
            let cwd = cwd
                .to_str()
                .ok_or_else(|| BuildError::NonUtf8Path { path: cwd.clone() })?;

            let mut app = Service::new(name, "busybox");
            app.restart = RestartPolicy::Never;
            app.add_volume(Volume::bind(
                format!("{cwd}{mount_suffix}"),
                format!("{TARGET_DIRECTORY}{target_suffix}"),
            ));
            return Ok(Some((app, false)));
        }

        Ok(None)
    }
}

impl BuildStage for AppContainerStage {
    fn name(&self) -> &'static str {
        "app-container"
    }

    fn apply(&self, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        let server = ctx.server(self.name())?;
        let Some((app, sidekick)) = Self::app_service(ctx)? else {
            tracing::debug!("no app container configured");
            return Ok(());
        };

        tracing::debug!(service = %app.name, image = %app.image, sidekick, "app container built");
        let app = ctx.infrastructure.add_service(app);
        let server = &mut ctx.infrastructure[server];
        if sidekick {
            server.add_sidekick(app);
        }
        server.add_volume_from(app);
        ctx.app = Some(app);
        Ok(())
    }
}

// ── Delegated stages ──

pub struct CronStage;

impl BuildStage for CronStage {
    fn name(&self) -> &'static str {
        "cron"
    }

    fn apply(&self, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        let Some(schedule) = ctx.collaborators.schedule_parser.parse_schedule(ctx.config)? else {
            tracing::debug!("no cron schedule configured");
            return Ok(());
        };
        let server = ctx.server(self.name())?;
        ctx.collaborators
            .cron_service
            .make_cron(&mut ctx.infrastructure[server], &schedule)
    }
}

pub struct DatabaseStage;

impl BuildStage for DatabaseStage {
    fn name(&self) -> &'static str {
        "database"
    }

    fn apply(&self, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        let server = ctx.server(self.name())?;
        ctx.collaborators.database_builder.add_database_service(
            ctx.config,
            server,
            ctx.app,
            &mut ctx.infrastructure,
        )
    }
}

pub struct VolumeStage;

impl BuildStage for VolumeStage {
    fn name(&self) -> &'static str {
        "volumes"
    }

    fn apply(&self, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        let Some(app) = ctx.app else {
            return Ok(());
        };
        ctx.collaborators
            .volume_service
            .parse(ctx.config, &mut ctx.infrastructure[app])
    }
}
