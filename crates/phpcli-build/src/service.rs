use std::collections::BTreeMap;
use std::fmt;

/// Handle of a service inside its [`Infrastructure`](crate::Infrastructure).
///
/// Relationships between services (sidekicks, volumes-from, links, shared
/// network) are stored as handles, so they group services without owning
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(pub(crate) usize);

impl ServiceId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Never restarted, never rescheduled.
    #[default]
    Never,
    /// Runs to completion once per deployment.
    StartOnce,
    Always,
    UnlessStopped,
}

impl RestartPolicy {
    /// Value of the compose `restart` field. `None` leaves the field out,
    /// which compose reads as `"no"`.
    pub fn compose_value(self) -> Option<&'static str> {
        match self {
            RestartPolicy::Never | RestartPolicy::StartOnce => None,
            RestartPolicy::Always => Some("always"),
            RestartPolicy::UnlessStopped => Some("unless-stopped"),
        }
    }
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartPolicy::Never => f.write_str("never"),
            RestartPolicy::StartOnce => f.write_str("start-once"),
            RestartPolicy::Always => f.write_str("always"),
            RestartPolicy::UnlessStopped => f.write_str("unless-stopped"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NetworkMode {
    #[default]
    Default,
    /// Join the network namespace of another service.
    ShareWith(ServiceId),
}

/// A mount. `external` is a host path for bind mounts or a volume name for
/// named volumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Volume {
    pub external: String,
    pub internal: String,
    pub driver: Option<String>,
    pub driver_options: BTreeMap<String, String>,
}

impl Volume {
    pub fn bind(host: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            external: host.into(),
            internal: container.into(),
            ..Default::default()
        }
    }

    pub fn named(name: impl Into<String>, container: impl Into<String>) -> Self {
        Self::bind(name, container)
    }

    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = Some(driver.into());
        self
    }

    pub fn with_options(mut self, options: BTreeMap<String, String>) -> Self {
        self.driver_options = options;
        self
    }

    /// Host paths start with `/`, `.` or `~`; anything else names a volume.
    pub fn is_bind_mount(&self) -> bool {
        self.external.starts_with(['/', '.', '~'])
    }

    pub fn compose_entry(&self) -> String {
        format!("{}:{}", self.external, self.internal)
    }
}

/// Rancher health check settings. Times are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Healthcheck {
    pub port: u16,
    pub request_line: Option<String>,
    pub interval: u64,
    pub initializing_timeout: u64,
    pub response_timeout: u64,
    pub healthy_threshold: u32,
    pub unhealthy_threshold: u32,
    pub strategy: String,
}

impl Default for Healthcheck {
    fn default() -> Self {
        Self {
            port: 80,
            request_line: None,
            interval: 2000,
            initializing_timeout: 60000,
            response_timeout: 2000,
            healthy_threshold: 2,
            unhealthy_threshold: 3,
            strategy: "recreate".to_owned(),
        }
    }
}

/// One container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Service {
    pub name: String,
    pub image: String,
    pub command: Option<String>,
    pub environment: BTreeMap<String, String>,
    pub labels: BTreeMap<String, String>,
    pub volumes: Vec<Volume>,
    pub restart: RestartPolicy,
    pub tty: bool,
    pub keep_stdin: bool,
    pub work_dir: Option<String>,
    pub network_mode: NetworkMode,
    pub sidekicks: Vec<ServiceId>,
    pub volumes_from: Vec<ServiceId>,
    /// alias → external service (`stack/service`)
    pub external_links: BTreeMap<String, String>,
    /// alias → service in the same infrastructure
    pub links: BTreeMap<String, ServiceId>,
    pub healthcheck: Option<Healthcheck>,
}

impl Service {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            ..Default::default()
        }
    }

    pub fn set_environment_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.environment.insert(name.into(), value.into());
    }

    pub fn add_label(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.labels.insert(name.into(), value.into());
    }

    pub fn add_volume(&mut self, volume: Volume) {
        self.volumes.push(volume);
    }

    pub fn add_sidekick(&mut self, sidekick: ServiceId) {
        if !self.sidekicks.contains(&sidekick) {
            self.sidekicks.push(sidekick);
        }
    }

    pub fn add_volume_from(&mut self, source: ServiceId) {
        if !self.volumes_from.contains(&source) {
            self.volumes_from.push(source);
        }
    }

    pub fn add_external_link(&mut self, target: impl Into<String>, alias: impl Into<String>) {
        self.external_links.insert(alias.into(), target.into());
    }

    pub fn add_link(&mut self, target: ServiceId, alias: impl Into<String>) {
        self.links.insert(alias.into(), target);
    }
}
