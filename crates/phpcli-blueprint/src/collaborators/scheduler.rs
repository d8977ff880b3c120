use phpcli_build::Service;
use phpcli_core::{ConfigRead, Initializer, Target};

use crate::error::BuildError;

pub const HOST_AFFINITY_LABEL: &str = "io.rancher.scheduler.affinity:host_label";

/// Rancher scheduling rules for the server service.
pub trait SchedulerParser: Send + Sync {
    /// Write scheduler defaults during `init`.
    fn init(&self, initializer: &mut Initializer<'_>);

    fn parse(&self, service: &mut Service, config: &dyn ConfigRead) -> Result<(), BuildError>;
}

/// Host-label affinity from `scheduler.tags`, active when `scheduler.enable`.
#[derive(Debug, Default)]
pub struct RancherSchedulerParser;

impl SchedulerParser for RancherSchedulerParser {
    fn init(&self, initializer: &mut Initializer<'_>) {
        initializer.init("scheduler.enable", false, Target::Project);
    }

    fn parse(&self, service: &mut Service, config: &dyn ConfigRead) -> Result<(), BuildError> {
        if !config.get_bool("scheduler.enable", false)? {
            return Ok(());
        }

        let tags = config.get_string_map("scheduler.tags")?;
        if tags.is_empty() {
            return Ok(());
        }

        let affinity = tags
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(",");
        tracing::debug!(service = %service.name, %affinity, "adding host affinity");
        service.add_label(HOST_AFFINITY_LABEL, affinity);
        Ok(())
    }
}
