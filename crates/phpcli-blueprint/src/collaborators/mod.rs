//! Services the blueprint delegates to.
//!
//! Each concern is a trait with a default implementation; a
//! [`Provider`](crate::Provider) may replace any of them before blueprints
//! are constructed.

mod cron;
mod database;
mod debug_image;
mod events;
mod healthcheck;
mod scheduler;
mod volumes;

use std::sync::Arc;

pub use cron::{
    CRON_SCHEDULE_LABEL, ConfigScheduleParser, CronService, RancherCronService, Schedule,
    ScheduleParser,
};
pub use database::{DatabaseBuilder, MysqlDatabaseBuilder};
pub use debug_image::{DebugImageBuilder, XdebugImageBuilder};
pub use events::{BuildListener, MainServiceBuilt};
pub use healthcheck::{HealthcheckConfigurationToService, RancherHealthcheck};
pub use scheduler::{HOST_AFFINITY_LABEL, RancherSchedulerParser, SchedulerParser};
pub use volumes::{ConfigVolumeService, VolumeService};

use crate::host::{HostEnvironment, RealHost};

/// Everything a blueprint is constructed from.
#[derive(Clone)]
pub struct Collaborators {
    pub scheduler_parser: Arc<dyn SchedulerParser>,
    pub schedule_parser: Arc<dyn ScheduleParser>,
    pub cron_service: Arc<dyn CronService>,
    pub database_builder: Arc<dyn DatabaseBuilder>,
    pub volume_service: Arc<dyn VolumeService>,
    pub healthcheck: Arc<dyn HealthcheckConfigurationToService>,
    pub debug_image_builder: Arc<dyn DebugImageBuilder>,
    pub host: Arc<dyn HostEnvironment>,
    pub listeners: Vec<Arc<dyn BuildListener>>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            scheduler_parser: Arc::new(RancherSchedulerParser),
            schedule_parser: Arc::new(ConfigScheduleParser),
            cron_service: Arc::new(RancherCronService),
            database_builder: Arc::new(MysqlDatabaseBuilder),
            volume_service: Arc::new(ConfigVolumeService),
            healthcheck: Arc::new(RancherHealthcheck),
            debug_image_builder: Arc::new(XdebugImageBuilder),
            host: Arc::new(RealHost),
            listeners: Vec::new(),
        }
    }
}

impl Collaborators {
    pub fn with_host(mut self, host: impl HostEnvironment + 'static) -> Self {
        self.host = Arc::new(host);
        self
    }

    pub fn add_listener(&mut self, listener: impl BuildListener + 'static) {
        self.listeners.push(Arc::new(listener));
    }

    /// Notify every listener, in registration order. The first failure aborts.
    pub fn dispatch(&self, event: &mut MainServiceBuilt<'_>) -> Result<(), crate::BuildError> {
        for listener in &self.listeners {
            listener.on_main_service_built(event)?;
        }
        Ok(())
    }
}
