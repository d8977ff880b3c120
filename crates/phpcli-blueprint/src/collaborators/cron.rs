use phpcli_build::{RestartPolicy, Service};
use phpcli_core::ConfigRead;

use crate::error::BuildError;

pub const CRON_SCHEDULE_LABEL: &str = "com.socialengine.rancher-cron.schedule";

/// A cron expression the server service is run on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub expression: String,
}

pub trait ScheduleParser: Send + Sync {
    /// `Ok(None)` when no schedule is configured; that is not an error.
    fn parse_schedule(&self, config: &dyn ConfigRead) -> Result<Option<Schedule>, BuildError>;
}

pub trait CronService: Send + Sync {
    fn make_cron(&self, service: &mut Service, schedule: &Schedule) -> Result<(), BuildError>;
}

/// Reads `cron.schedule`: five or six whitespace-separated fields.
#[derive(Debug, Default)]
pub struct ConfigScheduleParser;

impl ScheduleParser for ConfigScheduleParser {
    fn parse_schedule(&self, config: &dyn ConfigRead) -> Result<Option<Schedule>, BuildError> {
        let Some(expression) = config.get_opt_str("cron.schedule")? else {
            return Ok(None);
        };
        let expression = expression.split_whitespace().collect::<Vec<_>>().join(" ");
        if expression.is_empty() {
            return Ok(None);
        }

        let fields = expression.split(' ').count();
        if !(5..=6).contains(&fields) {
            return Err(phpcli_core::Error::InvalidValue {
                key: "cron.schedule".to_owned(),
                expected: "a cron expression with 5 or 6 fields",
                found: format!("{fields} field(s) in {expression:?}"),
            }
            .into());
        }
        Ok(Some(Schedule { expression }))
    }
}

/// Marks the service for rancher-cron and makes it run once per trigger.
#[derive(Debug, Default)]
pub struct RancherCronService;

impl CronService for RancherCronService {
    fn make_cron(&self, service: &mut Service, schedule: &Schedule) -> Result<(), BuildError> {
        tracing::debug!(service = %service.name, schedule = %schedule.expression, "scheduling cron");
        service.add_label(CRON_SCHEDULE_LABEL, schedule.expression.clone());
        service.restart = RestartPolicy::StartOnce;
        Ok(())
    }
}
