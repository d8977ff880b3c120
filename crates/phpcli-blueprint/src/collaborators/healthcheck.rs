use phpcli_build::{Healthcheck, Service};
use phpcli_core::ConfigRead;

use crate::error::BuildError;

pub trait HealthcheckConfigurationToService: Send + Sync {
    fn parse_to_service(
        &self,
        service: &mut Service,
        config: &dyn ConfigRead,
    ) -> Result<(), BuildError>;
}

/// Rancher health check from the `healthcheck.*` keys, active when
/// `healthcheck.enable`.
#[derive(Debug, Default)]
pub struct RancherHealthcheck;

impl HealthcheckConfigurationToService for RancherHealthcheck {
    fn parse_to_service(
        &self,
        service: &mut Service,
        config: &dyn ConfigRead,
    ) -> Result<(), BuildError> {
        if !config.get_bool("healthcheck.enable", false)? {
            return Ok(());
        }

        let defaults = Healthcheck::default();
        let port = config.get_u64("healthcheck.port", u64::from(defaults.port))?;
        let port = u16::try_from(port).map_err(|e| phpcli_core::Error::InvalidValue {
            key: "healthcheck.port".to_owned(),
            expected: "a port number",
            found: format!("{port} ({e})"),
        })?;

        service.healthcheck = Some(Healthcheck {
            port,
            request_line: config
                .get_opt_str("healthcheck.url")?
                .map(|url| format!("GET {url} HTTP/1.0")),
            interval: config.get_u64("healthcheck.interval", defaults.interval)?,
            initializing_timeout: config
                .get_u64("healthcheck.init-time", defaults.initializing_timeout)?,
            ..defaults
        });
        Ok(())
    }
}
