use phpcli_build::{Service, Volume};
use phpcli_core::ConfigRead;

use crate::error::BuildError;

/// Attaches the `volumes` declared in the configuration to a service.
pub trait VolumeService: Send + Sync {
    fn parse(&self, config: &dyn ConfigRead, service: &mut Service) -> Result<(), BuildError>;
}

/// `volumes` maps a volume name (or host path) to a container path;
/// `volumes-driver` applies to every named volume.
#[derive(Debug, Default)]
pub struct ConfigVolumeService;

impl VolumeService for ConfigVolumeService {
    fn parse(&self, config: &dyn ConfigRead, service: &mut Service) -> Result<(), BuildError> {
        let driver = config.get_opt_str("volumes-driver")?;

        for (external, internal) in config.get_string_map("volumes")? {
            let mut volume = Volume::named(external, internal);
            if let Some(driver) = driver.as_ref().filter(|_| !volume.is_bind_mount()) {
                volume = volume.with_driver(driver.clone());
            }
            service.add_volume(volume);
        }
        Ok(())
    }
}
