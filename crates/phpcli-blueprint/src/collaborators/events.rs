use phpcli_build::{Infrastructure, ServiceId};
use phpcli_core::ConfigRead;

use crate::error::BuildError;

/// Dispatched once per build after every stage ran.
pub struct MainServiceBuilt<'a> {
    pub infrastructure: &'a mut Infrastructure,
    pub server: ServiceId,
    pub config: &'a dyn ConfigRead,
}

/// Lets other plugins extend a finished build.
pub trait BuildListener: Send + Sync {
    fn on_main_service_built(&self, event: &mut MainServiceBuilt<'_>) -> Result<(), BuildError>;
}
