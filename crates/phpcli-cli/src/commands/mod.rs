mod build;
mod init;
mod list;
mod validate;

use phpcli_blueprint::{BlueprintFactory, Collaborators};

pub use build::{BuildArgs, build};
pub use init::init;
pub use list::list;
pub use validate::validate;

/// Every blueprint this binary ships, with the default collaborators.
pub(crate) fn factory() -> BlueprintFactory {
    phpcli_blueprint::default_factory(Collaborators::default())
}
