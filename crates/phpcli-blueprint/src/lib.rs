//! Blueprint lifecycle, registry and the `php-cli` blueprint.
//!
//! ```text
//! Provider::register ── replace Collaborators
//! Provider::boot     ── BlueprintFactory::add("php-cli", ..)
//!
//! Blueprint::init     ── defaults into rancherize.json
//! Blueprint::validate ── required keys
//! Blueprint::build    ── stages → Infrastructure → MainServiceBuilt listeners
//! ```

pub mod blueprint;
pub mod collaborators;
pub mod error;
pub mod host;
pub mod php_cli;
pub mod registry;

pub use blueprint::{Blueprint, DockerAccount, InitFlags, TakesDockerAccount};
pub use collaborators::{BuildListener, Collaborators, MainServiceBuilt};
pub use error::{BuildError, FactoryError};
pub use host::{HostEnvironment, RealHost};
pub use php_cli::{PHP_CLI, PhpCliBlueprint, PhpCliProvider};
pub use registry::{BlueprintFactory, Provider, load_providers};

/// Factory with every provider shipped in this crate.
pub fn default_factory(collaborators: Collaborators) -> BlueprintFactory {
    let (factory, _) = load_providers(collaborators, &[&PhpCliProvider]);
    factory
}
