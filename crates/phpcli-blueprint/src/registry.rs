use std::collections::BTreeMap;

use crate::blueprint::Blueprint;
use crate::collaborators::Collaborators;
use crate::error::FactoryError;

type Constructor = Box<dyn Fn() -> Box<dyn Blueprint> + Send + Sync>;

/// Blueprints by identifier. Every `get` constructs a fresh instance.
#[derive(Default)]
pub struct BlueprintFactory {
    constructors: BTreeMap<String, Constructor>,
}

impl BlueprintFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor, replacing any previous one under `name`.
    pub fn add<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Box<dyn Blueprint> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(blueprint = %name, "registering blueprint");
        self.constructors.insert(name, Box::new(constructor));
    }

    pub fn get(&self, name: &str) -> Result<Box<dyn Blueprint>, FactoryError> {
        self.constructors
            .get(name)
            .map(|constructor| constructor())
            .ok_or_else(|| FactoryError::Unknown {
                name: name.to_owned(),
                available: self.names().map(str::to_owned).collect(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}

/// A plugin: contributes collaborators, then registers its blueprints.
pub trait Provider {
    /// Install or replace collaborators. Runs for every provider before any `boot`.
    fn register(&self, _collaborators: &mut Collaborators) {}

    fn boot(&self, factory: &mut BlueprintFactory, collaborators: &Collaborators);
}

/// Register every provider, then boot every provider, in order.
pub fn load_providers(
    mut collaborators: Collaborators,
    providers: &[&dyn Provider],
) -> (BlueprintFactory, Collaborators) {
    for provider in providers {
        provider.register(&mut collaborators);
    }

    let mut factory = BlueprintFactory::new();
    for provider in providers {
        provider.boot(&mut factory, &collaborators);
    }
    (factory, collaborators)
}
