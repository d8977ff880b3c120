use std::ops::{Index, IndexMut};

use crate::dockerfile::Dockerfile;
use crate::service::{Service, ServiceId};

/// The product of one blueprint build: a Dockerfile and the services
/// around it.
///
/// Services live in an arena addressed by [`ServiceId`]; `order` is the
/// sequence they are rendered in, which is insertion order unless a
/// service was placed with [`Infrastructure::add_service_before`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Infrastructure {
    dockerfile: Dockerfile,
    services: Vec<Service>,
    order: Vec<ServiceId>,
}

impl Infrastructure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dockerfile(&self) -> &Dockerfile {
        &self.dockerfile
    }

    pub fn set_dockerfile(&mut self, dockerfile: Dockerfile) {
        self.dockerfile = dockerfile;
    }

    pub fn add_service(&mut self, service: Service) -> ServiceId {
        let id = self.push(service);
        self.order.push(id);
        id
    }

    /// Add `service` so it is rendered directly ahead of `anchor`.
    ///
    /// An `anchor` from another infrastructure places it last.
    pub fn add_service_before(&mut self, anchor: ServiceId, service: Service) -> ServiceId {
        let id = self.push(service);
        match self.order.iter().position(|existing| *existing == anchor) {
            Some(at) => self.order.insert(at, id),
            None => self.order.push(id),
        }
        id
    }

    fn push(&mut self, service: Service) -> ServiceId {
        let id = ServiceId(self.services.len());
        tracing::debug!(service = %service.name, id = id.0, "adding service");
        self.services.push(service);
        id
    }

    /// Services in render order.
    pub fn services(&self) -> impl Iterator<Item = &Service> + '_ {
        self.order.iter().map(|id| &self.services[id.0])
    }

    /// Handles in render order.
    pub fn ids(&self) -> impl Iterator<Item = ServiceId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn get(&self, id: ServiceId) -> Option<&Service> {
        self.services.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<ServiceId> {
        self.services
            .iter()
            .position(|s| s.name == name)
            .map(ServiceId)
    }

    pub fn name_of(&self, id: ServiceId) -> Option<&str> {
        self.get(id).map(|s| s.name.as_str())
    }

    /// True if some other service lists `id` as its sidekick.
    pub fn is_sidekick(&self, id: ServiceId) -> bool {
        self.services.iter().any(|s| s.sidekicks.contains(&id))
    }
}

/// Handles are only minted by this infrastructure's `add_service*`, so
/// indexing with one from the same infrastructure cannot go out of bounds.
impl Index<ServiceId> for Infrastructure {
    type Output = Service;

    fn index(&self, id: ServiceId) -> &Service {
        &self.services[id.0]
    }
}

impl IndexMut<ServiceId> for Infrastructure {
    fn index_mut(&mut self, id: ServiceId) -> &mut Service {
        &mut self.services[id.0]
    }
}
