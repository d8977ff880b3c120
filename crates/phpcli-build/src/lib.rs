//! Infrastructure object model and rendering for the php-cli blueprint.
//!
//! # Build output
//!
//! ```text
//! Blueprint::build()
//!   └─ Infrastructure
//!        ├─ Dockerfile      ── app/data image: base, WORKDIR, COPY, RUN, VOLUME
//!        └─ Vec<Service>    ── server, healthcheck sidekick, app container, database
//!
//! write_infrastructure()
//!   .rancherize/Dockerfile
//!   .rancherize/docker-compose.yml
//!   .rancherize/rancher-compose.yml
//! ```
//!
//! Services refer to each other through [`ServiceId`] handles. A sidekick or
//! volumes-from relationship groups containers for scheduling; it does not
//! transfer ownership.

pub mod compose;
pub mod dockerfile;
pub mod infrastructure;
pub mod service;
pub mod write;

pub use compose::RenderError;
pub use dockerfile::{Dockerfile, Instruction};
pub use infrastructure::Infrastructure;
pub use service::{Healthcheck, NetworkMode, RestartPolicy, Service, ServiceId, Volume};
pub use write::{OUTPUT_DIR, RenderedFiles, WriteError, write_infrastructure};
