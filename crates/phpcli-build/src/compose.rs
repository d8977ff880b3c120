//! docker-compose / rancher-compose rendering.
//!
//! Relationships are rendered the way Rancher reads them:
//! - sidekicks ── `io.rancher.sidekicks` label on the primary service
//! - start-once ── `io.rancher.container.start_once` label, no `restart` key
//! - shared network ── `network_mode: container:<name>`
//! - named volumes ── top-level `volumes:`, with `driver` and `driver_opts`
//!   when driver-backed
//!
//! `restart` is only written for `always` and `unless-stopped`: a bare `no`
//! is the boolean `false` to YAML 1.1 readers such as docker-compose.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::infrastructure::Infrastructure;
use crate::service::{NetworkMode, RestartPolicy, Service};

pub const SIDEKICKS_LABEL: &str = "io.rancher.sidekicks";
pub const START_ONCE_LABEL: &str = "io.rancher.container.start_once";

#[derive(Debug, thiserror::Error)]
#[error("failed to render {file}")]
pub struct RenderError {
    pub file: &'static str,
    pub source: serde_yaml::Error,
}

#[derive(Debug, Serialize)]
struct DockerCompose {
    version: &'static str,
    services: IndexMap<String, ComposeService>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    volumes: BTreeMap<String, ComposeVolume>,
}

#[derive(Debug, Serialize)]
struct ComposeService {
    image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    working_dir: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    environment: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    volumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    volumes_from: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    network_mode: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    links: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    external_links: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    restart: Option<&'static str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    tty: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stdin_open: bool,
}

#[derive(Debug, Serialize)]
struct ComposeVolume {
    #[serde(skip_serializing_if = "Option::is_none")]
    driver: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    driver_opts: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct RancherCompose {
    version: &'static str,
    services: IndexMap<String, RancherService>,
}

#[derive(Debug, Serialize)]
struct RancherService {
    #[serde(skip_serializing_if = "Option::is_none")]
    scale: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    health_check: Option<RancherHealthcheck>,
}

#[derive(Debug, Serialize)]
struct RancherHealthcheck {
    port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_line: Option<String>,
    interval: u64,
    initializing_timeout: u64,
    response_timeout: u64,
    healthy_threshold: u32,
    unhealthy_threshold: u32,
    strategy: String,
}

pub fn docker_compose(infrastructure: &Infrastructure) -> Result<String, RenderError> {
    let name = |id| infrastructure.name_of(id).unwrap_or_default().to_owned();

    let mut named_volumes = BTreeMap::new();
    let services = infrastructure
        .services()
        .map(|service| {
            for volume in service.volumes.iter().filter(|v| !v.is_bind_mount()) {
                let declared = named_volumes
                    .entry(volume.external.clone())
                    .or_insert_with(|| ComposeVolume {
                        driver: None,
                        driver_opts: BTreeMap::new(),
                    });
                if volume.driver.is_some() {
                    declared.driver = volume.driver.clone();
                    declared.driver_opts = volume.driver_options.clone();
                }
            }
            (service.name.clone(), compose_service(service, &name))
        })
        .collect();

    let file = DockerCompose {
        version: "2",
        services,
        volumes: named_volumes,
    };
    serde_yaml::to_string(&file).map_err(|e| RenderError {
        file: "docker-compose.yml",
        source: e,
    })
}

fn compose_service(
    service: &Service,
    name: &impl Fn(crate::ServiceId) -> String,
) -> ComposeService {
    let mut labels = service.labels.clone();
    if !service.sidekicks.is_empty() {
        let sidekicks: Vec<String> = service.sidekicks.iter().map(|id| name(*id)).collect();
        labels.insert(SIDEKICKS_LABEL.to_owned(), sidekicks.join(","));
    }
    if service.restart == RestartPolicy::StartOnce {
        labels.insert(START_ONCE_LABEL.to_owned(), "true".to_owned());
    }

    ComposeService {
        image: service.image.clone(),
        command: service.command.clone(),
        working_dir: service.work_dir.clone(),
        environment: service.environment.clone(),
        labels,
        volumes: service.volumes.iter().map(|v| v.compose_entry()).collect(),
        volumes_from: service.volumes_from.iter().map(|id| name(*id)).collect(),
        network_mode: match service.network_mode {
            NetworkMode::Default => None,
            NetworkMode::ShareWith(id) => Some(format!("container:{}", name(id))),
        },
        links: service
            .links
            .iter()
            .map(|(alias, id)| format!("{}:{alias}", name(*id)))
            .collect(),
        external_links: service
            .external_links
            .iter()
            .map(|(alias, target)| format!("{target}:{alias}"))
            .collect(),
        restart: service.restart.compose_value(),
        tty: service.tty,
        stdin_open: service.keep_stdin,
    }
}

/// Primary services get `scale: 1`; sidekicks follow their primary and only
/// appear when they carry a health check.
pub fn rancher_compose(infrastructure: &Infrastructure) -> Result<String, RenderError> {
    let services = infrastructure
        .ids()
        .filter_map(|id| {
            let service = &infrastructure[id];
            let scale = (!infrastructure.is_sidekick(id)).then_some(1);
            let health_check = service.healthcheck.as_ref().map(|h| RancherHealthcheck {
                port: h.port,
                request_line: h.request_line.clone(),
                interval: h.interval,
                initializing_timeout: h.initializing_timeout,
                response_timeout: h.response_timeout,
                healthy_threshold: h.healthy_threshold,
                unhealthy_threshold: h.unhealthy_threshold,
                strategy: h.strategy.clone(),
            });
            if scale.is_none() && health_check.is_none() {
                return None;
            }
            Some((
                service.name.clone(),
                RancherService {
                    scale,
                    health_check,
                },
            ))
        })
        .collect();

    let file = RancherCompose {
        version: "2",
        services,
    };
    serde_yaml::to_string(&file).map_err(|e| RenderError {
        file: "rancher-compose.yml",
        source: e,
    })
}
