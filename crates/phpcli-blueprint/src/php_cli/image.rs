use url::Url;

use crate::blueprint::DockerAccount;

/// `<repository>:<prefix><version>`. Without a version the tag is `latest`
/// and the prefix is not applied.
pub fn app_image_name(repository: &str, version_prefix: &str, version: Option<&str>) -> String {
    match version {
        Some(version) => format!("{repository}:{version_prefix}{version}"),
        None => format!("{repository}:latest"),
    }
}

/// Prefix `image` with the registry host of `account`, if it names one.
///
/// The server may be given with or without a scheme; a port is kept. An
/// absent or empty server leaves the name untouched.
pub fn apply_registry(image: String, account: Option<&DockerAccount>) -> String {
    let Some(server) = account
        .and_then(|a| a.server.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        return image;
    };

    match registry_host(server) {
        Some(host) => format!("{host}/{image}"),
        None => {
            tracing::warn!(server, "docker account server has no host, image name left unchanged");
            image
        }
    }
}

fn registry_host(server: &str) -> Option<String> {
    let parsed = if server.contains("://") {
        Url::parse(server)
    } else {
        Url::parse(&format!("https://{server}"))
    };
    // arch-lint: allow(no-silent-result-drop) reason="an unparsable server is reported by the caller as having no host"
    let url = parsed.ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    })
}
