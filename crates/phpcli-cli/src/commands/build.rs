use std::path::Path;

use phpcli_blueprint::DockerAccount;
use phpcli_build::{RenderedFiles, write_infrastructure};
use phpcli_core::Configuration;

pub struct BuildArgs<'a> {
    pub environment: &'a str,
    pub blueprint: &'a str,
    pub version: Option<&'a str>,
    pub docker_server: Option<&'a str>,
    /// Print the rendered files instead of writing `.rancherize/`.
    pub stdout: bool,
}

pub fn build(project_dir: &Path, args: &BuildArgs<'_>) -> anyhow::Result<()> {
    // 1. Load config and blueprint
    let config = Configuration::load(project_dir)?;
    let mut blueprint = super::factory().get(args.blueprint)?;

    if let Some(server) = args.docker_server {
        match blueprint.docker_account_sink() {
            Some(sink) => sink.set_docker_account(DockerAccount::with_server(server)),
            None => tracing::warn!(
                blueprint = args.blueprint,
                "blueprint takes no docker account, ignoring --docker-server"
            ),
        }
    }

    // 2. Validate before building
    blueprint.validate(&config, args.environment)?;

    // 3. Build
    let infrastructure = blueprint.build(&config, args.environment, args.version)?;

    // 4. Output
    if args.stdout {
        let files = RenderedFiles::render(&infrastructure)?;
        for (name, content) in files.entries() {
            println!("# ── {name} ──");
            print!("{content}");
        }
        return Ok(());
    }

    let output_dir = write_infrastructure(project_dir, &infrastructure)?;
    println!(
        "Built `{}` for {}: {} services written to {}",
        args.blueprint,
        args.environment,
        infrastructure.len(),
        output_dir.display()
    );
    for service in infrastructure.services() {
        println!("  {:<24} {}", service.name, service.image);
    }

    Ok(())
}
