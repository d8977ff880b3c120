use std::path::Path;

use phpcli_blueprint::InitFlags;
use phpcli_core::Configuration;

/// Fill rancherize.json with the defaults of `blueprint` for `environment`.
pub fn init(
    project_dir: &Path,
    blueprint: &str,
    environment: &str,
    dev: bool,
) -> anyhow::Result<()> {
    let blueprint = super::factory().get(blueprint)?;
    let mut config = Configuration::load(project_dir)?;

    let report = blueprint.init(&mut config, environment, &InitFlags { dev });

    if report.is_noop() {
        println!("Nothing to initialize, every default is already set.");
    } else {
        let path = config.save(project_dir)?;
        println!("Updated {}", path.display());
    }
    print!("{report}");

    Ok(())
}
