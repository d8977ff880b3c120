use std::path::Path;

use phpcli_core::Configuration;

pub fn validate(
    project_dir: &Path,
    blueprint_name: &str,
    environment: &str,
) -> anyhow::Result<()> {
    let config = Configuration::load(project_dir)?;
    let blueprint = super::factory().get(blueprint_name)?;

    if let Err(failure) = blueprint.validate(&config, environment) {
        for field in &failure.failures {
            eprintln!("  {}: {}", field.key, field.rule);
        }
        return Err(failure.into());
    }

    println!("OK: `{environment}` is valid for {blueprint_name}");
    Ok(())
}
