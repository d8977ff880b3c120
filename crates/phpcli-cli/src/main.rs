mod commands;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use phpcli_blueprint::PHP_CLI;

#[derive(Parser)]
#[command(
    name = "phpcli",
    about = "Turn rancherize.json into a Dockerfile and Rancher services"
)]
#[command(version)]
struct Cli {
    /// Project directory containing rancherize.json
    #[arg(long, global = true, default_value = ".")]
    project_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write missing configuration defaults for a blueprint
    Init {
        /// Blueprint name (see `phpcli list`)
        blueprint: String,
        /// Environment the defaults are written for
        #[arg(long, default_value = "production")]
        env: String,
        /// Defaults for local development (bind-mount the working directory)
        #[arg(long)]
        dev: bool,
    },
    /// Check that required configuration is present
    Validate {
        #[arg(long, default_value = "production")]
        env: String,
        #[arg(long, default_value = PHP_CLI)]
        blueprint: String,
    },
    /// Build the infrastructure and write it to .rancherize/
    Build {
        #[arg(long, default_value = "production")]
        env: String,
        #[arg(long, default_value = PHP_CLI)]
        blueprint: String,
        /// Version the app image is tagged with (default: latest)
        #[arg(long)]
        version: Option<String>,
        /// Docker registry the app image is pushed to
        #[arg(long)]
        docker_server: Option<String>,
        /// Print the rendered files instead of writing them
        #[arg(long)]
        stdout: bool,
    },
    /// List registered blueprints
    List,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    load_dotenv(&cli.project_dir)?;

    match cli.command {
        Commands::Init {
            blueprint,
            env,
            dev,
        } => commands::init(&cli.project_dir, &blueprint, &env, dev)?,
        Commands::Validate { env, blueprint } => {
            commands::validate(&cli.project_dir, &blueprint, &env)?
        }
        Commands::Build {
            env,
            blueprint,
            version,
            docker_server,
            stdout,
        } => commands::build(
            &cli.project_dir,
            &commands::BuildArgs {
                environment: &env,
                blueprint: &blueprint,
                version: version.as_deref(),
                docker_server: docker_server.as_deref(),
                stdout,
            },
        )?,
        Commands::List => commands::list(),
    }

    Ok(())
}

/// `USER_ID`, `GROUP_ID` and `HOSTNAME` may come from a `.env` next to rancherize.json.
fn load_dotenv(project_dir: &Path) -> anyhow::Result<()> {
    let path = project_dir.join(".env");
    match dotenvy::from_path(&path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "loaded .env");
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(anyhow::Error::new(e).context(format!("failed to load {}", path.display()))),
    }
}
