use phpcli_build::{Infrastructure, RestartPolicy, Service, ServiceId};
use phpcli_core::ConfigRead;

use crate::error::BuildError;

/// Adds a database service next to the server.
pub trait DatabaseBuilder: Send + Sync {
    fn add_database_service(
        &self,
        config: &dyn ConfigRead,
        server: ServiceId,
        app: Option<ServiceId>,
        infrastructure: &mut Infrastructure,
    ) -> Result<(), BuildError>;
}

/// MySQL container linked into the server as `database`, enabled by
/// `database.enable`.
#[derive(Debug, Default)]
pub struct MysqlDatabaseBuilder;

impl DatabaseBuilder for MysqlDatabaseBuilder {
    fn add_database_service(
        &self,
        config: &dyn ConfigRead,
        server: ServiceId,
        _app: Option<ServiceId>,
        infrastructure: &mut Infrastructure,
    ) -> Result<(), BuildError> {
        if !config.get_bool("database.enable", false)? {
            return Ok(());
        }

        let version = config.get_str("database.version", "5.7")?;
        let name = config.get_str("database.name", "db")?;
        let user = config.get_str("database.user", "user")?;
        let password = config.get_str("database.password", "pw")?;
        let root_password = config.get_str("database.root-password", "root")?;

        let mut database = Service::new(
            format!("{}-Database", infrastructure[server].name),
            format!("mysql:{version}"),
        );
        database.restart = RestartPolicy::UnlessStopped;
        database.set_environment_variable("MYSQL_ROOT_PASSWORD", root_password);
        database.set_environment_variable("MYSQL_DATABASE", name.clone());
        database.set_environment_variable("MYSQL_USER", user.clone());
        database.set_environment_variable("MYSQL_PASSWORD", password.clone());
        let database = infrastructure.add_service(database);

        let server = &mut infrastructure[server];
        server.add_link(database, "database");
        server.set_environment_variable("DATABASE_HOST", "database");
        server.set_environment_variable("DATABASE_NAME", name);
        server.set_environment_variable("DATABASE_USER", user);
        server.set_environment_variable("DATABASE_PASSWORD", password);
        Ok(())
    }
}
