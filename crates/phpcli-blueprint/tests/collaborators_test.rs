use phpcli_blueprint::BuildError;
use phpcli_blueprint::collaborators::{
    CRON_SCHEDULE_LABEL, ConfigScheduleParser, ConfigVolumeService, CronService, DatabaseBuilder,
    DebugImageBuilder, HOST_AFFINITY_LABEL, HealthcheckConfigurationToService,
    MysqlDatabaseBuilder, RancherCronService, RancherHealthcheck, RancherSchedulerParser,
    Schedule, ScheduleParser, SchedulerParser, VolumeService, XdebugImageBuilder,
};
use phpcli_build::{Infrastructure, RestartPolicy, Service, Volume};
use phpcli_core::{Configuration, InitOutcome, Initializer, TieredConfig};
use serde_json::{Value, json};

fn defaults(value: Value) -> Configuration {
    Configuration::from_value(json!({ "project": { "default": value } }))
}

// ── Schedule ──

fn parse_schedule(value: Value) -> Result<Option<Schedule>, BuildError> {
    let config = defaults(value);
    ConfigScheduleParser.parse_schedule(&TieredConfig::for_environment(&config, "production"))
}

#[test]
fn no_schedule_is_none() {
    assert_eq!(parse_schedule(json!({})).unwrap(), None);
    assert_eq!(parse_schedule(json!({ "cron": { "schedule": "   " } })).unwrap(), None);
    assert_eq!(parse_schedule(json!({ "cron": { "schedule": null } })).unwrap(), None);
}

#[test]
fn schedule_accepts_five_and_six_fields() {
    let five = parse_schedule(json!({ "cron": { "schedule": "0 3 * * *" } })).unwrap();
    assert_eq!(five.unwrap().expression, "0 3 * * *");

    let six = parse_schedule(json!({ "cron": { "schedule": " 0  0 3 * * 1 " } })).unwrap();
    assert_eq!(six.unwrap().expression, "0 0 3 * * 1");
}

#[test]
fn schedule_with_wrong_field_count_is_invalid() {
    let err = parse_schedule(json!({ "cron": { "schedule": "* * *" } })).unwrap_err();
    assert!(err.to_string().contains("cron.schedule"), "{err}");
}

#[test]
fn cron_service_labels_and_runs_once() {
    let mut service = Service::new("report", "php:7.0-alpine");
    service.restart = RestartPolicy::Always;
    let schedule = Schedule {
        expression: "0 3 * * *".to_owned(),
    };

    RancherCronService.make_cron(&mut service, &schedule).unwrap();

    assert_eq!(service.labels[CRON_SCHEDULE_LABEL], "0 3 * * *");
    assert_eq!(service.restart, RestartPolicy::StartOnce);
}

// ── Scheduler ──

#[test]
fn scheduler_init_writes_project_default() {
    let mut config = Configuration::new();
    let mut init = Initializer::new(&mut config, "production");
    RancherSchedulerParser.init(&mut init);
    let report = init.finish();

    assert_eq!(
        report.entries[0].outcome,
        InitOutcome::Set {
            path: "project.default.scheduler.enable".to_owned(),
            value: json!(false),
        }
    );
}

#[test]
fn disabled_scheduler_ignores_tags() {
    let config = defaults(json!({ "scheduler": { "enable": false, "tags": { "role": "web" } } }));
    let mut service = Service::new("api", "php:7.0-alpine");

    RancherSchedulerParser
        .parse(&mut service, &TieredConfig::for_environment(&config, "production"))
        .unwrap();

    assert!(service.labels.get(HOST_AFFINITY_LABEL).is_none());
}

// ── Healthcheck ──

#[test]
fn healthcheck_defaults() {
    let config = defaults(json!({ "healthcheck": { "enable": true } }));
    let mut service = Service::new("api", "php:7.0-alpine");

    RancherHealthcheck
        .parse_to_service(&mut service, &TieredConfig::for_environment(&config, "production"))
        .unwrap();

    let healthcheck = service.healthcheck.unwrap();
    assert_eq!(healthcheck.port, 80);
    assert_eq!(healthcheck.request_line, None);
    assert_eq!(healthcheck.initializing_timeout, 60000);
    assert_eq!(healthcheck.strategy, "recreate");
}

#[test]
fn healthcheck_port_out_of_range_is_invalid() {
    let config = defaults(json!({ "healthcheck": { "enable": true, "port": 70000 } }));
    let mut service = Service::new("api", "php:7.0-alpine");

    let err = RancherHealthcheck
        .parse_to_service(&mut service, &TieredConfig::for_environment(&config, "production"))
        .unwrap_err();

    assert!(err.to_string().contains("healthcheck.port"), "{err}");
    assert!(service.healthcheck.is_none());
}

#[test]
fn healthcheck_numbers_may_be_strings() {
    let config = defaults(json!({
        "healthcheck": { "enable": "true", "interval": "5000", "init-time": 1000 }
    }));
    let mut service = Service::new("api", "php:7.0-alpine");

    RancherHealthcheck
        .parse_to_service(&mut service, &TieredConfig::for_environment(&config, "production"))
        .unwrap();

    let healthcheck = service.healthcheck.unwrap();
    assert_eq!(healthcheck.interval, 5000);
    assert_eq!(healthcheck.initializing_timeout, 1000);
}

// ── Volumes ──

#[test]
fn volume_driver_applies_to_named_volumes_only() {
    let config = defaults(json!({
        "volumes": { "uploads": "/var/cli/app/uploads", "./cache": "/var/cli/app/cache" },
        "volumes-driver": "convoy"
    }));
    let mut service = Service::new("apiApp", "acme/api:v3");

    ConfigVolumeService
        .parse(&TieredConfig::for_environment(&config, "production"), &mut service)
        .unwrap();

    assert_eq!(
        service.volumes,
        vec![
            Volume::bind("./cache", "/var/cli/app/cache"),
            Volume::named("uploads", "/var/cli/app/uploads").with_driver("convoy"),
        ]
    );
}

// ── Database ──

#[test]
fn database_disabled_adds_nothing() {
    let config = defaults(json!({ "database": { "name": "shop" } }));
    let mut infra = Infrastructure::new();
    let server = infra.add_service(Service::new("api", "php:7.0-alpine"));

    MysqlDatabaseBuilder
        .add_database_service(
            &TieredConfig::for_environment(&config, "production"),
            server,
            None,
            &mut infra,
        )
        .unwrap();

    assert_eq!(infra.len(), 1);
    assert!(infra[server].links.is_empty());
}

#[test]
fn database_defaults() {
    let config = defaults(json!({ "database": { "enable": true } }));
    let mut infra = Infrastructure::new();
    let server = infra.add_service(Service::new("api", "php:7.0-alpine"));

    MysqlDatabaseBuilder
        .add_database_service(
            &TieredConfig::for_environment(&config, "production"),
            server,
            None,
            &mut infra,
        )
        .unwrap();

    let database = &infra[infra.find("api-Database").unwrap()];
    assert_eq!(database.image, "mysql:5.7");
    assert_eq!(database.restart, RestartPolicy::UnlessStopped);
    assert_eq!(database.environment["MYSQL_ROOT_PASSWORD"], "root");
    assert_eq!(database.environment["MYSQL_USER"], "user");
    assert_eq!(infra[server].environment["DATABASE_PASSWORD"], "pw");
}

// ── Debug image ──

#[test]
fn xdebug_image_suffix() {
    assert_eq!(
        XdebugImageBuilder.debug_image("php:7.1-alpine", "2.5.5"),
        "php:7.1-alpine-xdebug2.5.5"
    );
}
