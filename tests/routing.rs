//! Integration tests for host resolution and table construction.

use std::time::Duration;

use backhaul::config::model::{Config, Defaults, Service};
use backhaul::proxy::routing::RoutingTable;

fn service(host: &str, upstreams: &[&str]) -> Service {
    Service {
        host: host.into(),
        upstreams: upstreams.iter().map(|s| (*s).to_string()).collect(),
        max_fail: None,
        pause: None,
        timeout: None,
    }
}

#[test]
fn builds_one_route_per_service_in_order() {
    let config = Config {
        defaults: Defaults::default(),
        services: vec![
            service("git.example.com", &["https://github.com"]),
            service("test.example.com", &["http://localhost:8081"]),
        ],
    };

    let table = RoutingTable::from_config(&config).unwrap();
    assert_eq!(table.routes().len(), 2);
    assert_eq!(table.routes()[0].pattern(), "git.example.com");
    assert_eq!(table.routes()[1].pattern(), "test.example.com");
}

#[test]
fn request_host_resolves_to_its_own_service() {
    let config = Config {
        defaults: Defaults::default(),
        services: vec![
            service("git.example.com", &["https://github.com"]),
            service("test.example.com", &["http://localhost:8081"]),
        ],
    };
    let table = RoutingTable::from_config(&config).unwrap();

    let matched = table.resolve("test.example.com").unwrap();
    assert_eq!(matched.pattern(), "test.example.com");
    assert_eq!(
        matched.pool().select().unwrap().authority(),
        "localhost:8081"
    );
}

#[test]
fn per_service_overrides_beat_defaults() {
    let mut config = Config {
        defaults: Defaults {
            timeout: 30_000,
            max_fail: 3,
            pause: 120,
        },
        services: vec![
            service("app.example.com", &["http://a:80"]),
            service("api.example.com", &["http://b:80"]),
        ],
    };
    config.services[1].timeout = Some(5_000);

    let table = RoutingTable::from_config(&config).unwrap();
    assert_eq!(table.routes()[0].timeout(), Duration::from_millis(30_000));
    assert_eq!(table.routes()[1].timeout(), Duration::from_millis(5_000));
}

#[test]
fn invalid_upstream_url_fails_table_construction() {
    let config = Config {
        defaults: Defaults::default(),
        services: vec![service("app.example.com", &["http://"])],
    };
    assert!(RoutingTable::from_config(&config).is_err());
}

#[test]
fn resolution_is_exact_never_substring() {
    let config = Config {
        defaults: Defaults::default(),
        services: vec![service("git.example.com", &["https://github.com"])],
    };
    let table = RoutingTable::from_config(&config).unwrap();

    assert!(table.resolve("example.com").is_none());
    assert!(table.resolve("agit.example.com").is_none());
    assert!(table.resolve("git.example.com").is_some());
    assert!(table.resolve("git.example.com:8443").is_some());
}

#[test]
fn defaults_are_sensible() {
    let defaults = Defaults::default();
    assert_eq!(defaults.timeout, 30_000);
    assert_eq!(defaults.max_fail, 3);
    assert_eq!(defaults.pause, 120);
}
