//! Structural checks on a parsed [`Config`].
//!
//! [`validate`] collects every problem it can find -- empty service
//! lists, malformed hosts, duplicate hosts, bad upstream URLs, zeroed
//! thresholds -- into [`ValidationError`] values rather than stopping
//! at the first.

use url::Url;

use super::model::Config;
use crate::error::ValidationError;

/// Validate a single host pattern. Returns `Ok(())` or a human-readable error.
pub fn validate_host(host: &str) -> Result<(), String> {
    if host.is_empty() {
        return Err("host cannot be empty".into());
    }
    if host.contains("://") {
        return Err(format!("'{host}' must be a bare hostname, not a URL"));
    }
    if host.contains('/') || host.contains(char::is_whitespace) {
        return Err(format!("'{host}' is not a valid hostname"));
    }
    Ok(())
}

/// Validate a single upstream URL. Returns `Ok(())` or a human-readable error.
pub fn validate_upstream_url(url: &str) -> Result<(), String> {
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else if parsed.host_str().is_none() {
                Err(format!("'{url}' has no host"))
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{url}' is not a valid URL")),
    }
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.services.is_empty() {
        errors.push(ValidationError {
            service: "(root)".into(),
            field: "services".into(),
            message: "at least one service must be defined".into(),
            suggestion: None,
        });
        return Err(errors);
    }

    if config.defaults.max_fail == 0 {
        errors.push(ValidationError {
            service: "(root)".into(),
            field: "defaults.max_fail".into(),
            message: "max_fail must be at least 1".into(),
            suggestion: None,
        });
    }
    if config.defaults.timeout == 0 {
        errors.push(ValidationError {
            service: "(root)".into(),
            field: "defaults.timeout".into(),
            message: "timeout must be at least 1 ms".into(),
            suggestion: None,
        });
    }

    let mut seen_hosts = std::collections::HashSet::new();

    for (i, service) in config.services.iter().enumerate() {
        let service_id = if service.host.is_empty() {
            format!("services[{i}]")
        } else {
            service.host.clone()
        };

        if let Err(msg) = validate_host(&service.host) {
            errors.push(ValidationError {
                service: service_id.clone(),
                field: "host".into(),
                message: msg,
                suggestion: if service.host.contains("://") {
                    Some(format!(
                        "did you mean '{}'?",
                        service
                            .host
                            .split("://")
                            .nth(1)
                            .unwrap_or(&service.host)
                            .trim_end_matches('/')
                    ))
                } else {
                    None
                },
            });
        }

        if !seen_hosts.insert(service.host.to_ascii_lowercase()) {
            errors.push(ValidationError {
                service: service_id.clone(),
                field: "host".into(),
                message: "duplicate service host; only the first would ever match".into(),
                suggestion: None,
            });
        }

        if service.upstreams.is_empty() {
            errors.push(ValidationError {
                service: service_id.clone(),
                field: "upstreams".into(),
                message: "at least one upstream must be defined".into(),
                suggestion: None,
            });
        }

        for upstream in &service.upstreams {
            if let Err(msg) = validate_upstream_url(upstream) {
                errors.push(ValidationError {
                    service: service_id.clone(),
                    field: "upstreams".into(),
                    message: msg,
                    suggestion: None,
                });
            }
        }

        if service.max_fail == Some(0) {
            errors.push(ValidationError {
                service: service_id.clone(),
                field: "max_fail".into(),
                message: "max_fail must be at least 1".into(),
                suggestion: None,
            });
        }
        if service.timeout == Some(0) {
            errors.push(ValidationError {
                service: service_id,
                field: "timeout".into(),
                message: "timeout must be at least 1 ms".into(),
                suggestion: None,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let mut lines = vec![format!(
        "  {} services, {} upstreams\n",
        config.services.len(),
        config.total_upstreams()
    )];

    for service in &config.services {
        let max_fail = service.max_fail.unwrap_or(config.defaults.max_fail);
        let pause = service.pause.unwrap_or(config.defaults.pause);
        let timeout = service.timeout.map_or_else(
            || format!("{}ms (default)", config.defaults.timeout),
            |t| format!("{t}ms"),
        );

        lines.push(format!(
            "  {}  -> {} upstreams",
            service.host,
            service.upstreams.len(),
        ));
        lines.push(format!("    max_fail: {max_fail}, pause: {pause}s"));
        lines.push(format!("    timeout: {timeout}"));
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{Config, Defaults, Service};

    fn service(host: &str, upstreams: &[&str]) -> Service {
        Service {
            host: host.into(),
            upstreams: upstreams.iter().map(|s| (*s).to_string()).collect(),
            max_fail: None,
            pause: None,
            timeout: None,
        }
    }

    fn minimal_config() -> Config {
        Config {
            defaults: Defaults::default(),
            services: vec![service("app.example.com", &["http://localhost:8081"])],
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate(&minimal_config()).is_ok());
    }

    #[test]
    fn empty_services_fails() {
        let config = Config {
            defaults: Defaults::default(),
            services: vec![],
        };
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("at least one service"));
    }

    #[test]
    fn empty_upstreams_fails() {
        let config = Config {
            defaults: Defaults::default(),
            services: vec![service("app.example.com", &[])],
        };
        let errors = validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.message.contains("at least one upstream")));
    }

    #[test]
    fn url_as_host_fails_with_suggestion() {
        let config = Config {
            defaults: Defaults::default(),
            services: vec![service("http://app.example.com/", &["http://localhost:8081"])],
        };
        let errors = validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.suggestion.as_deref() == Some("did you mean 'app.example.com'?")));
    }

    #[test]
    fn duplicate_hosts_fail() {
        let config = Config {
            defaults: Defaults::default(),
            services: vec![
                service("app.example.com", &["http://a:80"]),
                service("APP.example.com", &["http://b:80"]),
            ],
        };
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("duplicate")));
    }

    #[test]
    fn invalid_upstream_url_fails() {
        let config = Config {
            defaults: Defaults::default(),
            services: vec![service("app.example.com", &["not a url"])],
        };
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("not a valid URL")));
    }

    #[test]
    fn non_http_scheme_fails() {
        let config = Config {
            defaults: Defaults::default(),
            services: vec![service("app.example.com", &["ftp://files:21"])],
        };
        let errors = validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.message.contains("unsupported scheme")));
    }

    #[test]
    fn zero_max_fail_fails() {
        let mut config = minimal_config();
        config.services[0].max_fail = Some(0);
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("at least 1")));
    }
}
