//! `backhaul init` — generate a starter configuration file.
//!
//! Creates a YAML, JSON, or TOML config file with either minimal
//! or fully documented templates.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::BackhaulError;

pub fn execute(args: &InitArgs) -> Result<(), BackhaulError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("backhaul.{}", args.format.extension())));

    if output.exists() {
        return Err(BackhaulError::FileExists { path: output });
    }

    let content = match (&args.format, args.full) {
        (ConfigFormat::Yaml, false) => YAML_MINIMAL,
        (ConfigFormat::Yaml, true) => YAML_FULL,
        (ConfigFormat::Json, false) => JSON_MINIMAL,
        (ConfigFormat::Json, true) => JSON_FULL,
        (ConfigFormat::Toml, false) => TOML_MINIMAL,
        (ConfigFormat::Toml, true) => TOML_FULL,
    };

    std::fs::write(&output, content)?;
    println!("Created {}", output.display());
    Ok(())
}

const YAML_MINIMAL: &str = r#"# backhaul config

services:
  - host: "app.example.com"
    upstreams:
      - "http://localhost:8081"
"#;

const YAML_FULL: &str = r#"# backhaul config
#
# All values shown are defaults. Uncomment and modify as needed.

# Global defaults applied to all services unless overridden
defaults:
  # timeout: 30000   # Upstream timeout in ms
  # max_fail: 3      # Consecutive 502s before an upstream is suspended
  # pause: 120       # Suspension cooldown in seconds

services:
  # Simple: one host, one upstream
  - host: "app.example.com"
    upstreams:
      - "http://localhost:8081"

  # Full: round robin over several upstreams with overrides
  # - host: "api.example.com"
  #   max_fail: 1                    # Suspend after a single 502
  #   pause: 30                      # Re-admit after 30 seconds
  #   timeout: 10000                 # Override default timeout
  #   upstreams:
  #     - "http://10.0.0.1:8081"
  #     - "http://10.0.0.2:8081"
  #     - "https://fallback.example.net"
"#;

const JSON_MINIMAL: &str = r#"{
  "services": [
    {
      "host": "app.example.com",
      "upstreams": ["http://localhost:8081"]
    }
  ]
}
"#;

const JSON_FULL: &str = r#"{
  "defaults": {
    "timeout": 30000,
    "max_fail": 3,
    "pause": 120
  },
  "services": [
    {
      "host": "app.example.com",
      "upstreams": ["http://localhost:8081"]
    },
    {
      "host": "api.example.com",
      "max_fail": 1,
      "pause": 30,
      "upstreams": [
        "http://10.0.0.1:8081",
        "http://10.0.0.2:8081"
      ]
    }
  ]
}
"#;

const TOML_MINIMAL: &str = r#"# backhaul config

[[services]]
host = "app.example.com"
upstreams = ["http://localhost:8081"]
"#;

const TOML_FULL: &str = r#"# backhaul config
#
# All values shown are defaults. Uncomment and modify as needed.

[defaults]
# timeout = 30000
# max_fail = 3
# pause = 120

[[services]]
host = "app.example.com"
upstreams = ["http://localhost:8081"]

[[services]]
host = "api.example.com"
max_fail = 1
pause = 30
upstreams = ["http://10.0.0.1:8081", "http://10.0.0.2:8081"]
"#;
