//! `backhaul validate` — check a configuration file without serving.
//!
//! Parses and validates the file, then reports either human-readable
//! text or JSON (for CI pipelines). Exits non-zero when the config is
//! rejected.

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::sources::parse_config_str;
use crate::config::validation;
use crate::error::{BackhaulError, ValidationError};

pub fn execute(args: &ValidateArgs) -> Result<(), BackhaulError> {
    let path = &args.config;
    if !path.exists() {
        return Err(BackhaulError::ConfigFileNotFound { path: path.clone() });
    }

    let content = std::fs::read_to_string(path)?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let display = path.display().to_string();
    let config = parse_config_str(ext, &content, &display)?;

    match validation::validate(&config) {
        Ok(()) => {
            match args.format {
                ValidateFormat::Text => {
                    println!(
                        "\u{2713} {}",
                        validation::format_validation_report(&display, &config)
                    );
                }
                ValidateFormat::Json => {
                    println!(
                        "{}",
                        serde_json::json!({
                            "valid": true,
                            "services": config.services.len(),
                            "upstreams": config.total_upstreams(),
                        })
                    );
                }
            }
            Ok(())
        }
        Err(errors) => {
            match args.format {
                ValidateFormat::Text => {
                    eprintln!("\u{2717} {display}: {} problem(s)\n", errors.len());
                    for error in &errors {
                        eprintln!("{error}");
                    }
                }
                ValidateFormat::Json => println!("{}", errors_as_json(&errors)),
            }
            Err(BackhaulError::ConfigValidation { errors })
        }
    }
}

fn errors_as_json(errors: &[ValidationError]) -> serde_json::Value {
    serde_json::json!({
        "valid": false,
        "errors": errors
            .iter()
            .map(|e| serde_json::json!({
                "service": e.service,
                "field": e.field,
                "message": e.message,
                "suggestion": e.suggestion,
            }))
            .collect::<Vec<_>>(),
    })
}
