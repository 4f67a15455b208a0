use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tariff_core::config::{read_env, AppConfig, LoadOptions, LogFormat};
use tariff_core::{DegressiveTier, TaxComponent};
use toml::Value;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct Sourced<T> {
    value: T,
    source: String,
}

/// Effective configuration, one entry per key with where its value came from.
#[derive(Debug, Serialize)]
struct ConfigReport {
    #[serde(rename = "pricing.currency")]
    currency: Sourced<String>,
    #[serde(rename = "pricing.taxes")]
    taxes: Sourced<Vec<TaxComponent>>,
    #[serde(rename = "pricing.degressive_tiers")]
    degressive_tiers: Sourced<Vec<DegressiveTier>>,
    #[serde(rename = "logging.level")]
    log_level: Sourced<String>,
    #[serde(rename = "logging.format")]
    log_format: Sourced<LogFormat>,
}

pub fn run(config_path: Option<&Path>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            )
        }
    };

    let config_file_path = detect_config_path(config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let report = ConfigReport {
        currency: Sourced {
            source: source("pricing.currency", &["TARIFF_PRICING_CURRENCY"]),
            value: config.pricing.currency,
        },
        taxes: Sourced {
            source: source("pricing.taxes", &["TARIFF_PRICING_VAT_RATE"]),
            value: config.pricing.taxes,
        },
        degressive_tiers: Sourced {
            source: source("pricing.degressive_tiers", &[]),
            value: config.pricing.degressive_tiers,
        },
        log_level: Sourced {
            source: source("logging.level", &["TARIFF_LOGGING_LEVEL", "TARIFF_LOG_LEVEL"]),
            value: config.logging.level,
        },
        log_format: Sourced {
            source: source("logging.format", &["TARIFF_LOGGING_FORMAT", "TARIFF_LOG_FORMAT"]),
            value: config.logging.format,
        },
    };

    CommandResult::success_with_data(
        "config",
        "effective config (source precedence: env > file > default)",
        &report,
    )
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    let root = PathBuf::from("tariff.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/tariff.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    // Blank values are ignored by the loader, so they do not count as a source.
    if let Some(env_key) = env_keys.iter().find(|key| read_env(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
