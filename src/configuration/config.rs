#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

use crate::domain::models::PruningRatio;
use crate::domain::models::QuantizationLevel;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ApiUrl,
    ConfigFile,
    HealthCheckInterval,
    PruningRatio,
    QuantizationLevel,
    ShowDashboard,
    Username,
}

pub struct Config {}

fn possible_values(cmd: &Command, key: ConfigKey) -> Vec<String> {
    let long = key.to_string();
    return cmd
        .get_arguments()
        .find(|e| return e.get_long() == Some(long.as_str()))
        .map(|arg| {
            return arg
                .get_possible_values()
                .iter()
                .map(|e| return e.get_name().to_string())
                .collect::<Vec<String>>();
        })
        .unwrap_or_default();
}

/// Base URL without trailing slashes, so paths can be appended as is.
fn normalize_api_url(url: &str) -> String {
    return url.trim().trim_end_matches('/').to_string();
}

/// Collects every known key set in a config file. Values are validated
/// against the possible values clap declares for the matching flag.
fn read_document(cmd: &Command, doc: &toml_edit::Document) -> Result<Vec<(ConfigKey, String)>> {
    let mut res = vec![];

    for key in ConfigKey::iter() {
        let Some(item) = doc.get(&key.to_string()) else {
            continue;
        };

        let val = if let Some(val_int) = item.as_integer() {
            val_int.to_string()
        } else if let Some(val_float) = item.as_float() {
            val_float.to_string()
        } else if let Some(val_bool) = item.as_bool() {
            val_bool.to_string()
        } else if let Some(val_str) = item.as_str() {
            val_str.to_string()
        } else {
            bail!(format!("config.toml has an unsupported value type for key '{key}'"));
        };

        if val.is_empty() {
            continue;
        }

        let possible = possible_values(cmd, key);
        if !possible.is_empty() && !possible.contains(&val) {
            bail!(format!(
                "config.toml has an invalid value for key '{key}': {val}\nPossible values are: {}",
                possible.join(", ")
            ));
        }

        res.push((key, val));
    }

    return Ok(res);
}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        if key == ConfigKey::Username {
            let mut user = env::var("USER").unwrap_or_else(|_| return "".to_string());
            if user.is_empty() {
                user = "User".to_string();
            }

            return user;
        }

        let config_path = dirs::config_dir()
            .unwrap_or_default()
            .join("docchat/config.toml")
            .to_string_lossy()
            .to_string();
        let quantization_level = QuantizationLevel::default().to_string();
        let pruning_ratio = PruningRatio::default().value().to_string();

        let res = match key {
            ConfigKey::ApiUrl => "http://localhost:8000",
            ConfigKey::HealthCheckInterval => "30000",
            ConfigKey::PruningRatio => &pruning_ratio,
            ConfigKey::QuantizationLevel => &quantization_level,
            ConfigKey::ShowDashboard => "true",

            // Special
            ConfigKey::ConfigFile => &config_path,
            ConfigKey::Username => "",
        };

        return res.to_string();
    }

    /// Health check interval in milliseconds.
    pub fn health_check_interval() -> Result<u64> {
        let val = Config::get(ConfigKey::HealthCheckInterval);
        let res = val.parse::<u64>().unwrap_or(0);
        if res == 0 {
            bail!(format!(
                "{} must be a positive number of milliseconds, got '{val}'",
                ConfigKey::HealthCheckInterval
            ));
        }

        return Ok(res);
    }

    pub fn pruning_ratio() -> Result<PruningRatio> {
        return PruningRatio::parse(&Config::get(ConfigKey::PruningRatio));
    }

    pub fn quantization_level() -> Result<QuantizationLevel> {
        let val = Config::get(ConfigKey::QuantizationLevel);
        if let Some(level) = QuantizationLevel::parse(&val) {
            return Ok(level);
        }

        bail!(format!("'{val}' is not a supported quantization level"));
    }

    pub fn show_dashboard() -> bool {
        return Config::get(ConfigKey::ShowDashboard) != "false";
    }

    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;
            for (key, val) in read_document(&cmd, &doc)? {
                Config::set(key, &val);
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        Config::set(
            ConfigKey::ApiUrl,
            &normalize_api_url(&Config::get(ConfigKey::ApiUrl)),
        );

        Config::health_check_interval()?;
        Config::pruning_ratio()?;
        Config::quantization_level()?;

        tracing::debug!(
            api_url = Config::get(ConfigKey::ApiUrl),
            health_check_interval = Config::get(ConfigKey::HealthCheckInterval),
            pruning_ratio = Config::get(ConfigKey::PruningRatio),
            quantization_level = Config::get(ConfigKey::QuantizationLevel),
            show_dashboard = Config::get(ConfigKey::ShowDashboard),
            username = Config::get(ConfigKey::Username),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                if key == ConfigKey::Username {
                    return Some(
                        "# Your user name displayed on your chat bubbles.\n# username = \"\""
                            .to_string(),
                    );
                }

                let long = key.to_string();
                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(long.as_str()))?;

                let mut description = arg
                    .get_help()
                    .map(|e| return e.to_string())
                    .unwrap_or_default()
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let possible = possible_values(&cmd, key);
                if !possible.is_empty() {
                    description = format!(
                        "{description} [possible values: {}]",
                        possible.join(", ")
                    );
                }

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<f64>().is_ok() || val.parse::<bool>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
