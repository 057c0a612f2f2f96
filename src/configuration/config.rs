#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::anyhow;
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

use crate::domain::models::CameraName;
use crate::domain::models::Facing;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ApiUrl,
    Camera,
    CameraFacing,
    CameraFrontDevice,
    CameraRearDevice,
    ConfigFile,
    FfmpegPath,
    PreferencesFile,
    SessionCookie,
}

fn app_dir() -> path::PathBuf {
    #[cfg(not(target_os = "macos"))]
    let dir = dirs::cache_dir().map(|dir| return dir.join("lenschat"));
    #[cfg(target_os = "macos")]
    let dir = env::var("HOME")
        .ok()
        .map(|home| return path::PathBuf::from(home).join(".config/lenschat"));

    return dir.unwrap_or_else(|| return path::PathBuf::from(".lenschat"));
}

pub struct Config {}

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
        let dir = app_dir();

        let res = match key {
            ConfigKey::ApiUrl => "http://localhost:3000".to_string(),
            ConfigKey::Camera => CameraName::Ffmpeg.to_string(),
            ConfigKey::CameraFacing => Facing::Rear.to_string(),
            ConfigKey::CameraFrontDevice => "/dev/video0".to_string(),
            ConfigKey::CameraRearDevice => "/dev/video0".to_string(),
            ConfigKey::FfmpegPath => "ffmpeg".to_string(),
            ConfigKey::PreferencesFile => dir.join("preferences.toml").to_string_lossy().to_string(),

            // Special
            ConfigKey::ConfigFile => dir.join("config.toml").to_string_lossy().to_string(),
            ConfigKey::SessionCookie => "".to_string(),
        };

        return res;
    }

    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            if key == ConfigKey::SessionCookie {
                continue;
            }
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

            for key in ConfigKey::iter() {
                if key == ConfigKey::SessionCookie {
                    continue;
                }

                if let Some(val) = doc.get(&key.to_string()) {
                    // Use clap value parsers to do validation.
                    let mut possible_values = vec![];
                    if let Some(arg) = cmd
                        .get_arguments()
                        .find(|e| return e.get_long() == Some(key.to_string().as_str()))
                    {
                        possible_values = arg
                            .get_possible_values()
                            .iter()
                            .map(|e| return e.get_name().to_string())
                            .collect::<Vec<String>>();
                    }

                    if let Some(val_int) = val.as_integer() {
                        Config::set(key, &val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        if !possible_values.is_empty()
                            && !possible_values.contains(&val_str.to_string())
                        {
                            bail!(format!("config.toml has an invalid value for key '{key}': {val_str}\nPossible values are: {}", possible_values.join(", ")));
                        }
                        Config::set(key, val_str);
                    }
                }
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

        tracing::debug!(
            api_url = Config::get(ConfigKey::ApiUrl),
            camera = Config::get(ConfigKey::Camera),
            camera_facing = Config::get(ConfigKey::CameraFacing),
            preferences_file = Config::get(ConfigKey::PreferencesFile),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> Result<String> {
        let mut sections = vec![];
        for key in ConfigKey::iter() {
            if key == ConfigKey::SessionCookie || key == ConfigKey::ConfigFile {
                continue;
            }

            let arg = cmd
                .get_arguments()
                .find(|e| return e.get_long() == Some(key.to_string().as_str()))
                .ok_or_else(|| return anyhow!("No CLI argument for config key {key}"))?;

            let mut description = arg
                .get_help()
                .map(|e| return e.to_string())
                .unwrap_or_default()
                .split("[default:")
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();

            if !arg.get_possible_values().is_empty() {
                let possible_values = arg
                    .get_possible_values()
                    .iter()
                    .map(|e| return e.get_name().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                description = format!("{description} [possible values: {possible_values}]");
            }

            let mut val = Config::default(key);
            if val.is_empty() {
                val = format!("# {key} = \"\"");
            } else if val.parse::<i32>().is_ok() {
                val = format!("{key} = {val}");
            } else {
                val = format!("{key} = \"{val}\"");
            }

            sections.push(format!("# {description}\n{val}"));
        }

        return Ok(sections.join("\n\n"));
    }
}
