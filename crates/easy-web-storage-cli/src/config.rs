use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, File, FileFormat};
use serde::Deserialize;

const APP_NAME: &str = "easy-web-storage";
const CONFIG_FILE_NAME: &str = "config.toml";
const FALLBACK_DATA_DIR: &str = ".easy-web-storage";

#[derive(Deserialize, Debug)]
pub(crate) struct ApplicationConfig {
    pub area: String,
    pub data_dir: PathBuf,
    pub log: LogConfig,
}

#[derive(Deserialize, Debug)]
pub(crate) struct LogConfig {
    pub format: LogFormat,
    pub level: String,
}

#[derive(Deserialize, Clone, Copy, PartialEq, Eq, Default, Debug)]
#[serde(rename_all = "lowercase")]
pub(crate) enum LogFormat {
    #[default]
    Json,
    Pretty,
}

pub(super) fn load_config(
    path_override: Option<PathBuf>,
    data_dir_override: Option<PathBuf>,
    area_override: Option<String>,
) -> anyhow::Result<ApplicationConfig> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME).ok();

    let config_file_path = if let Some(path_override) = path_override {
        path_override
    } else {
        let xdg_dirs = xdg_dirs.as_ref().context("could not locate the user configuration directory")?;
        let config_file_path = xdg_dirs.place_config_file(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            write_default_config_file(&config_file_path)?;
        }

        config_file_path
    };

    let default_data_dir =
        xdg_dirs.map(|dirs| dirs.get_data_home()).unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR));

    let config: ApplicationConfig = Config::builder()
        .set_default("area", "local")?
        .set_default("data_dir", default_data_dir.to_string_lossy().into_owned())?
        .set_default("log.format", "json")?
        .set_default("log.level", "info")?
        .add_source(File::from(config_file_path).format(FileFormat::Toml).required(false))
        .set_override_option("area", area_override)?
        .set_override_option("data_dir", data_dir_override.map(|path| path.to_string_lossy().into_owned()))?
        .build()?
        .try_deserialize()?;

    Ok(config)
}

fn write_default_config_file(path: &Path) -> anyhow::Result<()> {
    let default_config_content = include_str!("../static/default_config.toml");
    std::fs::write(path, default_config_content)?;
    Ok(())
}
