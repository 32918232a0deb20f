use std::path::PathBuf;

use serde::Deserialize;

use crate::model::DataError;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub synsets_file: PathBuf,
    pub categories_file: PathBuf,
    pub offers_dir: PathBuf,
}

pub fn load_config(path: &str) -> Result<AppConfig, DataError> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
