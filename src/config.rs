use anyhow::{bail, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Settings file holding the persisted overrides
    pub settings_file: String,
    pub settings_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let settings_file = std::env::var("CULTURE_SETTINGS_FILE")
            .unwrap_or_else(|_| "data/settings.json".to_string());
        if settings_file.trim().is_empty() {
            bail!("CULTURE_SETTINGS_FILE is empty");
        }

        let settings_key = std::env::var("CULTURE_SETTINGS_KEY")
            .unwrap_or_else(|_| "NeutralCultureCountyOverrides".to_string());
        if settings_key.trim().is_empty() {
            bail!("CULTURE_SETTINGS_KEY is empty");
        }

        Ok(Self {
            settings_file,
            settings_key,
        })
    }
}
