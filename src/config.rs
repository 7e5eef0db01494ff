use std::{fs, path::Path};

use serde::Deserialize;
use tracing::debug;

use crate::{error::{ConvertError, Result}, forge::DEFAULT_DECK_NAME};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deck name written when the input has none and no override is given.
    pub default_deck_name: String,
    /// Extension for output paths derived from the input path.
    pub output_extension: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            default_deck_name: DEFAULT_DECK_NAME.to_string(),
            output_extension: "dck".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        let config: Config = toml::from_str(&text).map_err(|source| ConvertError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(?config, "loaded config from {}", path.display());
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
        path.map_or_else(|| Ok(Config::default()), Config::load)
    }
}

#[test]
fn partial_config() {
    let config: Config = toml::from_str("output_extension = \"txt\"").unwrap();
    assert_eq!(config.output_extension, "txt");
    assert_eq!(config.default_deck_name, "Converted Deck");
}

#[test]
fn empty_config_is_default() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config, Config::default());
}
