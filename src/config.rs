use std::{io, path::Path};

use emath::Vec2;
use log::warn;

use crate::{BrushSettings, OverlayStyle};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to read config: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    pub viewport: Vec2,
    pub brush: BrushSettings,
    /// Initial state of the 50% reference overlay while retouching
    pub show_original: bool,
    pub overlay: OverlayStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewport: [1000.0, 750.0].into(),
            brush: BrushSettings::default(),
            show_original: true,
            overlay: OverlayStyle::default(),
        }
    }
}

impl Config {
    /// Falls back to the defaults when `path` does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::File::open(path) {
            Ok(f) => Ok(serde_json::from_reader(io::BufReader::new(f))?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("{} not found, using default config", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BrushMode;

    #[test]
    fn missing_file_gives_defaults() {
        let config = Config::load("this/config/does/not/exist.json").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "brush": { "mode": "erase", "radius": 500 } }"#).unwrap();
        assert_eq!(config.brush.mode, BrushMode::Erase);
        assert_eq!(config.brush.radius.get(), 100);
        assert!(config.show_original);
        assert_eq!(config.overlay, OverlayStyle::default());
    }

    #[test]
    fn malformed_file_is_json_error() {
        let path = std::env::temp_dir()
            .join(format!("matte-retouch-config-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let result = Config::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ConfigError::Json(_))), "{result:?}");
    }
}
