use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::render::{ColorDepth, ColorMode, RenderMode};

/// User configuration loaded from the config file.
/// Every field is optional: CLI flags override the file, the file overrides defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Theme to start with
    pub theme: Option<String>,
    /// Light or dark palette
    pub mode: Option<ColorMode>,
    /// Braille or half-block output
    pub render: Option<RenderMode>,
    /// Terminal color depth
    pub color: Option<ColorDepth>,
    /// Target FPS (1-120)
    pub fps: Option<u32>,
    /// Hide the status bar
    pub clean: Option<bool>,
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
    /// Write logs to this file
    pub log_file: Option<PathBuf>,
}

/// `~/.config/backdrop/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("backdrop").join("config.toml"))
}

/// Parse a config file. A missing file is not an error and yields `None`.
pub fn load_from(path: &Path) -> Result<Option<Config>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
}

/// Load the user config, falling back to defaults. Parse errors are reported
/// on stderr because logging is not set up yet at this point.
pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    match load_from(&path) {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Warning: {e}");
            Config::default()
        }
    }
}

/// Write the commented template to the default location, refusing to
/// overwrite an existing file.
pub fn write_default_config() -> Result<PathBuf> {
    let path = config_path().ok_or(Error::NoConfigDir)?;
    write_default_config_to(&path)?;
    Ok(path)
}

pub fn write_default_config_to(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    std::io::Write::write_all(&mut file, default_config_string().as_bytes())?;
    Ok(())
}

/// Config file template with every option commented out
pub fn default_config_string() -> String {
    r#"# backdrop configuration
# Use --show-config to see the active config file path.
# CLI flags override these settings.

# Starting theme (use --list to see all)
# theme = "aurora"

# Palette: light, dark
# mode = "dark"

# Render mode: braille, half-block
# render = "half-block"

# Color depth: mono, ansi16, ansi256, true-color
# color = "true-color"

# Target FPS (1-120)
# fps = 30

# Hide status bar
# clean = false

# Fixed random seed for reproducible animations
# seed = 42

# Log file (BACKDROP_LOG controls the level, default "info")
# log_file = "/tmp/backdrop.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_to_defaults() {
        let config: Config = toml::from_str(&default_config_string()).unwrap();
        assert!(config.theme.is_none());
        assert!(config.fps.is_none());
    }

    #[test]
    fn reads_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
theme = "ember"
mode = "light"
render = "braille"
color = "ansi256"
fps = 60
clean = true
seed = 7
log_file = "/tmp/bd.log"
"#,
        )
        .unwrap();
        let config = load_from(&path).unwrap().unwrap();
        assert_eq!(config.theme.as_deref(), Some("ember"));
        assert_eq!(config.mode, Some(ColorMode::Light));
        assert_eq!(config.render, Some(RenderMode::Braille));
        assert_eq!(config.color, Some(ColorDepth::Ansi256));
        assert_eq!(config.fps, Some(60));
        assert_eq!(config.clean, Some(true));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/bd.log")));
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from(&dir.path().join("nope.toml")).unwrap().is_none());
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "mode = \"sepia\"\n").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn template_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        write_default_config_to(&path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("# theme"));
        assert!(write_default_config_to(&path).is_err());
    }
}
