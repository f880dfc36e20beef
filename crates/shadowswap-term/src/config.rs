use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::audio::AudioSettings;

pub const DEFAULT_CONFIG_PATH: &str = "config/term.toml";

/// Terminal frontend configuration, loaded from `config/term.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermConfig {
    /// Theme asset. Missing or broken files fall back to flat blocks.
    pub theme_path: Option<String>,
    /// Log destination; the screen itself is owned by the game.
    pub log_path: String,
    pub audio: AudioSettings,
    /// Upper bound on simulation steps run per rendered frame.
    pub max_catch_up_steps: u32,
    /// A key counts as held this long after its last press or repeat, for
    /// terminals that never report releases.
    pub hold_window_ms: u64,
}

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            theme_path: Some("assets/theme.json".to_string()),
            log_path: "shadowswap.log".to_string(),
            audio: AudioSettings::default(),
            max_catch_up_steps: 5,
            hold_window_ms: 150,
        }
    }
}

impl TermConfig {
    /// Load config from `$SHADOWSWAP_TERM_CONFIG` or `config/term.toml`.
    pub fn load() -> Self {
        let path = std::env::var("SHADOWSWAP_TERM_CONFIG")
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load_from(&path);

        if let Ok(log) = std::env::var("SHADOWSWAP_LOG")
            && !log.is_empty()
        {
            config.log_path = log;
        }
        config
    }

    /// Load config from `path`, using defaults when the file is missing or
    /// unparseable.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<TermConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from {}", path.display());
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {e}, using defaults", path.display());
                    TermConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No {} found, using defaults", path.display());
                TermConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = TermConfig::default();
        assert_eq!(cfg.log_path, "shadowswap.log");
        assert_eq!(cfg.theme_path.as_deref(), Some("assets/theme.json"));
        assert_eq!(cfg.max_catch_up_steps, 5);
        assert!(!cfg.audio.muted);
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
log_path = "/tmp/ss.log"

[audio]
muted = true
"#;
        let cfg: TermConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.log_path, "/tmp/ss.log");
        assert!(cfg.audio.muted);
        assert_eq!(cfg.audio.master_volume, AudioSettings::default().master_volume);
        assert_eq!(cfg.hold_window_ms, 150);
    }

    #[test]
    fn missing_file_uses_defaults() {
        assert_eq!(TermConfig::load_from("/nonexistent/term.toml"), TermConfig::default());
    }

    #[test]
    fn sample_config_parses() {
        let content = include_str!("../../../config/term.toml");
        let cfg: TermConfig = toml::from_str(content).unwrap();
        assert_eq!(cfg, TermConfig::default());
    }
}
