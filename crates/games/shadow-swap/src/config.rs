use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::physics::PhysicsConfig;

/// Default location of the game config, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/shadowswap.toml";

/// Top-level game configuration, loaded from `config/shadowswap.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSwapConfig {
    pub physics: PhysicsConfig,
    /// Simulation steps per second. Physics values are per step.
    pub tick_rate_hz: f32,
    /// Celebration time between touching the door and the next level.
    pub completion_delay_ms: u64,
    /// Ignore world swaps while a level-complete transition is pending.
    pub lock_world_during_completion: bool,
    /// Campaign override file. The embedded campaign is used when unset.
    pub levels_path: Option<String>,
}

impl Default for ShadowSwapConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            tick_rate_hz: 60.0,
            completion_delay_ms: 1000,
            lock_world_during_completion: true,
            levels_path: None,
        }
    }
}

impl ShadowSwapConfig {
    /// Load config from `$SHADOWSWAP_CONFIG` or `config/shadowswap.toml`,
    /// then apply env var overrides.
    pub fn load() -> Self {
        let path = std::env::var("SHADOWSWAP_CONFIG")
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load_from(&path);

        if let Ok(levels) = std::env::var("SHADOWSWAP_LEVELS")
            && !levels.is_empty()
        {
            config.levels_path = Some(levels);
        }

        config
    }

    /// Load config from `path`, using defaults when the file is missing or
    /// unparseable.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let config = match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<ShadowSwapConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from {}", path.display());
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {e}, using defaults", path.display());
                    ShadowSwapConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No {} found, using defaults", path.display());
                ShadowSwapConfig::default()
            },
        };
        config.sanitized()
    }

    /// Replace values the simulation cannot run with by their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0) {
            tracing::warn!(value = self.tick_rate_hz, "tick_rate_hz must be > 0, using default");
            self.tick_rate_hz = defaults.tick_rate_hz;
        }
        let physics = &mut self.physics;
        if !(physics.player_width > 0.0 && physics.player_height > 0.0) {
            tracing::warn!("physics player size must be positive, using default");
            physics.player_width = defaults.physics.player_width;
            physics.player_height = defaults.physics.player_height;
        }
        if !(physics.terminal_velocity.is_finite() && physics.terminal_velocity > 0.0) {
            tracing::warn!("physics.terminal_velocity must be > 0, using default");
            physics.terminal_velocity = defaults.physics.terminal_velocity;
        }
        self
    }

    /// Completion delay converted to simulation frames (at least one).
    pub fn completion_delay_frames(&self) -> u64 {
        let frames = (self.completion_delay_ms as f64 * self.tick_rate_hz as f64 / 1000.0).round();
        (frames as u64).max(1)
    }
}
