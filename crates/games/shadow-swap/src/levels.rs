//! Level registry: the ordered campaign of level definitions.
//!
//! The default campaign is embedded from `levels/campaign.toml`. A campaign
//! can also be loaded from a file; those are validated before use so a bad
//! edit is reported instead of producing a broken level.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use shadowswap_core::geometry::Rect;
use shadowswap_core::world::Visibility;

use crate::entities::{DOOR_HEIGHT, DOOR_WIDTH, KEY_SIZE, Motion};

const EMBEDDED_CAMPAIGN: &str = include_str!("../levels/campaign.toml");

fn default_enemy_speed() -> f32 {
    2.0
}

/// Platform as written in level data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub motion: Option<Motion>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub fading: bool,
}

impl PlatformSpec {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySpec {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub patrol_range: f32,
    #[serde(default = "default_enemy_speed")]
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorSpec {
    pub x: f32,
    pub y: f32,
}

/// One level of the campaign. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub light: Vec<PlatformSpec>,
    #[serde(default)]
    pub shadow: Vec<PlatformSpec>,
    #[serde(default)]
    pub keys: Vec<KeySpec>,
    #[serde(default)]
    pub enemies: Vec<EnemySpec>,
    pub door: DoorSpec,
}

impl LevelDefinition {
    fn validate(&self, level: usize) -> Result<(), LevelError> {
        let invalid = |reason: String| LevelError::Invalid { level, reason };

        for (world, platforms) in [("light", &self.light), ("shadow", &self.shadow)] {
            for (i, p) in platforms.iter().enumerate() {
                if !p.rect().is_valid() {
                    return Err(invalid(format!("{world} platform {i} has a non-positive size")));
                }
                if let Some(m) = p.motion
                    && !(m.range.is_finite() && m.range >= 0.0 && m.speed.is_finite())
                {
                    return Err(invalid(format!("{world} platform {i} has invalid motion")));
                }
            }
        }
        for (i, k) in self.keys.iter().enumerate() {
            if !Rect::new(k.x, k.y, KEY_SIZE, KEY_SIZE).is_valid() {
                return Err(invalid(format!("key {i} has a non-finite position")));
            }
        }
        for (i, e) in self.enemies.iter().enumerate() {
            if !(e.x.is_finite() && e.y.is_finite()) {
                return Err(invalid(format!("enemy {i} has a non-finite position")));
            }
            if !(e.patrol_range.is_finite() && e.patrol_range >= 0.0 && e.speed.is_finite()) {
                return Err(invalid(format!("enemy {i} has an invalid patrol")));
            }
        }
        if !Rect::new(self.door.x, self.door.y, DOOR_WIDTH, DOOR_HEIGHT).is_valid() {
            return Err(invalid("door has a non-finite position".to_string()));
        }
        Ok(())
    }
}

/// Errors raised while loading a campaign.
#[derive(Debug)]
pub enum LevelError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Empty,
    Invalid {
        level: usize,
        reason: String,
    },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read {path}: {source}"),
            Self::Parse(e) => write!(f, "failed to parse level data: {e}"),
            Self::Empty => write!(f, "campaign contains no levels"),
            Self::Invalid { level, reason } => write!(f, "level {}: {reason}", level + 1),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::Empty | Self::Invalid { .. } => None,
        }
    }
}

impl From<toml::de::Error> for LevelError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

/// The ordered sequence of levels. Always non-empty and validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(rename = "level")]
    levels: Vec<LevelDefinition>,
}

impl Campaign {
    /// The built-in six-level campaign.
    pub fn embedded() -> Self {
        Self::from_toml(EMBEDDED_CAMPAIGN).expect("embedded campaign must be valid")
    }

    /// Parse and validate a campaign from TOML (`[[level]]` tables).
    pub fn from_toml(content: &str) -> Result<Self, LevelError> {
        let campaign: Campaign = toml::from_str(content)?;
        Self::from_levels(campaign.levels)
    }

    pub fn from_levels(levels: Vec<LevelDefinition>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }
        for (i, level) in levels.iter().enumerate() {
            level.validate(i)?;
        }
        Ok(Self { levels })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load the campaign at `path` if given, falling back to the embedded
    /// campaign when it is missing or invalid.
    pub fn load(path: Option<&str>) -> Self {
        let Some(path) = path else {
            return Self::embedded();
        };
        match Self::from_path(path) {
            Ok(campaign) => {
                tracing::info!(path, levels = campaign.len(), "Loaded campaign");
                campaign
            },
            Err(e) => {
                tracing::warn!("Failed to load campaign: {e}, using built-in levels");
                Self::embedded()
            },
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelDefinition> {
        self.levels.get(index)
    }

    pub fn levels(&self) -> &[LevelDefinition] {
        &self.levels
    }
}

impl Default for Campaign {
    fn default() -> Self {
        Self::embedded()
    }
}
