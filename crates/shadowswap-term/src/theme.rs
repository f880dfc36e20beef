use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use shadowswap_core::render::Appearance;
use shadowswap_core::world::World;

/// Errors raised while reading a theme asset.
#[derive(Debug)]
pub enum ThemeError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read theme: {e}"),
            Self::Parse(e) => write!(f, "failed to parse theme: {e}"),
        }
    }
}

impl std::error::Error for ThemeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

/// How one kind of entity is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    /// RGB foreground colour.
    pub color: [u8; 3],
    pub glyph: char,
}

impl Sprite {
    const fn block(color: [u8; 3]) -> Self {
        Self { color, glyph: '█' }
    }
}

/// Terminal visual theme, loaded from a JSON asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub light_background: [u8; 3],
    pub shadow_background: [u8; 3],
    pub hud_text: [u8; 3],
    pub banner_text: [u8; 3],
    pub light_platform: Sprite,
    pub shadow_platform: Sprite,
    pub key: Sprite,
    pub enemy: Sprite,
    pub door: Sprite,
    pub player: Sprite,
}

/// Flat coloured blocks, used when no theme asset can be loaded.
impl Default for Theme {
    fn default() -> Self {
        Self {
            light_background: [180, 220, 255],
            shadow_background: [50, 50, 80],
            hud_text: [255, 255, 255],
            banner_text: [255, 215, 0],
            light_platform: Sprite::block([0, 200, 0]),
            shadow_platform: Sprite::block([150, 0, 200]),
            key: Sprite::block([255, 255, 0]),
            enemy: Sprite::block([0, 0, 0]),
            door: Sprite::block([255, 215, 0]),
            player: Sprite::block([200, 50, 50]),
        }
    }
}

impl Theme {
    /// Load the theme asset at `path`, falling back to flat blocks when it is
    /// unset, missing or unparseable.
    pub fn load(path: Option<&str>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::from_path(path) {
            Ok(theme) => {
                tracing::info!(path, "Loaded theme");
                theme
            },
            Err(e) => {
                tracing::warn!("Failed to load theme {path}: {e}, using placeholder blocks");
                Self::default()
            },
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ThemeError> {
        let json = std::fs::read_to_string(path).map_err(ThemeError::Io)?;
        serde_json::from_str(&json).map_err(ThemeError::Parse)
    }

    pub fn sprite(&self, appearance: Appearance) -> &Sprite {
        match appearance {
            Appearance::LightPlatform => &self.light_platform,
            Appearance::ShadowPlatform => &self.shadow_platform,
            Appearance::Key => &self.key,
            Appearance::Enemy => &self.enemy,
            Appearance::Door => &self.door,
            Appearance::Player => &self.player,
        }
    }

    pub fn background(&self, world: World) -> [u8; 3] {
        match world {
            World::Light => self.light_background,
            World::Shadow => self.shadow_background,
        }
    }
}
