use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::world::World;

/// Visual role of a draw command. The frontend maps each to a colour/glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Appearance {
    LightPlatform,
    ShadowPlatform,
    Key,
    Enemy,
    Door,
    Player,
}

/// A single rectangle to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    pub rect: Rect,
    pub appearance: Appearance,
    /// 0 = transparent, 255 = opaque.
    pub opacity: u8,
}

impl DrawCommand {
    pub fn opaque(rect: Rect, appearance: Appearance) -> Self {
        Self {
            rect,
            appearance,
            opacity: u8::MAX,
        }
    }
}

/// Status text drawn over the play field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub level_label: String,
    pub keys_label: String,
    /// Transient banner, e.g. while a level-complete transition is pending.
    pub banner: Option<String>,
}

/// Everything the rendering collaborator needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub world: World,
    /// Play-field size in world units.
    pub width: f32,
    pub height: f32,
    /// Back-to-front draw order.
    pub commands: Vec<DrawCommand>,
    pub hud: Hud,
}

impl Frame {
    pub fn count(&self, appearance: Appearance) -> usize {
        self.commands
            .iter()
            .filter(|c| c.appearance == appearance)
            .count()
    }
}
