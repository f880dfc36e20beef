use serde::{Deserialize, Serialize};

use shadowswap_core::geometry::Rect;
use shadowswap_core::world::{Visibility, World};

use crate::levels::{DoorSpec, EnemySpec, KeySpec, PlatformSpec};

/// Key pickup size (square).
pub const KEY_SIZE: f32 = 30.0;
/// Enemy size (square).
pub const ENEMY_SIZE: f32 = 40.0;
pub const DOOR_WIDTH: f32 = 40.0;
pub const DOOR_HEIGHT: f32 = 60.0;
/// Opacity of a fully visible platform.
pub const OPAQUE: u8 = u8::MAX;

/// Axis a moving platform oscillates along.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

/// Oscillation descriptor. `speed` changes sign each time the platform
/// passes `range` units from its spawn position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    #[serde(default)]
    pub axis: Axis,
    pub range: f32,
    pub speed: f32,
}

/// A platform in one world's collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    /// Collection the platform belongs to; drives its appearance.
    pub world: World,
    pub motion: Option<Motion>,
    pub fading: bool,
    pub visibility: Visibility,
    pub opacity: u8,
    spawn_x: f32,
    spawn_y: f32,
}

impl Platform {
    pub fn from_spec(spec: &PlatformSpec, world: World) -> Self {
        Self {
            rect: spec.rect(),
            world,
            motion: spec.motion,
            fading: spec.fading,
            visibility: spec.visibility,
            opacity: OPAQUE,
            spawn_x: spec.x,
            spawn_y: spec.y,
        }
    }

    /// Signed offset from the spawn position along the motion axis.
    pub fn displacement(&self) -> f32 {
        match self.motion.map(|m| m.axis) {
            Some(Axis::Vertical) => self.rect.y - self.spawn_y,
            Some(Axis::Horizontal) | None => self.rect.x - self.spawn_x,
        }
    }

    /// Advance motion and fade by one frame.
    pub fn update(&mut self, current: World, fade_step: u8, fade_floor: u8) {
        if let Some(motion) = &mut self.motion {
            let offset = match motion.axis {
                Axis::Horizontal => {
                    self.rect.x += motion.speed;
                    self.rect.x - self.spawn_x
                },
                Axis::Vertical => {
                    self.rect.y += motion.speed;
                    self.rect.y - self.spawn_y
                },
            };
            if offset.abs() > motion.range {
                motion.speed = -motion.speed;
            }
        }

        // Only a platform tied to the current world fades in; `Both` never
        // matches a single world.
        if self.fading {
            self.opacity = if self.visibility == Visibility::from(current) {
                self.opacity.saturating_add(fade_step)
            } else {
                self.opacity.saturating_sub(fade_step).max(fade_floor)
            };
        }
    }
}

/// A collectible key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Key {
    pub rect: Rect,
    pub visibility: Visibility,
}

impl Key {
    pub fn from_spec(spec: &KeySpec) -> Self {
        Self {
            rect: Rect::new(spec.x, spec.y, KEY_SIZE, KEY_SIZE),
            visibility: spec.visibility,
        }
    }

    pub fn can_collect(&self, player: &Rect, current: World) -> bool {
        self.visibility.is_visible_in(current) && self.rect.intersects(player)
    }
}

/// A patrolling enemy. Only dangerous in the Shadow world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Rect,
    pub patrol_range: f32,
    pub speed: f32,
    pub start_x: f32,
}

impl Enemy {
    pub fn from_spec(spec: &EnemySpec) -> Self {
        Self {
            rect: Rect::new(spec.x, spec.y, ENEMY_SIZE, ENEMY_SIZE),
            patrol_range: spec.patrol_range,
            speed: spec.speed,
            start_x: spec.x,
        }
    }

    pub fn update(&mut self) {
        if self.patrol_range > 0.0 {
            self.rect.x += self.speed;
            if (self.rect.x - self.start_x).abs() > self.patrol_range {
                self.speed = -self.speed;
            }
        }
    }
}

/// The level exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub rect: Rect,
}

impl Door {
    pub fn from_spec(spec: &DoorSpec) -> Self {
        Self {
            rect: Rect::new(spec.x, spec.y, DOOR_WIDTH, DOOR_HEIGHT),
        }
    }
}
