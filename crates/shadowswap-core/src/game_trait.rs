use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::render::Frame;

/// Logical inputs sampled once per frame.
///
/// `left`, `right` and `jump` are level-held; `switch_world` is
/// edge-triggered and must be true for exactly one frame per press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub switch_world: bool,
}

impl FrameInput {
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Game metadata shown on the title screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub level_count: usize,
}

/// Core trait the frontend drives.
///
/// The frontend owns the clock, input devices, audio and terminal; the
/// game only handles simulation and describes what to draw.
pub trait FrameGame {
    /// Game metadata for the title screen.
    fn metadata(&self) -> GameMetadata;

    /// Simulation tick rate in Hz. Per-frame constants are tuned to it.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Advance the simulation by exactly one fixed step.
    fn update(&mut self, input: &FrameInput) -> Vec<GameEvent>;

    /// Draw list and HUD for the current state.
    fn frame(&self) -> Frame;

    /// Freeze the simulation. `update` is a no-op until `resume`.
    fn pause(&mut self);

    fn resume(&mut self);

    fn is_paused(&self) -> bool;

    /// Whether the run has ended successfully. Later updates are no-ops.
    fn is_finished(&self) -> bool;
}
