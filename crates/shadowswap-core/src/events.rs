use serde::{Deserialize, Serialize};

use crate::world::World;

/// Side effects emitted by a simulation step.
///
/// The frontend turns these into sound triggers and log lines; the
/// simulation never calls into audio or rendering directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player left the ground with a jump impulse.
    Jumped,
    /// A key was picked up; `remaining` keys are left in the level.
    KeyCollected { remaining: usize },
    /// The player touched an enemy in the Shadow world. The level was rebuilt.
    EnemyHit,
    /// The player fell below the screen. The level was rebuilt.
    PlayerFell,
    /// The current world changed.
    WorldSwitched { world: World },
    /// All keys collected and the door reached. The next level starts after
    /// the completion delay. Levels are zero-based campaign indices.
    LevelComplete { level: usize },
    /// A new level was built and the player spawned into it.
    LevelStarted { level: usize },
    /// The final level was completed.
    CampaignComplete,
}

impl GameEvent {
    /// Whether this event ended the current attempt.
    pub fn is_death(&self) -> bool {
        matches!(self, GameEvent::EnemyHit | GameEvent::PlayerFell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_failures_count_as_deaths() {
        assert!(GameEvent::EnemyHit.is_death());
        assert!(GameEvent::PlayerFell.is_death());
        assert!(!GameEvent::Jumped.is_death());
        assert!(!GameEvent::KeyCollected { remaining: 0 }.is_death());
        assert!(!GameEvent::LevelComplete { level: 0 }.is_death());
    }
}
