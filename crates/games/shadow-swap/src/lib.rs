pub mod builder;
pub mod config;
pub mod entities;
pub mod levels;
pub mod physics;
pub mod render;

use serde::{Deserialize, Serialize};

use shadowswap_core::events::GameEvent;
use shadowswap_core::game_trait::{FrameGame, FrameInput, GameMetadata};
use shadowswap_core::render::Frame;
use shadowswap_core::world::World;

use builder::{LevelEntities, build_level};
use config::ShadowSwapConfig;
use levels::{Campaign, LevelDefinition};
use physics::{PhysicsConfig, PlayerState, tick_player};

/// Whether the run is still in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    #[default]
    Playing,
    /// Every level was completed. The state is frozen.
    Victory,
}

/// Counters for the whole run, shown on the victory screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub deaths: u32,
    pub keys_collected: u32,
    pub world_swaps: u32,
}

/// The complete simulation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub level_index: usize,
    pub world: World,
    pub entities: LevelEntities,
    pub player: PlayerState,
    /// Simulation steps run so far.
    pub frame: u64,
    /// Frame at which the pending level-complete transition fires.
    pub completion_deadline: Option<u64>,
    pub status: RunStatus,
    pub stats: RunStats,
}

impl GameState {
    fn new(first: &LevelDefinition, physics: &PhysicsConfig) -> Self {
        Self {
            level_index: 0,
            world: World::Light,
            entities: build_level(first),
            player: PlayerState::spawn(physics),
            frame: 0,
            completion_deadline: None,
            status: RunStatus::Playing,
            stats: RunStats::default(),
        }
    }

    /// Fresh entities and a respawned player. The world is kept.
    fn load_level(&mut self, def: &LevelDefinition, physics: &PhysicsConfig) {
        self.entities = build_level(def);
        self.player = PlayerState::spawn(physics);
        self.completion_deadline = None;
    }

    pub fn is_completion_pending(&self) -> bool {
        self.completion_deadline.is_some()
    }
}

/// The Shadow Swap game.
pub struct ShadowSwap {
    config: ShadowSwapConfig,
    campaign: Campaign,
    state: GameState,
    paused: bool,
}

impl ShadowSwap {
    /// Default configuration with the embedded campaign.
    pub fn new() -> Self {
        Self::with_campaign(ShadowSwapConfig::default(), Campaign::embedded())
    }

    /// Use `config`, loading the campaign from `config.levels_path` when set.
    pub fn from_config(config: ShadowSwapConfig) -> Self {
        let campaign = Campaign::load(config.levels_path.as_deref());
        Self::with_campaign(config, campaign)
    }

    pub fn with_campaign(config: ShadowSwapConfig, campaign: Campaign) -> Self {
        let first = campaign
            .get(0)
            .expect("campaign is validated to be non-empty");
        let state = GameState::new(first, &config.physics);
        tracing::info!(level = 0, levels = campaign.len(), "Level started");
        Self {
            config,
            campaign,
            state,
            paused: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &ShadowSwapConfig {
        &self.config
    }

    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    fn current_level(&self) -> &LevelDefinition {
        self.campaign
            .get(self.state.level_index)
            .expect("level index stays in range while playing")
    }

    /// Rebuild the current level after a death. A pending transition is
    /// dropped with the old attempt.
    fn restart_level(&mut self) {
        let def = self.current_level().clone();
        self.state.load_level(&def, &self.config.physics);
        self.state.stats.deaths += 1;
    }

    /// Move past the completed level: either build the next one or finish.
    fn advance_level(&mut self, events: &mut Vec<GameEvent>) {
        let state = &mut self.state;
        state.level_index += 1;
        state.completion_deadline = None;

        if let Some(def) = self.campaign.get(state.level_index) {
            state.load_level(def, &self.config.physics);
            tracing::info!(level = state.level_index, "Level started");
            events.push(GameEvent::LevelStarted {
                level: state.level_index,
            });
        } else {
            state.status = RunStatus::Victory;
            tracing::info!(
                deaths = state.stats.deaths,
                keys = state.stats.keys_collected,
                "Campaign complete"
            );
            events.push(GameEvent::CampaignComplete);
        }
    }
}

impl Default for ShadowSwap {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameGame for ShadowSwap {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Shadow Swap".to_string(),
            description: "Swap between Light and Shadow to collect every key and reach the door."
                .to_string(),
            level_count: self.campaign.len(),
        }
    }

    fn tick_rate(&self) -> f32 {
        self.config.tick_rate_hz
    }

    fn update(&mut self, input: &FrameInput) -> Vec<GameEvent> {
        if self.paused || self.state.status == RunStatus::Victory {
            return Vec::new();
        }

        let mut events = Vec::new();
        let physics = &self.config.physics;
        let state = &mut self.state;
        state.frame += 1;
        let pending = state.is_completion_pending();

        if input.switch_world {
            if pending && self.config.lock_world_during_completion {
                tracing::debug!("World swap ignored during level completion");
            } else {
                state.world = state.world.toggled();
                state.stats.world_swaps += 1;
                events.push(GameEvent::WorldSwitched { world: state.world });
            }
        }
        let world = state.world;

        for p in state.entities.platforms_mut(world) {
            p.update(world, physics.fade_step, physics.fade_floor);
        }
        for e in &mut state.entities.enemies {
            e.update();
        }
        if tick_player(&mut state.player, input, state.entities.platforms(world), physics) {
            events.push(GameEvent::Jumped);
        }

        // A death always wins, even over a pending level transition.
        if state.player.rect.top() > physics.screen_height {
            tracing::info!(level = state.level_index, pending, "Player fell");
            self.restart_level();
            events.push(GameEvent::PlayerFell);
            return events;
        }

        if world == World::Shadow
            && state
                .entities
                .enemies
                .iter()
                .any(|e| e.rect.intersects(&state.player.rect))
        {
            tracing::info!(level = state.level_index, pending, "Player hit an enemy");
            self.restart_level();
            events.push(GameEvent::EnemyHit);
            return events;
        }

        let player_rect = state.player.rect;
        let before = state.entities.keys.len();
        state.entities.keys.retain(|k| !k.can_collect(&player_rect, world));
        let remaining = state.entities.keys.len();
        for left in (remaining..before).rev() {
            events.push(GameEvent::KeyCollected { remaining: left });
        }
        state.stats.keys_collected += (before - remaining) as u32;

        if remaining == 0 && !pending && state.entities.door.rect.intersects(&player_rect) {
            let deadline = state.frame + self.config.completion_delay_frames();
            state.completion_deadline = Some(deadline);
            tracing::info!(level = state.level_index, deadline, "Level complete");
            events.push(GameEvent::LevelComplete {
                level: state.level_index,
            });
        }

        if state.completion_deadline.is_some_and(|deadline| state.frame >= deadline) {
            self.advance_level(&mut events);
        }

        events
    }

    fn frame(&self) -> Frame {
        render::build_frame(&self.state, self.campaign.len(), &self.config.physics)
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn is_finished(&self) -> bool {
        self.state.status == RunStatus::Victory
    }
}
