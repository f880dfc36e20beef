use serde::{Deserialize, Serialize};

use shadowswap_core::game_trait::FrameInput;
use shadowswap_core::geometry::Rect;

use crate::entities::Platform;

/// Downward acceleration (units/frame^2).
pub const GRAVITY: f32 = 0.8;
/// Maximum downward velocity (units/frame).
pub const TERMINAL_VELOCITY: f32 = 10.0;
/// Horizontal displacement per frame while a direction is held.
pub const MOVE_SPEED: f32 = 5.0;
/// Vertical velocity applied on jump (negative is up).
pub const JUMP_VELOCITY: f32 = -22.0;
pub const PLAYER_WIDTH: f32 = 40.0;
pub const PLAYER_HEIGHT: f32 = 50.0;
/// Top-left corner the player spawns at on every attempt.
pub const SPAWN_X: f32 = 50.0;
pub const SPAWN_Y: f32 = 500.0;
pub const SCREEN_WIDTH: f32 = 800.0;
pub const SCREEN_HEIGHT: f32 = 600.0;
/// Opacity change per frame for fading platforms.
pub const FADE_STEP: u8 = 5;
/// Fading platforms never drop below this opacity.
pub const FADE_FLOOR: u8 = 50;

/// Which platform the player lands on when several overlap in one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandingPolicy {
    /// The overlapping platform with the highest top edge; ties go to the
    /// first one in level order.
    #[default]
    Highest,
    /// Every overlapping platform snaps the player in level order, so the
    /// last one tested wins.
    Last,
}

/// Configurable physics parameters, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub move_speed: f32,
    pub jump_velocity: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub screen_width: f32,
    pub screen_height: f32,
    pub fade_step: u8,
    pub fade_floor: u8,
    pub landing: LandingPolicy,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            terminal_velocity: TERMINAL_VELOCITY,
            move_speed: MOVE_SPEED,
            jump_velocity: JUMP_VELOCITY,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            spawn_x: SPAWN_X,
            spawn_y: SPAWN_Y,
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            fade_step: FADE_STEP,
            fade_floor: FADE_FLOOR,
            landing: LandingPolicy::Highest,
        }
    }
}

/// The player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub rect: Rect,
    pub vel_y: f32,
    pub on_ground: bool,
}

impl PlayerState {
    /// A fresh player at the configured spawn point.
    pub fn spawn(config: &PhysicsConfig) -> Self {
        Self {
            rect: Rect::new(
                config.spawn_x,
                config.spawn_y,
                config.player_width,
                config.player_height,
            ),
            vel_y: 0.0,
            on_ground: false,
        }
    }
}

/// Advance the player by one frame against `platforms` (the current world's
/// collection). Returns true when a jump impulse was applied.
pub fn tick_player(
    player: &mut PlayerState,
    input: &FrameInput,
    platforms: &[Platform],
    config: &PhysicsConfig,
) -> bool {
    if input.left {
        player.rect.x -= config.move_speed;
    }
    if input.right {
        player.rect.x += config.move_speed;
    }

    player.vel_y = (player.vel_y + config.gravity).min(config.terminal_velocity);
    player.rect.y += player.vel_y;

    resolve_landing(player, platforms, config.landing);

    // Grounded stays as resolved above until next frame's landing pass.
    if input.jump && player.on_ground {
        player.vel_y = config.jump_velocity;
        return true;
    }
    false
}

pub(crate) fn resolve_landing(
    player: &mut PlayerState,
    platforms: &[Platform],
    policy: LandingPolicy,
) {
    player.on_ground = false;
    if player.vel_y < 0.0 {
        return;
    }

    match policy {
        LandingPolicy::Highest => {
            let mut best: Option<f32> = None;
            for p in platforms.iter().filter(|p| player.rect.intersects(&p.rect)) {
                if best.is_none_or(|top| p.rect.top() < top) {
                    best = Some(p.rect.top());
                }
            }
            if let Some(top) = best {
                land_on(player, top);
            }
        },
        LandingPolicy::Last => {
            for p in platforms {
                if player.rect.intersects(&p.rect) {
                    land_on(player, p.rect.top());
                }
            }
        },
    }
}

fn land_on(player: &mut PlayerState, top: f32) {
    player.rect.set_bottom(top);
    player.vel_y = 0.0;
    player.on_ground = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::PlatformSpec;
    use shadowswap_core::world::{Visibility, World};

    fn platform(x: f32, y: f32, width: f32, height: f32) -> Platform {
        Platform::from_spec(
            &PlatformSpec {
                x,
                y,
                width,
                height,
                motion: None,
                visibility: Visibility::Both,
                fading: false,
            },
            World::Light,
        )
    }

    fn ground() -> Vec<Platform> {
        vec![platform(0.0, 560.0, 800.0, 40.0)]
    }

    fn jump() -> FrameInput {
        FrameInput {
            jump: true,
            ..FrameInput::default()
        }
    }

    #[test]
    fn gravity_accelerates_fall() {
        let config = PhysicsConfig::default();
        let mut player = PlayerState::spawn(&config);
        player.rect.y = 0.0;
        tick_player(&mut player, &FrameInput::idle(), &[], &config);
        assert!((player.vel_y - 0.8).abs() < 1e-6);
        assert!((player.rect.y - 0.8).abs() < 1e-6);
        tick_player(&mut player, &FrameInput::idle(), &[], &config);
        assert!((player.vel_y - 1.6).abs() < 1e-6);
        assert!((player.rect.y - 2.4).abs() < 1e-5);
    }

    #[test]
    fn velocity_clamps_at_terminal() {
        let config = PhysicsConfig::default();
        let mut player = PlayerState::spawn(&config);
        for _ in 0..50 {
            tick_player(&mut player, &FrameInput::idle(), &[], &config);
        }
        assert_eq!(player.vel_y, TERMINAL_VELOCITY);
    }

    #[test]
    fn spawn_lands_on_ground() {
        let config = PhysicsConfig::default();
        let mut player = PlayerState::spawn(&config);
        let platforms = ground();
        for _ in 0..10 {
            tick_player(&mut player, &FrameInput::idle(), &platforms, &config);
        }
        assert!(player.on_ground);
        assert_eq!(player.rect.bottom(), 560.0);
        assert_eq!(player.vel_y, 0.0);
    }

    #[test]
    fn horizontal_inputs_cancel() {
        let config = PhysicsConfig::default();
        let mut player = PlayerState::spawn(&config);
        let both = FrameInput {
            left: true,
            right: true,
            ..FrameInput::default()
        };
        tick_player(&mut player, &both, &ground(), &config);
        assert_eq!(player.rect.x, SPAWN_X);

        let right = FrameInput {
            right: true,
            ..FrameInput::default()
        };
        tick_player(&mut player, &right, &ground(), &config);
        assert_eq!(player.rect.x, SPAWN_X + MOVE_SPEED);
    }

    #[test]
    fn jump_requires_ground() {
        let config = PhysicsConfig::default();
        let mut player = PlayerState::spawn(&config);
        // First frame: still airborne after spawn
        assert!(!tick_player(&mut player, &jump(), &ground(), &config));
        assert!(player.vel_y > 0.0);
    }

    #[test]
    fn jump_from_ground_applies_impulse() {
        let config = PhysicsConfig::default();
        let mut player = PlayerState::spawn(&config);
        let platforms = ground();
        for _ in 0..10 {
            tick_player(&mut player, &FrameInput::idle(), &platforms, &config);
        }
        assert!(tick_player(&mut player, &jump(), &platforms, &config));
        assert_eq!(player.vel_y, JUMP_VELOCITY);
        // Grounded flag is not cleared until the next landing pass
        assert!(player.on_ground);

        tick_player(&mut player, &FrameInput::idle(), &platforms, &config);
        assert!(!player.on_ground);
        assert!(player.rect.bottom() < 560.0, "player should rise");
    }

    #[test]
    fn rising_player_passes_through_platforms() {
        let config = PhysicsConfig::default();
        let mut player = PlayerState::spawn(&config);
        player.rect.y = 460.0;
        player.vel_y = -15.0;
        let platforms = vec![platform(0.0, 440.0, 800.0, 20.0)];
        tick_player(&mut player, &FrameInput::idle(), &platforms, &config);
        assert!(!player.on_ground);
        assert!(player.vel_y < 0.0);
    }

    #[test]
    fn highest_policy_picks_topmost_overlap() {
        let mut player = PlayerState {
            rect: Rect::new(100.0, 100.0, 40.0, 50.0),
            vel_y: 5.0,
            on_ground: false,
        };
        // Both overlap the player; the lower one is listed last.
        let platforms = vec![
            platform(90.0, 130.0, 100.0, 20.0),
            platform(90.0, 140.0, 100.0, 20.0),
        ];
        resolve_landing(&mut player, &platforms, LandingPolicy::Highest);
        assert!(player.on_ground);
        assert_eq!(player.rect.bottom(), 130.0);
    }

    #[test]
    fn last_policy_snaps_in_level_order() {
        let mut player = PlayerState {
            rect: Rect::new(100.0, 100.0, 40.0, 50.0),
            vel_y: 5.0,
            on_ground: false,
        };
        // Lower platform first: after snapping onto it the player still
        // overlaps the higher one, which then wins.
        let platforms = vec![
            platform(90.0, 140.0, 100.0, 20.0),
            platform(90.0, 130.0, 100.0, 20.0),
        ];
        resolve_landing(&mut player, &platforms, LandingPolicy::Last);
        assert!(player.on_ground);
        assert_eq!(player.rect.bottom(), 130.0);
    }

    #[test]
    fn last_policy_cascades_into_platform_above() {
        // Snapping onto the lower platform pushes the player into a ledge
        // it was not touching before; the iteration-order rule lands on it.
        let start = Rect::new(100.0, 100.0, 40.0, 50.0);
        let platforms = vec![
            platform(90.0, 148.0, 100.0, 20.0),
            platform(100.0, 90.0, 40.0, 9.5),
        ];

        let mut player = PlayerState {
            rect: start,
            vel_y: 5.0,
            on_ground: false,
        };
        resolve_landing(&mut player, &platforms, LandingPolicy::Last);
        assert_eq!(player.rect.bottom(), 90.0);

        let mut player = PlayerState {
            rect: start,
            vel_y: 5.0,
            on_ground: false,
        };
        resolve_landing(&mut player, &platforms, LandingPolicy::Highest);
        assert_eq!(player.rect.bottom(), 148.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn velocity_never_exceeds_terminal(
                inputs in proptest::collection::vec(
                    (any::<bool>(), any::<bool>(), any::<bool>()),
                    1..300,
                )
            ) {
                let config = PhysicsConfig::default();
                let mut player = PlayerState::spawn(&config);
                let platforms = ground();
                for (left, right, jump) in inputs {
                    let input = FrameInput { left, right, jump, switch_world: false };
                    tick_player(&mut player, &input, &platforms, &config);
                    prop_assert!(player.vel_y <= TERMINAL_VELOCITY);
                    prop_assert!(player.rect.y.is_finite());
                }
            }

            #[test]
            fn airborne_velocity_grows_by_gravity(
                start_vel in -22.0f32..9.0,
                frames in 1usize..30,
            ) {
                let config = PhysicsConfig::default();
                let mut player = PlayerState::spawn(&config);
                player.rect.y = -10_000.0;
                player.vel_y = start_vel;
                for _ in 0..frames {
                    let before = player.vel_y;
                    tick_player(&mut player, &FrameInput::idle(), &[], &config);
                    let expected = (before + GRAVITY).min(TERMINAL_VELOCITY);
                    prop_assert!((player.vel_y - expected).abs() < 1e-4);
                }
            }

            #[test]
            fn grounded_player_rests_on_a_top_edge(
                x in 0.0f32..700.0,
                frames in 10usize..100,
            ) {
                let config = PhysicsConfig::default();
                let mut player = PlayerState::spawn(&config);
                player.rect.x = x;
                let platforms = ground();
                for _ in 0..frames {
                    tick_player(&mut player, &FrameInput::idle(), &platforms, &config);
                }
                prop_assert!(player.on_ground);
                prop_assert_eq!(player.rect.bottom(), 560.0);
            }
        }
    }
}
