use shadowswap_core::render::{Appearance, DrawCommand, Frame, Hud};
use shadowswap_core::world::World;

use crate::physics::PhysicsConfig;
use crate::{GameState, RunStatus};

pub const COMPLETE_BANNER: &str = "Level Completed!";
pub const VICTORY_BANNER: &str = "You finished all levels!";

fn platform_appearance(world: World) -> Appearance {
    match world {
        World::Light => Appearance::LightPlatform,
        World::Shadow => Appearance::ShadowPlatform,
    }
}

/// Derive the draw list and HUD for the current state. Only entities visible
/// in the current world are drawn; enemies only appear in Shadow.
pub fn build_frame(state: &GameState, level_count: usize, physics: &PhysicsConfig) -> Frame {
    let world = state.world;
    let entities = &state.entities;
    let mut commands = Vec::new();

    for p in entities.platforms(world) {
        if p.visibility.is_visible_in(world) {
            commands.push(DrawCommand {
                rect: p.rect,
                appearance: platform_appearance(p.world),
                opacity: p.opacity,
            });
        }
    }
    for k in &entities.keys {
        if k.visibility.is_visible_in(world) {
            commands.push(DrawCommand::opaque(k.rect, Appearance::Key));
        }
    }
    if world == World::Shadow {
        for e in &entities.enemies {
            commands.push(DrawCommand::opaque(e.rect, Appearance::Enemy));
        }
    }
    commands.push(DrawCommand::opaque(entities.door.rect, Appearance::Door));
    commands.push(DrawCommand::opaque(state.player.rect, Appearance::Player));

    let shown_level = (state.level_index + 1).min(level_count);
    let banner = match state.status {
        RunStatus::Victory => Some(VICTORY_BANNER.to_string()),
        RunStatus::Playing if state.completion_deadline.is_some() => {
            Some(COMPLETE_BANNER.to_string())
        },
        RunStatus::Playing => None,
    };

    Frame {
        world,
        width: physics.screen_width,
        height: physics.screen_height,
        commands,
        hud: Hud {
            level_label: format!("Level {shown_level}/{level_count}"),
            keys_label: format!("Keys remaining: {}", entities.keys.len()),
            banner,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShadowSwap;
    use crate::levels::Campaign;

    const TWO_WORLDS: &str = r#"
        [[level]]
        door = { x = 700, y = 500 }
        light = [
            { x = 0, y = 560, width = 800, height = 40 },
            { x = 300, y = 400, width = 100, height = 20, visibility = "shadow", fading = true },
        ]
        shadow = [
            { x = 0, y = 560, width = 800, height = 40 },
            { x = 100, y = 300, width = 100, height = 20, visibility = "light" },
        ]
        keys = [
            { x = 200, y = 100, visibility = "light" },
            { x = 400, y = 100, visibility = "shadow" },
            { x = 600, y = 100 },
        ]
        enemies = [{ x = 500, y = 100 }]
    "#;

    fn game() -> ShadowSwap {
        ShadowSwap::with_campaign(Default::default(), Campaign::from_toml(TWO_WORLDS).unwrap())
    }

    #[test]
    fn light_frame_filters_by_visibility() {
        let g = game();
        let frame = build_frame(g.state(), 1, &PhysicsConfig::default());
        assert_eq!(frame.world, World::Light);
        // The shadow-only light platform is hidden in Light.
        assert_eq!(frame.count(Appearance::LightPlatform), 1);
        assert_eq!(frame.count(Appearance::ShadowPlatform), 0);
        assert_eq!(frame.count(Appearance::Key), 2);
        assert_eq!(frame.count(Appearance::Enemy), 0);
        assert_eq!(frame.count(Appearance::Door), 1);
        assert_eq!(frame.count(Appearance::Player), 1);
    }

    #[test]
    fn shadow_frame_shows_enemies_and_shadow_keys() {
        let mut g = game();
        g.state_mut().world = World::Shadow;
        let frame = build_frame(g.state(), 1, &PhysicsConfig::default());
        assert_eq!(frame.count(Appearance::ShadowPlatform), 1);
        assert_eq!(frame.count(Appearance::LightPlatform), 0);
        assert_eq!(frame.count(Appearance::Key), 2);
        assert_eq!(frame.count(Appearance::Enemy), 1);
    }

    #[test]
    fn player_is_drawn_last() {
        let g = game();
        let frame = build_frame(g.state(), 1, &PhysicsConfig::default());
        let last = frame.commands.last().unwrap();
        assert_eq!(last.appearance, Appearance::Player);
        assert_eq!(last.rect, g.state().player.rect);
    }

    #[test]
    fn hud_labels() {
        let g = game();
        let frame = build_frame(g.state(), 6, &PhysicsConfig::default());
        assert_eq!(frame.hud.level_label, "Level 1/6");
        assert_eq!(frame.hud.keys_label, "Keys remaining: 3");
        assert!(frame.hud.banner.is_none());
    }

    #[test]
    fn banner_while_completion_pending() {
        let mut g = game();
        g.state_mut().completion_deadline = Some(60);
        let frame = build_frame(g.state(), 1, &PhysicsConfig::default());
        assert_eq!(frame.hud.banner.as_deref(), Some(COMPLETE_BANNER));
    }

    #[test]
    fn victory_clamps_level_label() {
        let mut g = game();
        let state = g.state_mut();
        state.level_index = 1;
        state.status = RunStatus::Victory;
        let frame = build_frame(g.state(), 1, &PhysicsConfig::default());
        assert_eq!(frame.hud.level_label, "Level 1/1");
        assert_eq!(frame.hud.banner.as_deref(), Some(VICTORY_BANNER));
    }
}
