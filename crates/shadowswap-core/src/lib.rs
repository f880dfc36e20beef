pub mod events;
pub mod game_trait;
pub mod geometry;
pub mod render;
pub mod time;
pub mod world;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::events::GameEvent;
    use crate::game_trait::{FrameGame, FrameInput};
    use crate::render::Appearance;

    /// Input with only movement held.
    pub fn moving(left: bool, right: bool) -> FrameInput {
        FrameInput {
            left,
            right,
            ..FrameInput::default()
        }
    }

    /// Input with the world-swap edge set for this frame.
    pub fn swap() -> FrameInput {
        FrameInput {
            switch_world: true,
            ..FrameInput::default()
        }
    }

    /// Run `n` frames with the same input, returning all accumulated events.
    pub fn run_frames(game: &mut dyn FrameGame, n: usize, input: &FrameInput) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(input));
        }
        all_events
    }

    /// Run idle frames until `pred` matches an emitted event or `max` frames pass.
    /// Returns the number of frames run when the event appeared.
    pub fn run_until(
        game: &mut dyn FrameGame,
        max: usize,
        input: &FrameInput,
        pred: impl Fn(&GameEvent) -> bool,
    ) -> Option<usize> {
        for i in 1..=max {
            if game.update(input).iter().any(&pred) {
                return Some(i);
            }
        }
        None
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Generic checks every FrameGame implementation must pass. Game crates
    // call them from their own test modules with a fresh instance.

    /// A freshly started game draws exactly one player.
    pub fn contract_frame_draws_player(game: &dyn FrameGame) {
        let frame = game.frame();
        assert_eq!(
            frame.count(Appearance::Player),
            1,
            "frame() must contain exactly one player draw command"
        );
        assert!(frame.width > 0.0 && frame.height > 0.0);
    }

    /// pause() must freeze the simulation, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(game: &mut dyn FrameGame) {
        let walk = moving(false, true);
        game.pause();
        assert!(game.is_paused());
        let before = game.frame();
        let events = run_frames(game, 10, &walk);
        assert!(events.is_empty(), "paused game must not emit events");
        assert_eq!(before, game.frame(), "state must not change while paused");

        game.resume();
        assert!(!game.is_paused());
        run_frames(game, 10, &walk);
        assert_ne!(before, game.frame(), "state must change after resume");
    }

    /// The world-swap edge flips the frame's world and reports it.
    pub fn contract_swap_toggles_world(game: &mut dyn FrameGame) {
        let before = game.frame().world;
        let events = game.update(&swap());
        let after = game.frame().world;
        assert_eq!(after, before.toggled());
        assert!(
            events.contains(&GameEvent::WorldSwitched { world: after }),
            "swap must emit WorldSwitched"
        );
    }

    /// A positive tick rate is required by the frontend clock.
    pub fn contract_tick_rate_positive(game: &dyn FrameGame) {
        assert!(game.tick_rate() > 0.0);
    }
}
