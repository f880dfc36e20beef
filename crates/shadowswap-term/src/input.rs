use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use shadowswap_core::game_trait::FrameInput;

/// Logical actions the keyboard maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Jump,
    SwapWorld,
    Pause,
    Confirm,
    Quit,
}

/// Key bindings: arrows or WASD, Space to jump, Tab or S to swap worlds.
pub fn action_for(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Left | KeyCode::Char('a' | 'A') => Some(Action::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Some(Action::Right),
        KeyCode::Up | KeyCode::Char(' ' | 'w' | 'W') => Some(Action::Jump),
        KeyCode::Tab | KeyCode::Char('s' | 'S') => Some(Action::SwapWorld),
        KeyCode::Char('p' | 'P') => Some(Action::Pause),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => Some(Action::Quit),
        _ => None,
    }
}

/// Keyboard state, updated from terminal events.
///
/// Terminals with keyboard enhancement report releases; classic terminals
/// only repeat presses while a key is down. A key therefore counts as held
/// until it is released or `hold_window` passes without a press or repeat.
pub struct InputState {
    /// Last press/repeat time of each held action.
    held: HashMap<Action, Instant>,
    /// Actions pressed since the last `take_frame_input`/`end_frame`.
    just_pressed: HashSet<Action>,
    hold_window: Duration,
}

impl InputState {
    pub fn new(hold_window: Duration) -> Self {
        Self {
            held: HashMap::new(),
            just_pressed: HashSet::new(),
            hold_window,
        }
    }

    pub fn on_key_event(&mut self, event: &KeyEvent, now: Instant) {
        let Some(action) = action_for(event.code, event.modifiers) else {
            return;
        };
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.on_press(action, now),
            KeyEventKind::Release => self.on_release(action),
        }
    }

    /// Register a press or repeat. Only the first press of a held key counts
    /// as just pressed.
    pub fn on_press(&mut self, action: Action, now: Instant) {
        if !self.is_held(action, now) {
            self.just_pressed.insert(action);
        }
        self.held.insert(action, now);
    }

    pub fn on_release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    pub fn is_held(&self, action: Action, now: Instant) -> bool {
        self.held
            .get(&action)
            .is_some_and(|&last| now.saturating_duration_since(last) <= self.hold_window)
    }

    pub fn is_just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Sample input for one simulation step. The swap edge is consumed so
    /// it reaches exactly one step.
    pub fn take_frame_input(&mut self, now: Instant) -> FrameInput {
        FrameInput {
            left: self.is_held(Action::Left, now),
            right: self.is_held(Action::Right, now),
            jump: self.is_held(Action::Jump, now),
            switch_world: self.just_pressed.remove(&Action::SwapWorld),
        }
    }

    /// Clear per-frame state. Call at the end of each rendered frame. A swap
    /// edge survives until a simulation step takes it.
    pub fn end_frame(&mut self, now: Instant) {
        self.just_pressed.retain(|a| *a == Action::SwapWorld);
        let window = self.hold_window;
        self.held.retain(|_, last| now.saturating_duration_since(*last) <= window);
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(Duration::from_millis(150))
    }
}
