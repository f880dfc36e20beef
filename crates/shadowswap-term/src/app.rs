use std::io::Write;
use std::sync::mpsc::{self, TryRecvError};
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyEventKind};
use crossterm::{QueueableCommand, terminal};

use shadowswap_core::events::GameEvent;
use shadowswap_core::game_trait::FrameGame;
use shadowswap_core::time::FixedTimestep;

use shadow_swap::ShadowSwap;

use crate::audio::{AudioEventQueue, AudioManager, AudioSettings};
use crate::config::TermConfig;
use crate::display;
use crate::input::{Action, InputState, action_for};
use crate::theme::Theme;

/// Longest sleep between rendered frames, so input stays responsive even
/// at low tick rates.
const MAX_FRAME_SLEEP: Duration = Duration::from_millis(16);

/// Screen the session is on once the title screen is dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Playing,
    Victory,
}

/// How the run ended. Both are clean exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    Finished,
}

/// One play session: the game plus the frontend state that drives it.
pub struct Session {
    game: ShadowSwap,
    input: InputState,
    clock: FixedTimestep,
    audio_queue: AudioEventQueue,
    running: bool,
}

impl Session {
    pub fn new(game: ShadowSwap, config: &TermConfig) -> Self {
        let clock = FixedTimestep::new(game.tick_rate(), config.max_catch_up_steps);
        Self {
            game,
            input: InputState::new(Duration::from_millis(config.hold_window_ms)),
            clock,
            audio_queue: AudioEventQueue::default(),
            running: true,
        }
    }

    pub fn game(&self) -> &ShadowSwap {
        &self.game
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn handle_event(&mut self, event: &Event, now: Instant) {
        if let Event::Key(key) = event {
            self.input.on_key_event(key, now);
        }
    }

    /// Apply frame-level actions and run every simulation step that is due
    /// after `elapsed` of real time. Returns the emitted game events.
    pub fn tick(&mut self, elapsed: Duration, now: Instant) -> Vec<GameEvent> {
        if self.input.is_just_pressed(Action::Quit) {
            tracing::info!("Quit requested");
            self.running = false;
            return Vec::new();
        }
        if self.input.is_just_pressed(Action::Pause) {
            if self.game.is_paused() {
                self.game.resume();
            } else {
                self.game.pause();
            }
            tracing::debug!(paused = self.game.is_paused(), "Pause toggled");
        }

        let mut events = Vec::new();
        for _ in 0..self.clock.advance(elapsed) {
            let input = self.input.take_frame_input(now);
            let step_events = self.game.update(&input);
            for event in &step_events {
                self.audio_queue.push_game_event(event);
            }
            events.extend(step_events);
            if self.game.is_finished() {
                break;
            }
        }
        self.input.end_frame(now);
        events
    }

    pub fn process_audio<W: Write>(
        &mut self,
        manager: &mut AudioManager<W>,
        settings: &AudioSettings,
    ) {
        self.audio_queue.process(manager, settings);
    }

    pub fn until_next_step(&self) -> Duration {
        self.clock.until_next()
    }

    pub fn state(&self) -> AppState {
        if self.game.is_finished() {
            AppState::Victory
        } else {
            AppState::Playing
        }
    }
}

/// Block on the title screen. Returns false when the player quits.
fn show_title<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    game: &ShadowSwap,
    theme: &Theme,
) -> std::io::Result<bool> {
    let lines = display::title_lines(&game.metadata());
    display::draw_screen(out, &lines, theme)?;
    loop {
        let Ok(event) = rx.recv() else {
            return Ok(false);
        };
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                match action_for(key.code, key.modifiers) {
                    Some(Action::Confirm | Action::Jump) => return Ok(true),
                    Some(Action::Quit) => return Ok(false),
                    _ => {},
                }
            },
            Event::Resize(..) => display::draw_screen(out, &lines, theme)?,
            _ => {},
        }
    }
}

/// Block on the victory screen until any key is pressed.
fn show_victory<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    game: &ShadowSwap,
    theme: &Theme,
) -> std::io::Result<()> {
    let lines = display::victory_lines(&game.state().stats);
    display::draw_screen(out, &lines, theme)?;
    while let Ok(event) = rx.recv() {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => break,
            Event::Resize(..) => display::draw_screen(out, &lines, theme)?,
            _ => {},
        }
    }
    Ok(())
}

fn play<W: Write, A: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    session: &mut Session,
    theme: &Theme,
    audio: &mut AudioManager<A>,
    settings: &AudioSettings,
) -> std::io::Result<Outcome> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut last = Instant::now();

    while session.is_running() {
        let now = Instant::now();
        loop {
            match rx.try_recv() {
                Ok(Event::Resize(..)) => {
                    out.queue(terminal::Clear(terminal::ClearType::All))?;
                },
                Ok(event) => session.handle_event(&event, now),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("Terminal event reader stopped, exiting");
                    session.stop();
                    break;
                },
            }
        }

        for event in session.tick(now.saturating_duration_since(last), now) {
            tracing::debug!(?event, "Game event");
        }
        last = now;
        session.process_audio(audio, settings);

        if session.state() == AppState::Victory {
            return Ok(Outcome::Finished);
        }

        let (cols, rows) = terminal::size()?;
        let mut canvas = display::rasterize(&session.game().frame(), theme, cols, rows);
        if session.game().is_paused() {
            canvas.put_centered(rows / 2, "Paused - press P to resume", theme.banner_text);
        }
        display::draw(out, &canvas)?;

        std::thread::sleep(session.until_next_step().min(MAX_FRAME_SLEEP));
    }
    Ok(Outcome::Quit)
}

/// Drive the whole application: title, play, victory.
pub fn run<W: Write, A: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    game: ShadowSwap,
    config: &TermConfig,
    theme: &Theme,
    audio: &mut AudioManager<A>,
) -> std::io::Result<Outcome> {
    if !show_title(out, rx, &game, theme)? {
        return Ok(Outcome::Quit);
    }

    let mut session = Session::new(game, config);
    let outcome = play(out, rx, &mut session, theme, audio, &config.audio)?;
    if outcome == Outcome::Finished {
        tracing::info!(stats = ?session.game().state().stats, "Run finished");
        show_victory(out, rx, session.game(), theme)?;
    }
    Ok(outcome)
}
