use std::io::Write;

use serde::{Deserialize, Serialize};

use shadowswap_core::events::GameEvent;

/// Sound cues the game can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    KeyCollected,
    EnemyHit,
    Jump,
    LevelComplete,
}

impl AudioEvent {
    pub fn from_game_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::KeyCollected { .. } => Some(Self::KeyCollected),
            GameEvent::EnemyHit => Some(Self::EnemyHit),
            GameEvent::Jumped => Some(Self::Jump),
            GameEvent::LevelComplete { .. } => Some(Self::LevelComplete),
            GameEvent::PlayerFell
            | GameEvent::WorldSwitched { .. }
            | GameEvent::LevelStarted { .. }
            | GameEvent::CampaignComplete => None,
        }
    }

    /// Relative loudness of the cue before the volume settings apply.
    fn loudness(self) -> f32 {
        match self {
            Self::KeyCollected => 0.6,
            Self::EnemyHit => 1.0,
            Self::Jump => 0.2,
            Self::LevelComplete => 1.0,
        }
    }
}

/// Queue of audio events to be processed each frame.
#[derive(Debug, Default)]
pub struct AudioEventQueue {
    events: Vec<AudioEvent>,
}

impl AudioEventQueue {
    pub fn push(&mut self, event: AudioEvent) {
        self.events.push(event);
    }

    /// Queue the cue for `event`, if it has one.
    pub fn push_game_event(&mut self, event: &GameEvent) {
        if let Some(cue) = AudioEvent::from_game_event(event) {
            self.push(cue);
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn process<W: Write>(&mut self, manager: &mut AudioManager<W>, settings: &AudioSettings) {
        for event in self.events.drain(..) {
            if settings.muted {
                continue;
            }
            let final_vol = settings.master_volume * settings.game_volume * event.loudness();
            if final_vol > AUDIBLE_THRESHOLD {
                manager.play(event);
            }
        }
    }
}

/// Cues quieter than this are skipped.
const AUDIBLE_THRESHOLD: f32 = 0.05;

/// Audio settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub master_volume: f32,
    pub game_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.5,
            game_volume: 0.7,
            muted: false,
        }
    }
}

/// Plays cues through the terminal bell. A failed write disables the
/// backend for the rest of the run.
pub struct AudioManager<W: Write> {
    sink: Option<W>,
    played: usize,
}

impl<W: Write> AudioManager<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink: Some(sink),
            played: 0,
        }
    }

    /// A backend that never makes a sound.
    pub fn silent() -> Self {
        Self {
            sink: None,
            played: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Number of cues actually played.
    pub fn played(&self) -> usize {
        self.played
    }

    pub fn play(&mut self, event: AudioEvent) {
        let Some(sink) = &mut self.sink else {
            return;
        };
        match sink.write_all(b"\x07").and_then(|()| sink.flush()) {
            Ok(()) => {
                self.played += 1;
                tracing::trace!(?event, "Played cue");
            },
            Err(e) => {
                tracing::warn!("Audio backend failed: {e}, disabling audio");
                self.sink = None;
            },
        }
    }
}
