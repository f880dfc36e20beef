use std::fs::OpenOptions;
use std::io::{BufWriter, stdout};
use std::sync::{Mutex, mpsc};
use std::thread;

use crossterm::event::{
    self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::{ExecutableCommand, cursor, terminal};
use tracing_subscriber::EnvFilter;

use shadow_swap::ShadowSwap;
use shadow_swap::config::ShadowSwapConfig;
use shadowswap_term::app::{self, Outcome};
use shadowswap_term::audio::AudioManager;
use shadowswap_term::config::TermConfig;
use shadowswap_term::theme::Theme;

/// The terminal belongs to the game, so logs go to a file. Without one the
/// run is unlogged.
fn init_logging(path: &str) {
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot open log file {path}: {e}, logging disabled");
            return;
        },
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn main() -> std::io::Result<()> {
    let term_config = TermConfig::load();
    init_logging(&term_config.log_path);
    tracing::info!("Shadow Swap starting");

    let game = ShadowSwap::from_config(ShadowSwapConfig::load());
    let theme = Theme::load(term_config.theme_path.as_deref());
    let mut audio = if term_config.audio.muted {
        AudioManager::silent()
    } else {
        AudioManager::new(stdout())
    };

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Release events where the terminal supports them; others only repeat.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the frame loop never waits.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = app::run(&mut out, &rx, game, &term_config, &theme, &mut audio);

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    match result {
        Ok(Outcome::Finished) => tracing::info!("Campaign finished, exiting"),
        Ok(Outcome::Quit) => tracing::info!("Player quit"),
        Err(ref e) => tracing::error!("Terminal error: {e}"),
    }
    result.map(|_| ())
}
