//! Terminal frontend: input, rendering, audio cues and the frame loop.

pub mod app;
pub mod audio;
pub mod config;
pub mod display;
pub mod input;
pub mod theme;
