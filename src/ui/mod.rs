//! Interactive terminal dashboard
//!
//! - [`app`]: state machine driven by keys and finished requests
//! - [`render`]: ratatui drawing
//! - [`theme`]: light/dark palettes behind an observable store
//! - [`tui`]: terminal setup and the event loop

pub mod app;
pub mod render;
pub mod theme;
pub mod tui;

pub use app::{App, AppEvent, Effect, Screen};
pub use theme::{Palette, ResolvedTheme, Theme, ThemeStore};
pub use tui::run;
