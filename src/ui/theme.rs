//! Color themes
//!
//! The theme is an explicit store handed to whoever draws: `get`, `set`,
//! `toggle` and `subscribe` over a `tokio::sync::watch` channel. Nothing
//! is persisted between runs.

use ratatui::style::Color;
use tokio::sync::watch;

/// Requested theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    Dark,
    /// Follow the terminal background
    #[default]
    System,
}

/// Theme after resolving `System`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

impl Theme {
    /// Resolve against the terminal's `COLORFGBG` hint
    pub fn resolve(self) -> ResolvedTheme {
        match self {
            Self::Light => ResolvedTheme::Light,
            Self::Dark => ResolvedTheme::Dark,
            Self::System => resolve_colorfgbg(std::env::var("COLORFGBG").ok().as_deref()),
        }
    }
}

/// Guess light/dark from a `COLORFGBG` value such as `15;0`.
///
/// Background indexes 0-6 and 8 are dark; unknown defaults to dark.
pub fn resolve_colorfgbg(value: Option<&str>) -> ResolvedTheme {
    let background = value
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());

    match background {
        Some(bg) if bg == 7 || bg >= 9 => ResolvedTheme::Light,
        _ => ResolvedTheme::Dark,
    }
}

/// Colors used by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub accent: Color,
    pub muted: Color,
    pub border: Color,
    pub success: Color,
    pub error: Color,
    pub highlight_bg: Color,
}

impl ResolvedTheme {
    pub fn palette(self) -> Palette {
        match self {
            Self::Dark => Palette {
                fg: Color::White,
                bg: Color::Reset,
                accent: Color::Cyan,
                muted: Color::DarkGray,
                border: Color::Gray,
                success: Color::Green,
                error: Color::Red,
                highlight_bg: Color::Rgb(40, 48, 64),
            },
            Self::Light => Palette {
                fg: Color::Black,
                bg: Color::White,
                accent: Color::Blue,
                muted: Color::Gray,
                border: Color::DarkGray,
                success: Color::Rgb(0, 120, 60),
                error: Color::Rgb(180, 20, 20),
                highlight_bg: Color::Rgb(220, 230, 245),
            },
        }
    }

    fn opposite(self) -> Theme {
        match self {
            Self::Dark => Theme::Light,
            Self::Light => Theme::Dark,
        }
    }
}

/// Observable theme holder
#[derive(Debug)]
pub struct ThemeStore {
    tx: watch::Sender<Theme>,
}

impl ThemeStore {
    pub fn new(theme: Theme) -> Self {
        let (tx, _rx) = watch::channel(theme);
        Self { tx }
    }

    /// Current requested theme
    pub fn get(&self) -> Theme {
        *self.tx.borrow()
    }

    /// Replace the theme, notifying subscribers
    pub fn set(&self, theme: Theme) {
        self.tx.send_replace(theme);
    }

    /// Flip between light and dark based on what is shown now
    pub fn toggle(&self) -> Theme {
        let next = self.get().resolve().opposite();
        self.set(next);
        next
    }

    /// Receive theme changes
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.tx.subscribe()
    }

    /// Palette for the current theme
    pub fn palette(&self) -> Palette {
        self.get().resolve().palette()
    }
}

impl Default for ThemeStore {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}
