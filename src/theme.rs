//! Theme loading: btop-style `theme[key]="value"` files and hex → ratatui Color.
//! Each piece shape gets its own colour so word classes stay recognisable.

use crate::Palette;
use crate::shape::ShapeKind;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Board, piece and sidebar colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Pronoun squares.
    pub square: Color,
    /// Verb bars.
    pub bar: Color,
    /// Complement hooks.
    pub hook: Color,
    /// Board background.
    pub bg: Color,
    /// Borders and empty-cell dots.
    pub div_line: Color,
    pub main_fg: Color,
    /// Titles and the flash on a fresh phrase.
    pub title: Color,
    /// Text printed on top of piece cells.
    pub piece_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("reading theme file: {0}")]
    Io(#[from] std::io::Error),
    #[error("theme file not found: {0}")]
    Missing(String),
    #[error("invalid hex colour: {0:?}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark()
    }
}

impl Theme {
    /// One Dark values (blue, yellow and magenta pieces on meter_bg).
    pub fn onedark() -> Self {
        Self {
            square: Color::Rgb(0x61, 0xAF, 0xEF),
            bar: Color::Rgb(0xE5, 0xC0, 0x7B),
            hook: Color::Rgb(0xC6, 0x78, 0xDD),
            bg: Color::Rgb(0x31, 0x35, 0x3F),
            div_line: Color::Rgb(0x3F, 0x44, 0x4F),
            main_fg: Color::Rgb(0xAB, 0xB2, 0xBF),
            title: Color::Rgb(0x98, 0xC3, 0x79),
            piece_fg: Color::Rgb(0x28, 0x2C, 0x34),
        }
    }

    /// Read a theme file and apply `palette` on top. A path that does not
    /// exist is an error so the caller can log it before falling back.
    pub fn load(path: Option<&Path>, palette: Palette) -> Result<Self, ThemeError> {
        let Some(path) = path else {
            return Ok(Self::default_for_palette(palette));
        };
        if !path.exists() {
            return Err(ThemeError::Missing(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        let mut theme = Self::from_map(&parse_theme_file(&text));
        theme.apply_palette(palette);
        Ok(theme)
    }

    pub fn default_for_palette(palette: Palette) -> Self {
        let mut theme = Self::onedark();
        theme.apply_palette(palette);
        theme
    }

    /// Replace piece colours for the accessibility palettes. UI colours stay.
    pub fn apply_palette(&mut self, palette: Palette) {
        let (square, bar, hook) = match palette {
            Palette::Normal => return,
            Palette::HighContrast => (
                Color::Rgb(0x00, 0x88, 0xFF),
                Color::Rgb(0xFF, 0xFF, 0x00),
                Color::Rgb(0xFF, 0x00, 0xFF),
            ),
            // Paul Tol's bright set: blue, orange, teal
            Palette::Colorblind => (
                Color::Rgb(0x00, 0x77, 0xBB),
                Color::Rgb(0xEE, 0x77, 0x33),
                Color::Rgb(0x00, 0x99, 0x88),
            ),
        };
        self.square = square;
        self.bar = bar;
        self.hook = hook;
        if palette == Palette::HighContrast {
            self.piece_fg = Color::Black;
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |keys: &[&str]| keys.iter().find_map(|k| map.get(*k).and_then(|v| parse_hex(v).ok()));
        let base = Self::onedark();
        Self {
            square: get(&["cpu_box", "hi_fg"]).unwrap_or(base.square),
            bar: get(&["cpu_mid", "title"]).unwrap_or(base.bar),
            hook: get(&["net_box", "proc_misc"]).unwrap_or(base.hook),
            bg: get(&["meter_bg", "main_bg"]).unwrap_or(base.bg),
            div_line: get(&["div_line"]).unwrap_or(base.div_line),
            main_fg: get(&["main_fg"]).unwrap_or(base.main_fg),
            title: get(&["mem_box", "cpu_start"]).unwrap_or(base.title),
            piece_fg: get(&["selected_fg"]).unwrap_or(base.piece_fg),
        }
    }

    pub fn piece_color(&self, shape: ShapeKind) -> Color {
        match shape {
            ShapeKind::Square => self.square,
            ShapeKind::Bar => self.bar,
            ShapeKind::Hook => self.hook,
        }
    }
}

/// Parse btop-style theme file into key -> value map. Comments and blank
/// values are skipped; quotes around values are stripped.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    s.lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| {
            let rest = line.strip_prefix("theme[")?;
            let (key, rest) = rest.split_once(']')?;
            let (_, value) = rest.split_once('=')?;
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (!value.is_empty()).then(|| (key.trim().to_string(), value.to_string()))
        })
        .collect()
}

/// Parse "#RRGGBB" or "#RGB" into an RGB colour.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let digits = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>, scale: u8| {
        digits
            .get(range)
            .and_then(|d| u8::from_str_radix(d, 16).ok())
            .map(|v| v * scale)
            .ok_or_else(invalid)
    };
    match digits.len() {
        6 => Ok(Color::Rgb(channel(0..2, 1)?, channel(2..4, 1)?, channel(4..6, 1)?)),
        3 => Ok(Color::Rgb(channel(0..1, 17)?, channel(1..2, 17)?, channel(2..3, 17)?)),
        _ => Err(invalid()),
    }
}
