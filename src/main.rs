//! Frasetris — falling-block Spanish grammar puzzle in the terminal.

mod app;
mod board;
mod content;
mod game;
mod grid;
mod input;
mod phrase;
mod piece;
mod shape;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use content::Tier;
use std::path::PathBuf;
use thiserror::Error;

/// Options derived from CLI that affect game behaviour (board size, timing, word pool).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub tick_ms: u64,
    pub drop_debounce_ms: u64,
    pub tier: Tier,
    pub seed: Option<u64>,
}

/// Smallest board that still fits every piece in every rotation.
const MIN_BOARD_SIDE: u16 = 4;
/// Largest board side accepted; beyond this no terminal can show it.
const MAX_BOARD_SIDE: u16 = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board must be at least {min}x{min}, got {width}x{height}")]
    BoardTooSmall { width: u16, height: u16, min: u16 },
    #[error("board must be at most {max}x{max}, got {width}x{height}")]
    BoardTooLarge { width: u16, height: u16, max: u16 },
    #[error("tick interval must be greater than zero")]
    ZeroTick,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_BOARD_SIDE || self.height < MIN_BOARD_SIDE {
            return Err(ConfigError::BoardTooSmall {
                width: self.width,
                height: self.height,
                min: MIN_BOARD_SIDE,
            });
        }
        if self.width > MAX_BOARD_SIDE || self.height > MAX_BOARD_SIDE {
            return Err(ConfigError::BoardTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_BOARD_SIDE,
            });
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        Ok(())
    }
}

impl From<&Args> for GameConfig {
    fn from(args: &Args) -> Self {
        Self {
            width: args.width,
            height: args.height,
            tick_ms: args.tick_ms,
            drop_debounce_ms: args.drop_debounce_ms,
            tier: args.tier,
            seed: args.seed,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.clone())?;
    let config = GameConfig::from(&args);
    config.validate()?;
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|err| {
        tracing::warn!(%err, "theme not loaded, using defaults");
        theme::Theme::default_for_palette(args.palette)
    });
    tracing::info!(
        width = config.width,
        height = config.height,
        tier = %config.tier,
        seed = ?config.seed,
        "starting"
    );
    let mut app = App::new(config, theme);
    app.run()?;
    Ok(())
}

/// Log to a file; stdout belongs to the terminal UI.
fn init_logging(path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| std::env::temp_dir().join("frasetris.log"));
    let file = std::fs::File::create(&path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Falling-block puzzle: stack pronoun, verb and complement pieces into Spanish sentences.
#[derive(Debug, Parser)]
#[command(
    name = "frasetris",
    version,
    about = "Falling-block grammar puzzle in the terminal. Stack a pronoun, a verb and a complement so they touch in that order to build a sentence.",
    long_about = "Frasetris is a terminal puzzle game for practising Spanish.\n\n\
        Square pieces carry pronouns, bars carry verbs, L pieces carry complements. \
        When a pronoun touches a verb that touches a complement, the three form a \
        sentence, vanish and score 100 points; pieces above fall into the gap.\n\n\
        CONTROLS (normal):\n  Left/Right  Move    Up        Rotate      Down       Drop (tap twice: hard drop)\n  Enter/Space Hard drop   T          Next tier   R          Restart\n  P           Pause       Q / Esc    Quit\n\n\
        CONTROLS (vim):\n  h/l         Move    k or i     Rotate      j          Drop"
)]
pub struct Args {
    /// Conjugation tier verb pieces are drawn from.
    #[arg(short, long, default_value = "basic")]
    pub tier: Tier,

    /// Board width in columns.
    #[arg(long, default_value = "10", value_name = "COLS")]
    pub width: u16,

    /// Board height in rows.
    #[arg(long, default_value = "20", value_name = "ROWS")]
    pub height: u16,

    /// Milliseconds between gravity ticks.
    #[arg(long, default_value = "700", value_name = "MS")]
    pub tick_ms: u64,

    /// Two down presses closer than this many milliseconds hard-drop the piece.
    #[arg(long, default_value = "250", value_name = "MS")]
    pub drop_debounce_ms: u64,

    /// Seed for the piece generator (random if not set).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Log file (defaults to frasetris.log in the temp directory). Filter with RUST_LOG.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("frasetris").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_classic_board() {
        let config = GameConfig::from(&parse(&[]));
        assert_eq!((config.width, config.height), (10, 20));
        assert_eq!(config.tick_ms, 700);
        assert_eq!(config.drop_debounce_ms, 250);
        assert_eq!(config.tier, Tier::Basic);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn spanish_tier_names_are_accepted() {
        assert_eq!(parse(&["--tier", "avanzado"]).tier, Tier::Advanced);
        assert_eq!(parse(&["-t", "medio"]).tier, Tier::Intermediate);
    }

    #[test]
    fn tiny_board_is_rejected() {
        let config = GameConfig::from(&parse(&["--width", "3"]));
        assert_eq!(
            config.validate(),
            Err(ConfigError::BoardTooSmall {
                width: 3,
                height: 20,
                min: MIN_BOARD_SIDE
            })
        );
    }

    #[test]
    fn huge_board_is_rejected() {
        let config = GameConfig::from(&parse(&["--width", "30000"]));
        assert_eq!(
            config.validate(),
            Err(ConfigError::BoardTooLarge {
                width: 30000,
                height: 20,
                max: MAX_BOARD_SIDE
            })
        );
        let config = GameConfig::from(&parse(&["--width", "64", "--height", "64"]));
        assert_eq!(config.validate(), Ok(()));
        let config = GameConfig::from(&parse(&["--height", "65"]));
        assert!(matches!(config.validate(), Err(ConfigError::BoardTooLarge { .. })));
    }

    #[test]
    fn zero_tick_is_rejected() {
        let config = GameConfig::from(&parse(&["--tick-ms", "0"]));
        assert_eq!(config.validate(), Err(ConfigError::ZeroTick));
    }
}
