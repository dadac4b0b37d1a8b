//! App: terminal init, main loop, gravity tick and key handling.

use crate::GameConfig;
use crate::game::GameState;
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, PhraseFlash};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tracing::info;

/// Redraw cadence while waiting for input (~60 FPS, keeps the phrase fade smooth).
const FRAME_MS: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
}

pub struct App {
    theme: Theme,
    state: GameState,
    screen: Screen,
    paused: bool,
    tick_interval: Duration,
    last_tick: Instant,
    flash: PhraseFlash,
}

/// What the loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        Self {
            theme,
            state: GameState::new(&config),
            screen: Screen::Playing,
            paused: false,
            tick_interval: Duration::from_millis(config.tick_ms),
            last_tick: Instant::now(),
            flash: PhraseFlash::default(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;
        info!(score = self.state.score(), phrases = self.state.phrases().len(), "exiting");

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            self.flash.observe(self.state.phrases().len());
            terminal.draw(|f| {
                ui::draw(
                    f,
                    &self.state,
                    &self.theme,
                    self.screen,
                    self.paused,
                    &mut self.flash,
                    now,
                )
            })?;

            let frame = Duration::from_millis(FRAME_MS);
            let timeout = if self.ticking() {
                frame.min(self.tick_interval.saturating_sub(self.last_tick.elapsed()))
            } else {
                frame
            };
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    let Event::Key(key) = event::read()? else {
                        continue;
                    };
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle(key_to_action(key), Instant::now()) == Flow::Exit {
                        return Ok(());
                    }
                }
            }

            if self.ticking() && self.last_tick.elapsed() >= self.tick_interval {
                self.last_tick = Instant::now();
                self.state.tick();
            }
            self.sync_screen();
        }
    }

    /// Gravity runs only while a session is live and not paused.
    fn ticking(&self) -> bool {
        self.screen == Screen::Playing && !self.paused
    }

    fn sync_screen(&mut self) {
        if self.screen == Screen::Playing && self.state.is_ended() {
            info!(score = self.state.score(), "game over");
            self.screen = Screen::GameOver;
            self.paused = false;
        }
    }

    fn handle(&mut self, action: Action, now: Instant) -> Flow {
        match (self.screen, action) {
            (_, Action::Quit) => return Flow::Exit,
            (_, Action::Restart) => {
                self.state.restart();
                self.screen = Screen::Playing;
                self.paused = false;
                self.last_tick = now;
            }
            (_, Action::CycleTier) => self.state.set_tier(self.state.tier().cycle()),
            (Screen::Playing, Action::Pause) => {
                self.paused = !self.paused;
                // resume with a full interval before the next fall
                self.last_tick = now;
            }
            (Screen::Playing, _) if self.paused => {}
            (Screen::Playing, Action::MoveLeft) => self.state.move_left(),
            (Screen::Playing, Action::MoveRight) => self.state.move_right(),
            (Screen::Playing, Action::Rotate) => self.state.rotate(),
            (Screen::Playing, Action::Drop) => self.state.soft_or_hard_drop(now),
            (Screen::Playing, Action::HardDrop) => self.state.hard_drop(),
            _ => {}
        }
        self.sync_screen();
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Tier;

    fn app() -> App {
        App::new(
            GameConfig {
                width: 10,
                height: 20,
                tick_ms: 700,
                drop_debounce_ms: 250,
                tier: Tier::Basic,
                seed: Some(99),
            },
            Theme::default(),
        )
    }

    #[test]
    fn paused_session_ignores_moves() {
        let mut app = app();
        let x = app.state.active().unwrap().x;
        app.handle(Action::Pause, Instant::now());
        assert!(app.paused && !app.ticking());
        app.handle(Action::MoveLeft, Instant::now());
        assert_eq!(app.state.active().unwrap().x, x);
        app.handle(Action::Pause, Instant::now());
        app.handle(Action::MoveLeft, Instant::now());
        assert_eq!(app.state.active().unwrap().x, x - 1);
    }

    #[test]
    fn tier_key_cycles_tier() {
        let mut app = app();
        app.handle(Action::CycleTier, Instant::now());
        assert_eq!(app.state.tier(), Tier::Intermediate);
    }

    #[test]
    fn quit_exits_from_any_screen() {
        let mut app = app();
        assert_eq!(app.handle(Action::Quit, Instant::now()), Flow::Exit);
        app.screen = Screen::GameOver;
        assert_eq!(app.handle(Action::Quit, Instant::now()), Flow::Exit);
    }

    #[test]
    fn filling_the_board_reaches_game_over_and_restart_recovers() {
        let mut app = app();
        for _ in 0..500 {
            if app.screen == Screen::GameOver {
                break;
            }
            app.handle(Action::HardDrop, Instant::now());
        }
        assert_eq!(app.screen, Screen::GameOver);
        assert!(!app.ticking());
        // moves are ignored once the session is over
        app.handle(Action::MoveLeft, Instant::now());
        app.handle(Action::Restart, Instant::now());
        assert_eq!(app.screen, Screen::Playing);
        assert_eq!(app.state.score(), 0);
        assert!(app.state.active().is_some());
    }
}
