//! Layout and drawing: board with piece words, sidebar, pause and game-over overlays.

use crate::app::Screen;
use crate::content::Tier;
use crate::game::GameState;
use crate::grid::Cell;
use crate::piece::Word;
use crate::shape::ShapeKind;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::time::{Duration, Instant};
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Terminal columns per board cell; words need the room.
const CELL_WIDTH: u16 = 3;
const SIDEBAR_WIDTH: u16 = 30;
/// Fade of the newest phrase from highlight back to normal text.
const PHRASE_FLASH_MS: u32 = 900;

/// Board size in terminal cells, border included. Saturates, so an oversized
/// board just fails the fit check.
fn board_outer_size(state: &GameState) -> (u16, u16) {
    let cols = u16::try_from(state.width()).unwrap_or(u16::MAX);
    let rows = u16::try_from(state.height()).unwrap_or(u16::MAX);
    (
        cols.saturating_mul(CELL_WIDTH).saturating_add(2),
        rows.saturating_add(2),
    )
}

/// Highlight on the newest phrase in the log. The app reports the phrase
/// count each frame; the effect is built on the next draw, once the target
/// line is known.
#[derive(Default)]
pub struct PhraseFlash {
    effect: Option<Effect>,
    last_frame: Option<Instant>,
    pending: bool,
    seen: usize,
}

impl PhraseFlash {
    /// Arm on growth. A shrink (restart) only resyncs the count.
    pub fn observe(&mut self, phrase_count: usize) {
        if phrase_count > self.seen {
            self.pending = true;
            self.effect = None;
        }
        self.seen = phrase_count;
    }

    fn is_active(&self) -> bool {
        self.pending || self.effect.is_some()
    }
}

/// Draw the session. Overlays go over the board only, so the phrase log stays readable.
pub fn draw(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    screen: Screen,
    paused: bool,
    flash: &mut PhraseFlash,
    now: Instant,
) {
    let area = frame.area();
    let (bw, bh) = board_outer_size(state);
    let total_w = bw.saturating_add(SIDEBAR_WIDTH);
    if area.width < total_w || area.height < bh {
        draw_too_small(frame, theme, area, total_w, bh);
        return;
    }

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(bh), Constraint::Fill(1)])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(bw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);
    let (board_area, sidebar_area) = (inner[0], inner[1]);

    draw_board(frame, state, theme, board_area);
    if let Some(newest) = draw_sidebar(frame, state, theme, sidebar_area, flash.is_active()) {
        apply_phrase_flash(frame, theme, flash, newest, now);
    }

    match screen {
        Screen::GameOver => draw_game_over(frame, state, theme, board_area),
        Screen::Playing if paused => draw_pause_overlay(frame, theme, board_area),
        Screen::Playing => {}
    }
}

fn draw_too_small(frame: &mut Frame, theme: &Theme, area: Rect, need_w: u16, need_h: u16) {
    let lines = vec![
        Line::from(Span::styled(
            "Terminal too small",
            Style::default().fg(theme.title),
        )),
        Line::from(Span::styled(
            format!("need {need_w}x{need_h}, have {}x{}", area.width, area.height),
            Style::default().fg(theme.main_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, frame.buffer_mut());
}

fn draw_board(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" Frasetris ", Style::default().fg(theme.title)));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let buf = frame.buffer_mut();
    let active = state.active().map(|p| p.id);

    for y in 0..state.height() as i32 {
        for x in 0..state.width() as i32 {
            let rx = inner.x + x as u16 * CELL_WIDTH;
            let ry = inner.y + y as u16;
            let bg = state
                .piece_at(x, y)
                .map_or(theme.bg, |p| theme.piece_color(p.shape()));
            for dx in 0..CELL_WIDTH {
                if rx + dx < inner.right() && ry < inner.bottom() {
                    let symbol = if dx == 1 && bg == theme.bg { "·" } else { " " };
                    buf[(rx + dx, ry)]
                        .set_symbol(symbol)
                        .set_style(Style::default().fg(theme.div_line).bg(bg));
                }
            }
        }
    }

    // Words go on after every cell so neighbours don't paint over them.
    // A word may run past its piece; it is clipped at the right wall.
    for y in 0..state.height() as i32 {
        for x in 0..state.width() as i32 {
            let Some(Cell::Occupied {
                show_text: true, ..
            }) = state.cell_at(x, y)
            else {
                continue;
            };
            let Some(piece) = state.piece_at(x, y) else {
                continue;
            };
            let ry = inner.y + y as u16;
            let mut rx = inner.x + x as u16 * CELL_WIDTH;
            let modifier = if Some(piece.id) == active {
                Modifier::BOLD
            } else {
                Modifier::empty()
            };
            for ch in piece.text.chars() {
                if rx >= inner.right() {
                    break;
                }
                let gx = ((rx - inner.x) / CELL_WIDTH) as i32;
                let on_piece = matches!(state.cell_at(gx, y), Some(Cell::Occupied { .. }));
                let fg = if on_piece { theme.piece_fg } else { theme.main_fg };
                buf[(rx, ry)]
                    .set_char(ch)
                    .set_fg(fg)
                    .set_style(Style::default().add_modifier(modifier));
                rx += 1;
            }
        }
    }
}

fn section(title: &str, theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(format!(" {title} "), Style::default().fg(theme.title)))
}

fn word_class(word: &Word) -> String {
    match word {
        Word::Pronoun => "pronoun".to_string(),
        Word::Verb { verb, .. } => format!("verb ({})", verb.infinitive),
        Word::Complement { .. } => "complement".to_string(),
    }
}

/// All tiers, the current one highlighted.
fn tier_line(current: Tier, theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::styled("Tier ", Style::default().fg(theme.title))];
    for (i, tier) in Tier::ALL.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if tier == current {
            Style::default()
                .fg(theme.main_fg)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme.div_line)
        };
        spans.push(Span::styled(tier.to_string(), style));
    }
    Line::from(spans)
}

/// Colour key: one swatch per shape.
fn legend_line(theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    for (shape, name) in ShapeKind::ALL.into_iter().zip(["pron", "verb", "comp"]) {
        spans.push(Span::styled("■ ", Style::default().fg(theme.piece_color(shape))));
        spans.push(Span::styled(format!("{name} "), Style::default().fg(theme.main_fg)));
    }
    Line::from(spans)
}

/// Returns the rect of the newest phrase line, if the log has one.
fn draw_sidebar(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    area: Rect,
    highlight_newest: bool,
) -> Option<Rect> {
    let label = Style::default().fg(theme.title);
    let fg = Style::default().fg(theme.main_fg);
    let dim = Style::default().fg(theme.div_line);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // score, tier, phrases
            Constraint::Length(5), // falling piece, legend
            Constraint::Fill(1),   // phrase log
            Constraint::Length(7), // controls
        ])
        .split(area);

    let stats = section("Score", theme);
    let stats_inner = stats.inner(chunks[0]);
    stats.render(chunks[0], frame.buffer_mut());
    Paragraph::new(Text::from(vec![
        Line::from(vec![
            Span::styled("Score:   ", label),
            Span::styled(state.score().to_string(), fg),
        ]),
        tier_line(state.tier(), theme),
        Line::from(vec![
            Span::styled("Phrases: ", label),
            Span::styled(state.phrases().len().to_string(), fg),
        ]),
    ]))
    .render(stats_inner, frame.buffer_mut());

    let falling = section("Falling", theme);
    let falling_inner = falling.inner(chunks[1]);
    falling.render(chunks[1], frame.buffer_mut());
    let falling_lines = match state.active() {
        Some(piece) => vec![
            Line::from(Span::styled(
                piece.text.clone(),
                Style::default()
                    .fg(theme.piece_color(piece.shape()))
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(word_class(&piece.word), dim)),
            legend_line(theme),
        ],
        None => vec![Line::from(Span::styled("-", dim)), Line::from(""), legend_line(theme)],
    };
    Paragraph::new(falling_lines).render(falling_inner, frame.buffer_mut());

    let log = section("Phrases", theme);
    let log_inner = log.inner(chunks[2]);
    log.render(chunks[2], frame.buffer_mut());
    let newest_style = if highlight_newest {
        Style::default()
            .fg(theme.piece_fg)
            .bg(theme.title)
            .add_modifier(Modifier::BOLD)
    } else {
        fg
    };
    let log_lines: Vec<Line> = state
        .phrases()
        .iter()
        .rev()
        .take(log_inner.height as usize)
        .enumerate()
        .map(|(i, phrase)| {
            let style = if i == 0 { newest_style } else { fg };
            Line::from(Span::styled(phrase.to_string(), style))
        })
        .collect();
    let newest = (!log_lines.is_empty() && log_inner.height > 0).then(|| Rect {
        height: 1,
        ..log_inner
    });
    if log_lines.is_empty() {
        Paragraph::new(Line::from(Span::styled("pronoun → verb → complement", dim)))
            .render(log_inner, frame.buffer_mut());
    } else {
        Paragraph::new(log_lines).render(log_inner, frame.buffer_mut());
    }

    let controls = section("Controls", theme);
    let controls_inner = controls.inner(chunks[3]);
    controls.render(chunks[3], frame.buffer_mut());
    Paragraph::new(Text::from(vec![
        Line::from(Span::styled("←/→ h/l   move", fg)),
        Line::from(Span::styled("↑ k       rotate", fg)),
        Line::from(Span::styled("↓ j       drop (x2: hard)", fg)),
        Line::from(Span::styled("t tier  r restart", fg)),
        Line::from(Span::styled("p pause  q quit", fg)),
    ]))
    .render(controls_inner, frame.buffer_mut());

    newest
}

fn apply_phrase_flash(
    frame: &mut Frame,
    theme: &Theme,
    flash: &mut PhraseFlash,
    area: Rect,
    now: Instant,
) {
    if flash.pending {
        flash.pending = false;
        flash.last_frame = None;
        flash.effect = Some(
            fx::fade_to(
                theme.main_fg,
                theme.bg,
                (PHRASE_FLASH_MS, Interpolation::Linear),
            )
            .with_area(area),
        );
    }
    let delta = flash
        .last_frame
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    flash.last_frame = Some(now);

    if let Some(effect) = flash.effect.as_mut() {
        frame.render_effect(effect, area, TfxDuration::from_millis(delta_ms));
        if effect.done() {
            flash.effect = None;
            flash.last_frame = None;
        }
    }
}

fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered_popup(area, 24, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(theme.piece_fg).bg(theme.bar),
        )),
        Line::from(Span::styled(
            " P resume  Q quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(popup, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let popup = centered_popup(area, 26, 9);
    let fg = Style::default().fg(theme.main_fg);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game over ",
            Style::default().fg(theme.piece_fg).bg(theme.hook),
        )),
        Line::from(""),
        Line::from(Span::styled(format!(" Score: {} ", state.score()), fg)),
        Line::from(Span::styled(
            format!(" Phrases: {} ", state.phrases().len()),
            fg,
        )),
        Line::from(Span::styled(
            format!(" Pieces left: {} ", state.board().pieces().count()),
            fg,
        )),
        Line::from(Span::styled(" R restart  Q quit ", fg)),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(popup, frame.buffer_mut());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn state(width: u16, height: u16) -> GameState {
        GameState::new(&GameConfig {
            width,
            height,
            tick_ms: 700,
            drop_debounce_ms: 250,
            tier: Tier::Intermediate,
            seed: Some(7),
        })
    }

    fn render(state: &GameState, screen: Screen, paused: bool, cols: u16, rows: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(cols, rows)).unwrap();
        let mut flash = PhraseFlash::default();
        terminal
            .draw(|f| draw(f, state, &Theme::default(), screen, paused, &mut flash, Instant::now()))
            .unwrap();
        let buf = terminal.backend().buffer();
        (0..rows)
            .map(|y| (0..cols).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect()
    }

    fn contains(rows: &[String], needle: &str) -> bool {
        rows.iter().any(|row| row.contains(needle))
    }

    #[test]
    fn sidebar_shows_score_tier_and_falling_word() {
        let state = state(10, 20);
        let rows = render(&state, Screen::Playing, false, 80, 24);
        assert!(contains(&rows, "Score:   0"));
        assert!(contains(&rows, "medio"));
        let text = &state.active().unwrap().text;
        assert!(contains(&rows, text));
    }

    #[test]
    fn falling_word_is_drawn_on_the_board() {
        let state = state(10, 20);
        let rows = render(&state, Screen::Playing, false, 80, 24);
        let first_word = state.active().unwrap().text.split(' ').next().unwrap().to_string();
        // spawn row is the first row inside the border
        let top_row = rows.iter().find(|r| r.contains("Frasetris")).unwrap();
        let index = rows.iter().position(|r| r == top_row).unwrap();
        assert!(rows[index + 1].contains(&first_word));
    }

    #[test]
    fn small_terminal_gets_a_notice() {
        let rows = render(&state(10, 20), Screen::Playing, false, 40, 10);
        assert!(contains(&rows, "Terminal too small"));
    }

    #[test]
    fn oversized_board_gets_a_notice_instead_of_overflowing() {
        let rows = render(&state(30000, 20), Screen::Playing, false, 80, 24);
        assert!(contains(&rows, "Terminal too small"));
    }

    #[test]
    fn overlays_follow_screen() {
        let state = state(10, 20);
        assert!(contains(&render(&state, Screen::Playing, true, 80, 24), "Paused"));
        let over = render(&state, Screen::GameOver, false, 80, 24);
        assert!(contains(&over, "Game over"));
        assert!(!contains(&over, "Paused"));
    }

    #[test]
    fn flash_arms_on_growth_only() {
        let mut flash = PhraseFlash::default();
        flash.observe(0);
        assert!(!flash.is_active());
        flash.observe(2);
        assert!(flash.is_active());
        flash.pending = false;
        flash.observe(0);
        assert!(!flash.is_active());
    }
}
