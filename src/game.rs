//! Session state: active piece, movement, drops, locking, phrases, score.

use crate::board::Board;
use crate::content::Tier;
use crate::grid::Cell;
use crate::phrase::{self, PHRASE_BONUS, Phrase};
use crate::piece::{Piece, PieceId, Word};
use crate::shape::ShapeKind;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Game state: board, falling piece, score, phrase log, tier.
#[derive(Debug)]
pub struct GameState {
    board: Board,
    /// Falling piece. Its cells are on the grid, but it is not in the registry.
    active: Option<Piece>,
    score: u32,
    phrases: Vec<Phrase>,
    tier: Tier,
    ended: bool,
    /// Next piece id. Never reset, so ids are unique for the life of the process.
    next_id: u32,
    /// Time of the previous down input; a second one inside `drop_debounce` hard-drops.
    last_down: Option<Instant>,
    drop_debounce: Duration,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: &crate::GameConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let mut state = Self {
            board: Board::new(config.width as usize, config.height as usize),
            active: None,
            score: 0,
            phrases: Vec::new(),
            tier: config.tier,
            ended: false,
            next_id: 1,
            last_down: None,
            drop_debounce: Duration::from_millis(config.drop_debounce_ms),
            rng,
        };
        state.spawn_next();
        state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Completed phrases, oldest first.
    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn width(&self) -> usize {
        self.board.grid.width
    }

    pub fn height(&self) -> usize {
        self.board.grid.height
    }

    pub fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        self.board.grid.cell_at(x, y)
    }

    /// The piece owning the cell at (x, y), falling or locked.
    pub fn piece_at(&self, x: i32, y: i32) -> Option<&Piece> {
        let owner = self.cell_at(x, y)?.owner()?;
        match &self.active {
            Some(piece) if piece.id == owner => Some(piece),
            _ => self.board.piece(owner),
        }
    }

    /// Advance the falling piece one row, or lock it if it cannot move.
    pub fn tick(&mut self) {
        if self.ended || self.active.is_none() {
            return;
        }
        if !self.shift(0, 1) {
            self.lock_active();
        }
    }

    pub fn move_left(&mut self) {
        if !self.ended {
            self.shift(-1, 0);
        }
    }

    pub fn move_right(&mut self) {
        if !self.ended {
            self.shift(1, 0);
        }
    }

    /// Quarter turn. Squares never turn. On success verbs and complements
    /// draw new text.
    pub fn rotate(&mut self) {
        if self.ended {
            return;
        }
        let Some(piece) = self.active.as_mut() else {
            return;
        };
        if piece.shape() == ShapeKind::Square {
            return;
        }
        let next = (piece.rotation + 1) % 4;
        if !self.board.grid.can_move_to(piece, 0, 0, next) {
            return;
        }
        self.board.grid.clear(piece.id);
        piece.rotation = next;
        piece.resample_text(self.tier, &mut self.rng);
        self.board.grid.place(piece);
    }

    /// Down input. A second press within the debounce window hard-drops and
    /// locks; otherwise the piece moves one row if it can.
    pub fn soft_or_hard_drop(&mut self, now: Instant) {
        if self.ended || self.active.is_none() {
            return;
        }
        let double_tap = self
            .last_down
            .is_some_and(|prev| now.saturating_duration_since(prev) < self.drop_debounce);
        if double_tap {
            self.last_down = None;
            self.hard_drop();
        } else {
            self.last_down = Some(now);
            self.shift(0, 1);
        }
    }

    /// Descend until blocked, then lock.
    pub fn hard_drop(&mut self) {
        if self.ended || self.active.is_none() {
            return;
        }
        while self.shift(0, 1) {}
        self.lock_active();
    }

    /// Switch the conjugation pool. A falling verb is redrawn at the new tier.
    pub fn set_tier(&mut self, tier: Tier) {
        self.tier = tier;
        if let Some(piece) = self.active.as_mut() {
            if matches!(piece.word, Word::Verb { .. }) {
                piece.resample_text(tier, &mut self.rng);
            }
        }
        info!(%tier, "tier changed");
    }

    /// Fresh board, score and log; tier, id counter and random source carry over.
    pub fn restart(&mut self) {
        let (width, height) = (self.width(), self.height());
        self.board = Board::new(width, height);
        self.active = None;
        self.score = 0;
        self.phrases.clear();
        self.ended = false;
        self.last_down = None;
        info!("session restarted");
        self.spawn_next();
    }

    /// Move the falling piece by (dx, dy) if legal. Returns whether it moved.
    fn shift(&mut self, dx: i32, dy: i32) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        if !self.board.grid.can_move(piece, dx, dy) {
            return false;
        }
        self.board.grid.clear(piece.id);
        piece.x += dx;
        piece.y += dy;
        self.board.grid.place(piece);
        true
    }

    /// Lock, match phrases, settle, spawn. Matching sees the board as locked,
    /// before gravity runs.
    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        self.board.lock(piece);
        self.resolve_phrases();
        self.board.settle();
        self.spawn_next();
    }

    fn resolve_phrases(&mut self) {
        let matches = phrase::find_phrases(&self.board);
        if matches.is_empty() {
            return;
        }
        let ids: Vec<PieceId> = matches.iter().flat_map(|m| m.ids).collect();
        self.board.remove(&ids);
        for m in matches {
            self.score += PHRASE_BONUS;
            info!(phrase = %m.phrase, score = self.score, "phrase completed");
            self.phrases.push(m.phrase);
        }
    }

    fn spawn_next(&mut self) {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        let x = (self.width() as i32 / 2 - 1).max(0);
        let piece = Piece::random(id, x, 0, self.tier, &mut self.rng);
        if !self.board.grid.can_move(&piece, 0, 0) {
            self.ended = true;
            self.active = None;
            info!(score = self.score, phrases = self.phrases.len(), "spawn blocked, game over");
            return;
        }
        self.board.grid.place(&piece);
        debug!(id = %piece.id, text = %piece.text, "piece spawned");
        self.active = Some(piece);
    }
}
