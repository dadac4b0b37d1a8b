//! Resting pieces: the grid plus a registry of locked pieces keyed by id, and
//! the gravity pass that lets them fall after a lock.

use crate::grid::Grid;
use crate::piece::{Piece, PieceId};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Board {
    pub grid: Grid,
    /// Locked pieces. The active piece is written to `grid` but lives elsewhere.
    pieces: BTreeMap<PieceId, Piece>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid: Grid::new(width, height),
            pieces: BTreeMap::new(),
        }
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    /// Locked pieces in ascending id order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    /// Freeze a piece into the board. Its cells are (re)written at its anchor.
    pub fn lock(&mut self, piece: Piece) {
        self.grid.clear(piece.id);
        self.grid.place(&piece);
        debug!(id = %piece.id, x = piece.x, y = piece.y, rotation = piece.rotation, "piece locked");
        self.pieces.insert(piece.id, piece);
    }

    /// Delete pieces from grid and registry in one pass.
    pub fn remove(&mut self, ids: &[PieceId]) -> Vec<Piece> {
        let mut removed = Vec::with_capacity(ids.len());
        for &id in ids {
            self.grid.clear(id);
            if let Some(piece) = self.pieces.remove(&id) {
                removed.push(piece);
            }
        }
        removed
    }

    /// Drop every locked piece one row at a time until none can fall.
    /// Returns the number of single-row moves made.
    pub fn settle(&mut self) -> usize {
        let mut total = 0;
        loop {
            let mut moved = 0;
            for piece in self.pieces.values_mut() {
                if !self.grid.can_move(piece, 0, 1) {
                    continue;
                }
                self.grid.clear(piece.id);
                piece.y += 1;
                self.grid.place(piece);
                moved += 1;
            }
            if moved == 0 {
                break;
            }
            total += moved;
        }
        if total > 0 {
            debug!(moves = total, "board settled");
        }
        total
    }
}
