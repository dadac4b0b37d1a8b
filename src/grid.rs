//! Cell matrix. Cells hold the owning piece handle, never the piece.

use crate::piece::{Piece, PieceId};

/// One board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// `show_text` is set on the first shape cell of the owner only.
    Occupied { owner: PieceId, show_text: bool },
}

impl Cell {
    pub fn owner(&self) -> Option<PieceId> {
        match self {
            Self::Empty => None,
            Self::Occupied { owner, .. } => Some(*owner),
        }
    }
}

/// Grid: width x height cells, row-major. y=0 is the top row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    #[inline]
    pub fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Empty every cell owned by `id`.
    pub fn clear(&mut self, id: PieceId) {
        for cell in &mut self.cells {
            if cell.owner() == Some(id) {
                *cell = Cell::Empty;
            }
        }
    }

    /// Write the piece's cells at its anchor and rotation. Rows off the board
    /// are skipped. Callers repositioning a piece must `clear` it first.
    pub fn place(&mut self, piece: &Piece) {
        for (i, (x, y)) in piece.cells().into_iter().enumerate() {
            if let Some(idx) = self.index(x, y) {
                self.cells[idx] = Cell::Occupied {
                    owner: piece.id,
                    show_text: i == 0,
                };
            }
        }
    }

    /// True if the piece fits after shifting by (dx, dy) at its current rotation.
    pub fn can_move(&self, piece: &Piece, dx: i32, dy: i32) -> bool {
        self.can_move_to(piece, dx, dy, piece.rotation)
    }

    /// True if every cell of the piece at `rotation`, shifted by (dx, dy), is
    /// inside the side walls, above the floor, and on an empty cell or a cell
    /// the piece already owns. Rows above the board always pass.
    pub fn can_move_to(&self, piece: &Piece, dx: i32, dy: i32, rotation: u8) -> bool {
        piece
            .cells_at(piece.x + dx, piece.y + dy, rotation)
            .into_iter()
            .all(|(x, y)| {
                if x < 0 || x as usize >= self.width || y >= self.height as i32 {
                    return false;
                }
                if y < 0 {
                    return true;
                }
                match self.cell_at(x, y) {
                    Some(Cell::Empty) => true,
                    Some(Cell::Occupied { owner, .. }) => owner == piece.id,
                    None => false,
                }
            })
    }

    /// Positions owned by `id`, row-major.
    #[cfg(test)]
    pub fn cells_of(&self, id: PieceId) -> Vec<(i32, i32)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.owner() == Some(id))
            .map(|(i, _)| ((i % self.width) as i32, (i / self.width) as i32))
            .collect()
    }

    /// Iterate occupied positions with their owner, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (i32, i32, PieceId)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            c.owner()
                .map(|owner| ((i % width) as i32, (i / width) as i32, owner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Tier, VERBS};
    use crate::piece::Word;
    use proptest::prelude::*;

    fn bar(id: u32, x: i32, y: i32) -> Piece {
        Piece {
            id: PieceId(id),
            word: Word::Verb {
                verb: &VERBS[1],
                tier: Tier::Basic,
            },
            rotation: 0,
            x,
            y,
            text: "come".to_string(),
        }
    }

    fn hook(id: u32, x: i32, y: i32, rotation: u8) -> Piece {
        Piece {
            id: PieceId(id),
            word: Word::Complement { noun: "un café" },
            rotation,
            x,
            y,
            text: "con un café".to_string(),
        }
    }

    fn sorted(mut v: Vec<(i32, i32)>) -> Vec<(i32, i32)> {
        v.sort_by_key(|&(x, y)| (y, x));
        v
    }

    #[test]
    fn place_flags_first_cell_only() {
        let mut grid = Grid::new(6, 6);
        let piece = hook(1, 2, 1, 0);
        grid.place(&piece);
        assert_eq!(
            grid.cell_at(2, 1),
            Some(Cell::Occupied {
                owner: PieceId(1),
                show_text: true
            })
        );
        let flagged = grid
            .occupied()
            .filter(|&(x, y, _)| {
                matches!(grid.cell_at(x, y), Some(Cell::Occupied { show_text: true, .. }))
            })
            .count();
        assert_eq!(flagged, 1);
    }

    #[test]
    fn clear_then_place_leaves_no_stale_cells() {
        let mut grid = Grid::new(6, 6);
        let mut piece = bar(1, 0, 0);
        grid.place(&piece);
        grid.clear(piece.id);
        piece.x = 3;
        piece.y = 2;
        grid.place(&piece);
        assert_eq!(grid.cells_of(piece.id), vec![(3, 2), (3, 3), (3, 4)]);
    }

    #[test]
    fn walls_and_floor_block() {
        let grid = Grid::new(4, 5);
        let piece = bar(1, 0, 2);
        assert!(!grid.can_move(&piece, -1, 0));
        assert!(!grid.can_move(&piece, 0, 1));
        assert!(grid.can_move(&piece, 3, 0));
        assert!(!grid.can_move(&piece, 4, 0));
    }

    #[test]
    fn rows_above_board_are_passable() {
        let grid = Grid::new(4, 5);
        let piece = bar(1, 1, -2);
        assert!(grid.can_move(&piece, 0, 0));
    }

    #[test]
    fn self_overlap_allowed_other_owner_blocks() {
        let mut grid = Grid::new(6, 6);
        let piece = hook(1, 1, 1, 0);
        grid.place(&piece);
        assert!(grid.can_move_to(&piece, 0, 0, 1));
        let other = bar(2, 3, 0);
        grid.place(&other);
        // quarter turn spans x 1..=3 on row 1, which the bar now covers
        assert!(!grid.can_move_to(&piece, 0, 0, 1));
    }

    proptest! {
        #[test]
        fn can_move_has_no_side_effects(
            x in -1i32..7, y in -3i32..7, rot in 0u8..4, dx in -2i32..3, dy in -1i32..3,
        ) {
            let mut grid = Grid::new(6, 8);
            grid.place(&bar(2, 4, 4));
            let piece = hook(1, x, y, rot);
            let before_grid = grid.clone();
            let before_piece = piece.clone();
            let _ = grid.can_move(&piece, dx, dy);
            let _ = grid.can_move_to(&piece, dx, dy, (rot + 1) % 4);
            prop_assert_eq!(&grid, &before_grid);
            prop_assert_eq!(&piece, &before_piece);
        }

        #[test]
        fn placed_cells_match_shape(x in 0i32..4, y in 0i32..4, rot in 0u8..4) {
            let mut grid = Grid::new(8, 8);
            let piece = hook(1, x, y, rot);
            grid.place(&piece);
            prop_assert_eq!(grid.cells_of(piece.id), sorted(piece.cells()));
        }
    }
}
