//! Piece shapes and quarter-turn rotation.

/// The three piece shapes. Each one carries a fixed grammatical role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// 2x2 block, carries a pronoun.
    Square,
    /// Vertical 1x3 bar, carries a verb.
    Bar,
    /// L-tromino with a foot (4 cells), carries a complement.
    Hook,
}

impl ShapeKind {
    pub const ALL: [Self; 3] = [Self::Square, Self::Bar, Self::Hook];

    /// Cell offsets (dx, dy) relative to the anchor, in definition order.
    /// y grows downward.
    pub fn cells(&self) -> &'static [(i32, i32)] {
        match self {
            Self::Square => &[(0, 0), (1, 0), (0, 1), (1, 1)],
            Self::Bar => &[(0, 0), (0, 1), (0, 2)],
            Self::Hook => &[(0, 0), (0, 1), (0, 2), (1, 2)],
        }
    }

    /// Offsets after `turns` quarter turns, normalized so the bounding box
    /// touches (0, 0). Order of cells follows `cells()`.
    pub fn rotated(&self, turns: u8) -> Vec<(i32, i32)> {
        let mut out = self.cells().to_vec();
        for _ in 0..turns % 4 {
            for cell in &mut out {
                *cell = (-cell.1, cell.0);
            }
            normalize(&mut out);
        }
        out
    }
}

fn normalize(cells: &mut [(i32, i32)]) {
    let min_x = cells.iter().map(|c| c.0).min().unwrap_or(0);
    let min_y = cells.iter().map(|c| c.1).min().unwrap_or(0);
    for cell in cells {
        cell.0 -= min_x;
        cell.1 -= min_y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kind_strategy() -> impl Strategy<Value = ShapeKind> {
        prop::sample::select(ShapeKind::ALL.to_vec())
    }

    #[test]
    fn bar_turns_horizontal() {
        assert_eq!(ShapeKind::Bar.rotated(1), vec![(2, 0), (1, 0), (0, 0)]);
    }

    #[test]
    fn hook_quarter_turn() {
        // (0,0) (0,1) (0,2) (1,2) -> (0,0) (-1,0) (-2,0) (-2,1) -> shift x by 2
        assert_eq!(
            ShapeKind::Hook.rotated(1),
            vec![(2, 0), (1, 0), (0, 0), (0, 1)]
        );
    }

    #[test]
    fn zero_turns_is_definition() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.rotated(0), kind.cells());
        }
    }

    proptest! {
        #[test]
        fn four_turns_are_identity(kind in kind_strategy(), turns in 0u8..4) {
            prop_assert_eq!(kind.rotated(turns + 4), kind.rotated(turns));
            let mut cells = kind.cells().to_vec();
            for _ in 0..4 {
                for cell in &mut cells {
                    *cell = (-cell.1, cell.0);
                }
                normalize(&mut cells);
            }
            prop_assert_eq!(cells, kind.cells().to_vec());
        }

        #[test]
        fn rotation_keeps_cell_count_and_origin(kind in kind_strategy(), turns in 0u8..8) {
            let cells = kind.rotated(turns);
            prop_assert_eq!(cells.len(), kind.cells().len());
            prop_assert_eq!(cells.iter().map(|c| c.0).min(), Some(0));
            prop_assert_eq!(cells.iter().map(|c| c.1).min(), Some(0));
        }
    }
}
