use std::fmt;

use crate::{MoveError, Side};

/// Directions scanned for a winning line: down, right, down-right, down-left.
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// A square board of `size x size` cells stored in row-major order.
///
/// Cells are addressed either by flat index (`row * size + col`), which is
/// the action space seen by agents, or by `(row, col)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Side>>,
}

impl Board {
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Side> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.cells[row * self.size + col]
    }

    #[must_use]
    pub const fn position(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    #[must_use]
    pub const fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Marks the cell at `index` for `side`.
    pub fn place(&mut self, index: usize, side: Side) -> Result<(), MoveError> {
        let cells = self.cells.len();
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(MoveError::OutOfBounds { index, cells })?;
        if cell.is_some() {
            let (row, col) = (index / self.size, index % self.size);
            return Err(MoveError::OccupiedCell { row, col });
        }
        *cell = Some(side);
        Ok(())
    }

    /// Overwrites a cell without any legality check.
    ///
    /// Used when rebuilding a position from a recorded game.
    pub fn set(&mut self, row: usize, col: usize, side: Option<Side>) {
        let index = self.index(row, col);
        self.cells[index] = side;
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Flat indices of the empty cells, in ascending order.
    pub fn valid_moves(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| i)
    }

    /// Flattened numeric encoding fed to networks: 0 empty, 1 X, 2 O.
    #[must_use]
    pub fn observation(&self) -> Vec<f32> {
        self.cells
            .iter()
            .map(|cell| cell.map_or(0.0, |side| f32::from(side.code())))
            .collect()
    }

    /// Finds a line of `win_line` equal marks.
    ///
    /// Every occupied cell is tried as the start of a line in each of the four
    /// directions; the first line found in row-major order is returned along
    /// with its `(row, col)` cells.
    #[must_use]
    pub fn winner(&self, win_line: usize) -> Option<(Side, Vec<(usize, usize)>)> {
        for row in 0..self.size {
            for col in 0..self.size {
                let Some(side) = self.get(row, col) else {
                    continue;
                };
                for (dr, dc) in DIRECTIONS {
                    if let Some(line) = self.line_from(row, col, dr, dc, side, win_line) {
                        return Some((side, line));
                    }
                }
            }
        }
        None
    }

    fn line_from(
        &self,
        row: usize,
        col: usize,
        dr: isize,
        dc: isize,
        side: Side,
        len: usize,
    ) -> Option<Vec<(usize, usize)>> {
        let mut line = Vec::with_capacity(len);
        let (mut r, mut c) = (row, col);
        for step in 0..len {
            if self.get(r, c) != Some(side) {
                return None;
            }
            line.push((r, c));
            if step + 1 < len {
                r = r.checked_add_signed(dr)?;
                c = c.checked_add_signed(dc)?;
            }
        }
        Some(line)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..self.size {
                if col > 0 {
                    f.write_str(" ")?;
                }
                match self.get(row, col) {
                    Some(side) => write!(f, "{side}")?,
                    None => f.write_str(".")?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(rows: &[&str]) -> Board {
        let mut board = Board::new(rows.len());
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                let side = match ch {
                    'X' => Some(Side::X),
                    'O' => Some(Side::O),
                    _ => None,
                };
                board.set(r, c, side);
            }
        }
        board
    }

    #[test]
    fn test_place_rejects_occupied_and_out_of_bounds() {
        let mut board = Board::new(3);
        board.place(4, Side::X).unwrap();
        assert_eq!(
            board.place(4, Side::O),
            Err(MoveError::OccupiedCell { row: 1, col: 1 })
        );
        assert_eq!(
            board.place(9, Side::O),
            Err(MoveError::OutOfBounds { index: 9, cells: 9 })
        );
    }

    #[test]
    fn test_winner_in_each_direction() {
        let column = board_from(&["X..", "X..", "X.."]);
        assert_eq!(
            column.winner(3),
            Some((Side::X, vec![(0, 0), (1, 0), (2, 0)]))
        );

        let row = board_from(&["...", "OOO", "..."]);
        assert_eq!(row.winner(3).map(|(s, _)| s), Some(Side::O));

        let diagonal = board_from(&["X..", ".X.", "..X"]);
        assert_eq!(diagonal.winner(3).map(|(s, _)| s), Some(Side::X));

        let anti_diagonal = board_from(&["..O", ".O.", "O.."]);
        assert_eq!(
            anti_diagonal.winner(3),
            Some((Side::O, vec![(0, 2), (1, 1), (2, 0)]))
        );
    }

    #[test]
    fn test_winner_with_short_line_on_large_board() {
        let board = board_from(&["....", ".XX.", "....", "...."]);
        assert_eq!(board.winner(3), None);
        assert_eq!(board.winner(2).map(|(s, _)| s), Some(Side::X));
    }

    #[test]
    fn test_no_wrap_around_edges() {
        let board = board_from(&["..X", "X..", "..."]);
        assert_eq!(board.winner(2), None);
    }

    #[test]
    fn test_observation_and_valid_moves() {
        let board = board_from(&["X.O", "...", "..."]);
        assert_eq!(
            board.observation(),
            vec![1.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        );
        assert_eq!(
            board.valid_moves().collect::<Vec<_>>(),
            vec![1, 3, 4, 5, 6, 7, 8]
        );
        assert!(!board.is_full());
    }

    #[test]
    fn test_display() {
        let board = board_from(&["X.O", ".X.", "..O"]);
        assert_eq!(board.to_string(), "X . O\n. X .\n. . O");
    }
}
