use crate::{Board, GameRecord, RecordError, Rules, Side};

/// Steps through a [`GameRecord`], rebuilding the board at each move.
///
/// The cursor position is the number of moves applied. It starts on the first
/// move and stays within `1..=len` (or at 0 for a record with no moves).
///
/// ```
/// use evotac_engine::{GameRecord, ReplayCursor, Rules};
///
/// let record = GameRecord::from_rows(&[[1, 0, 0], [0, 0, 1], [1, 1, 2], [0, 1, 1]]).unwrap();
/// let mut cursor = ReplayCursor::new(record, Rules::default()).unwrap();
/// assert_eq!(cursor.title(), "Move: 1/3");
/// assert!(cursor.forward());
/// assert!(cursor.forward());
/// assert!(!cursor.forward());
/// assert_eq!(cursor.board().to_string(), "X X .\n. O .\n. . .");
/// ```
#[derive(Debug, Clone)]
pub struct ReplayCursor {
    record: GameRecord,
    rules: Rules,
    position: usize,
    board: Board,
}

impl ReplayCursor {
    /// Creates a cursor on the first move.
    ///
    /// Fails when a recorded move lies outside the board described by `rules`.
    pub fn new(record: GameRecord, rules: Rules) -> Result<Self, RecordError> {
        let size = rules.board_size();
        if let Some(m) = record.moves.iter().find(|m| m.row >= size || m.col >= size) {
            return Err(RecordError::OutsideBoard {
                row: m.row,
                col: m.col,
                board_size: size,
            });
        }
        let position = usize::from(!record.moves.is_empty());
        let mut this = Self {
            record,
            rules,
            position,
            board: Board::new(size),
        };
        this.rebuild();
        Ok(this)
    }

    #[must_use]
    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.record.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record.moves.is_empty()
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Advances one move. Returns `false` when already on the last move.
    pub fn forward(&mut self) -> bool {
        if self.position >= self.len() {
            return false;
        }
        self.position += 1;
        self.rebuild();
        true
    }

    /// Steps back one move. Returns `false` when already on the first move.
    pub fn back(&mut self) -> bool {
        if self.position <= 1 {
            return false;
        }
        self.position -= 1;
        self.rebuild();
        true
    }

    /// Jumps to `position`, clamped to the valid range.
    pub fn seek(&mut self, position: usize) {
        self.position = position.clamp(usize::from(!self.is_empty()), self.len());
        self.rebuild();
    }

    /// Winner and winning line on the current board, if any.
    #[must_use]
    pub fn winner(&self) -> Option<(Side, Vec<(usize, usize)>)> {
        self.board.winner(self.rules.win_line())
    }

    #[must_use]
    pub fn title(&self) -> String {
        format!("Move: {}/{}", self.position, self.len())
    }

    fn rebuild(&mut self) {
        self.board = Board::new(self.rules.board_size());
        for m in &self.record.moves[..self.position] {
            self.board.set(m.row, m.col, Some(m.side));
        }
    }
}
