use serde::{Deserialize, Serialize};

use crate::{MatchOutcome, MatchResult, PlacedMove, Side};

/// A finished game as stored on disk for replay.
///
/// Serialized as a list of `[a, b, c]` rows. The first row carries the outcome
/// code (`[code, 0, 0]`, 0 draw, 1 X wins, 2 O wins); every following row is a
/// `[row, col, side]` placement in play order.
///
/// ```
/// use evotac_engine::{GameRecord, MatchOutcome, PlacedMove, Side};
///
/// let record = GameRecord {
///     outcome: MatchOutcome::XWins,
///     moves: vec![PlacedMove { row: 1, col: 1, side: Side::X }],
/// };
/// assert_eq!(record.to_rows(), vec![[1, 0, 0], [1, 1, 1]]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<[usize; 3]>", try_from = "Vec<[usize; 3]>")]
pub struct GameRecord {
    pub outcome: MatchOutcome,
    pub moves: Vec<PlacedMove>,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RecordError {
    #[display("game record is empty")]
    Empty,
    #[display("unknown outcome code {code}")]
    UnknownOutcome { code: usize },
    #[display("unknown side code {code} in move {index}")]
    UnknownSide { index: usize, code: usize },
    #[display("move ({row}, {col}) lies outside a {board_size}x{board_size} board")]
    OutsideBoard {
        row: usize,
        col: usize,
        board_size: usize,
    },
}

impl From<&MatchResult> for GameRecord {
    fn from(result: &MatchResult) -> Self {
        Self {
            outcome: result.outcome,
            moves: result.moves.clone(),
        }
    }
}

impl GameRecord {
    #[must_use]
    pub fn to_rows(&self) -> Vec<[usize; 3]> {
        let mut rows = Vec::with_capacity(self.moves.len() + 1);
        rows.push([usize::from(self.outcome.code()), 0, 0]);
        rows.extend(
            self.moves
                .iter()
                .map(|m| [m.row, m.col, usize::from(m.side.code())]),
        );
        rows
    }

    pub fn from_rows(rows: &[[usize; 3]]) -> Result<Self, RecordError> {
        let (header, rest) = rows.split_first().ok_or(RecordError::Empty)?;
        let outcome = u8::try_from(header[0])
            .ok()
            .and_then(MatchOutcome::from_code)
            .ok_or(RecordError::UnknownOutcome { code: header[0] })?;
        let moves = rest
            .iter()
            .enumerate()
            .map(|(index, &[row, col, code])| {
                let side = u8::try_from(code)
                    .ok()
                    .and_then(Side::from_code)
                    .ok_or(RecordError::UnknownSide { index, code })?;
                Ok(PlacedMove { row, col, side })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { outcome, moves })
    }
}

impl From<GameRecord> for Vec<[usize; 3]> {
    fn from(record: GameRecord) -> Self {
        record.to_rows()
    }
}

impl TryFrom<Vec<[usize; 3]>> for GameRecord {
    type Error = RecordError;

    fn try_from(rows: Vec<[usize; 3]>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_layout() {
        let record = GameRecord {
            outcome: MatchOutcome::OWins,
            moves: vec![
                PlacedMove {
                    row: 0,
                    col: 0,
                    side: Side::X,
                },
                PlacedMove {
                    row: 2,
                    col: 1,
                    side: Side::O,
                },
            ],
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, "[[2,0,0],[0,0,1],[2,1,2]]");
        let parsed: GameRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_rejects_bad_rows() {
        assert_eq!(GameRecord::from_rows(&[]), Err(RecordError::Empty));
        assert_eq!(
            GameRecord::from_rows(&[[7, 0, 0]]),
            Err(RecordError::UnknownOutcome { code: 7 })
        );
        assert_eq!(
            GameRecord::from_rows(&[[0, 0, 0], [1, 1, 0]]),
            Err(RecordError::UnknownSide { index: 0, code: 0 })
        );
        assert!(serde_json::from_str::<GameRecord>("[[9,0,0]]").is_err());
    }
}
