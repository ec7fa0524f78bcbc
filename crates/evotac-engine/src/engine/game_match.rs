use rand::Rng;

use crate::{Board, Rules, Side};

/// Final result of a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    XWins,
    OWins,
    Draw,
}

impl MatchOutcome {
    #[must_use]
    pub const fn win_for(side: Side) -> Self {
        match side {
            Side::X => Self::XWins,
            Side::O => Self::OWins,
        }
    }

    #[must_use]
    pub const fn winner(self) -> Option<Side> {
        match self {
            Self::XWins => Some(Side::X),
            Self::OWins => Some(Side::O),
            Self::Draw => None,
        }
    }

    /// Outcome code used by game records: 0 draw, 1 X wins, 2 O wins.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Draw => 0,
            Self::XWins => 1,
            Self::OWins => 2,
        }
    }

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Draw),
            1 => Some(Self::XWins),
            2 => Some(Self::OWins),
            _ => None,
        }
    }

    /// Human readable result line.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::XWins => "X wins!",
            Self::OWins => "O wins!",
            Self::Draw => "It's a draw!",
        }
    }
}

/// A legal placement made during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedMove {
    pub row: usize,
    pub col: usize,
    pub side: Side,
}

/// Everything the scoring step needs to know about a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub outcome: MatchOutcome,
    /// Number of legal placements made by both sides.
    pub moves_played: usize,
    pub moves: Vec<PlacedMove>,
    /// Set when the game ended because a side picked an illegal cell.
    pub forfeit: bool,
}

/// Something that picks a cell for the side to move.
///
/// The returned value is a flat cell index in `[0, board.cell_count())`. It is
/// not required to be legal; [`play_match`] treats an occupied or
/// out-of-range index as a forfeit.
pub trait Policy {
    type Error;

    fn choose_move<R>(&self, board: &Board, rng: &mut R) -> Result<usize, Self::Error>
    where
        R: Rng + ?Sized;
}

impl<P> Policy for &P
where
    P: Policy,
{
    type Error = P::Error;

    fn choose_move<R>(&self, board: &Board, rng: &mut R) -> Result<usize, Self::Error>
    where
        R: Rng + ?Sized,
    {
        (**self).choose_move(board, rng)
    }
}

/// Plays one game from an empty board, X moving first.
///
/// After every placement the board is checked for a winning line and then for
/// a full board. A policy that picks an illegal cell loses immediately.
pub fn play_match<X, O, E, R>(
    rules: &Rules,
    x_policy: &X,
    o_policy: &O,
    rng: &mut R,
) -> Result<MatchResult, E>
where
    X: Policy<Error = E>,
    O: Policy<Error = E>,
    R: Rng + ?Sized,
{
    let mut board = Board::new(rules.board_size());
    let mut moves = Vec::with_capacity(rules.max_moves());
    let mut side = Side::X;

    loop {
        let index = match side {
            Side::X => x_policy.choose_move(&board, rng)?,
            Side::O => o_policy.choose_move(&board, rng)?,
        };
        if board.place(index, side).is_err() {
            return Ok(MatchResult {
                outcome: MatchOutcome::win_for(side.opponent()),
                moves_played: moves.len(),
                moves,
                forfeit: true,
            });
        }
        let (row, col) = board.position(index);
        moves.push(PlacedMove { row, col, side });

        let outcome = if board.winner(rules.win_line()).is_some() {
            Some(MatchOutcome::win_for(side))
        } else if board.is_full() {
            Some(MatchOutcome::Draw)
        } else {
            None
        };
        if let Some(outcome) = outcome {
            return Ok(MatchResult {
                outcome,
                moves_played: moves.len(),
                moves,
                forfeit: false,
            });
        }
        side = side.opponent();
    }
}
