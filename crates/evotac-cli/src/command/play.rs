use std::{
    cell::RefCell,
    io::{self, BufRead, Write as _},
};

use anyhow::{Context as _, bail};
use evotac_engine::{
    Board, GameRecord, MatchOutcome, Policy, ReplayCursor, Rules, Side, play_match,
};
use evotac_training::Agent;
use rand::Rng;

use crate::{
    command::BoardArg,
    schema::checkpoint::Checkpoint,
    util::{self, SavedModel},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    board: BoardArg,
    /// Let the AI move first; you play O
    #[arg(long)]
    second: bool,
    /// List the trained board configurations and exit
    #[arg(long)]
    list: bool,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let data_dir = arg.board.data_dir();
    if arg.list {
        let models = data_dir.saved_models()?;
        if models.is_empty() {
            println!("No trained models found.");
        }
        for model in models {
            println!(
                "{side}: -b {size} -w {win_line}",
                side = model.side,
                size = model.board_size,
                win_line = model.win_line
            );
        }
        return Ok(());
    }

    let rules = arg.board.rules()?;
    let human_side = if arg.second { Side::O } else { Side::X };
    let ai_side = human_side.opponent();

    let path = data_dir.model_path(ai_side, &rules);
    if !path.exists() {
        bail!(missing_model_message(ai_side, &rules, &data_dir.saved_models()?));
    }
    let checkpoint: Checkpoint = util::read_json_file("checkpoint", &path)?;
    checkpoint
        .ensure_compatible(ai_side, &rules)
        .with_context(|| format!("Cannot play with {}", path.display()))?;

    println!("You play {human_side}. Enter moves as `row col`, counting from 0.");
    let human = HumanPlayer::new(io::stdin().lock(), human_side);
    let ai = AiPlayer {
        agent: Agent::new(&checkpoint.network, 0.0),
        side: ai_side,
    };
    let result = match human_side {
        Side::X => play_match(&rules, &human, &ai, &mut rand::rng())?,
        Side::O => play_match(&rules, &ai, &human, &mut rand::rng())?,
    };

    let mut cursor = ReplayCursor::new(GameRecord::from(&result), rules)?;
    cursor.seek(cursor.len());
    println!();
    println!("{}", cursor.board());
    println!("{}", end_message(result.outcome, human_side));
    Ok(())
}

fn missing_model_message(side: Side, rules: &Rules, available: &[SavedModel]) -> String {
    let mut message = format!(
        "No trained {side} model for a {0}x{0} board with win line {1}",
        rules.board_size(),
        rules.win_line()
    );
    let options = available
        .iter()
        .filter(|m| m.side == side)
        .map(|m| format!("-b {} -w {}", m.board_size, m.win_line))
        .collect::<Vec<_>>();
    if options.is_empty() {
        message.push_str("; run `evotac train` first");
    } else {
        message.push_str("; available: ");
        message.push_str(&options.join(", "));
    }
    message
}

fn end_message(outcome: MatchOutcome, human_side: Side) -> &'static str {
    match outcome.winner() {
        Some(side) if side == human_side => "You win!",
        Some(_) => "AI wins!",
        None => outcome.description(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
enum MoveInputError {
    #[display("expected two numbers: row col")]
    Format,
    #[display("({row}, {col}) is outside the {size}x{size} board")]
    OutOfRange { row: usize, col: usize, size: usize },
    #[display("({row}, {col}) is already taken")]
    Occupied { row: usize, col: usize },
}

fn parse_move(line: &str, board: &Board) -> Result<usize, MoveInputError> {
    let mut numbers = line.split_whitespace().map(str::parse::<usize>);
    let (Some(Ok(row)), Some(Ok(col)), None) = (numbers.next(), numbers.next(), numbers.next())
    else {
        return Err(MoveInputError::Format);
    };
    let size = board.size();
    if row >= size || col >= size {
        return Err(MoveInputError::OutOfRange { row, col, size });
    }
    if board.get(row, col).is_some() {
        return Err(MoveInputError::Occupied { row, col });
    }
    Ok(board.index(row, col))
}

/// Reads moves from a line-based input until a legal one is entered.
struct HumanPlayer<I> {
    input: RefCell<I>,
    side: Side,
}

impl<I> HumanPlayer<I>
where
    I: BufRead,
{
    fn new(input: I, side: Side) -> Self {
        Self {
            input: RefCell::new(input),
            side,
        }
    }
}

impl<I> Policy for HumanPlayer<I>
where
    I: BufRead,
{
    type Error = anyhow::Error;

    fn choose_move<R>(&self, board: &Board, _rng: &mut R) -> Result<usize, Self::Error>
    where
        R: Rng + ?Sized,
    {
        println!();
        println!("{board}");
        loop {
            print!("Your move ({}): ", self.side);
            io::stdout().flush().context("Failed to flush stdout")?;
            let mut line = String::new();
            let read = self
                .input
                .borrow_mut()
                .read_line(&mut line)
                .context("Failed to read move")?;
            if read == 0 {
                bail!("Input closed before the game ended");
            }
            match parse_move(&line, board) {
                Ok(index) => return Ok(index),
                Err(e) => println!("Invalid move: {e}"),
            }
        }
    }
}

struct AiPlayer<'a> {
    agent: Agent<'a>,
    side: Side,
}

impl Policy for AiPlayer<'_> {
    type Error = anyhow::Error;

    fn choose_move<R>(&self, board: &Board, _rng: &mut R) -> Result<usize, Self::Error>
    where
        R: Rng + ?Sized,
    {
        let Some(index) = self.agent.choose_legal_move(board)? else {
            bail!("No empty cell left for the AI");
        };
        let (row, col) = board.position(index);
        println!("AI ({}) plays {row} {col}", self.side);
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use evotac_nn::{Architecture, Network};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_parse_move() {
        let mut board = Board::new(3);
        board.place(4, Side::X).unwrap();
        assert_eq!(parse_move("2 1\n", &board), Ok(7));
        assert_eq!(parse_move("  0   2 ", &board), Ok(2));
        assert_eq!(parse_move("1 1", &board), Err(MoveInputError::Occupied { row: 1, col: 1 }));
        assert_eq!(
            parse_move("3 0", &board),
            Err(MoveInputError::OutOfRange { row: 3, col: 0, size: 3 })
        );
        assert_eq!(parse_move("1", &board), Err(MoveInputError::Format));
        assert_eq!(parse_move("1 2 3", &board), Err(MoveInputError::Format));
        assert_eq!(parse_move("a b", &board), Err(MoveInputError::Format));
    }

    #[test]
    fn test_missing_model_lists_alternatives() {
        let rules = Rules::new(4, 4).unwrap();
        let available = [
            SavedModel { side: Side::O, board_size: 3, win_line: 3 },
            SavedModel { side: Side::X, board_size: 5, win_line: 4 },
            SavedModel { side: Side::O, board_size: 5, win_line: 4 },
        ];
        let message = missing_model_message(Side::O, &rules, &available);
        assert_eq!(
            message,
            "No trained O model for a 4x4 board with win line 4; available: -b 3 -w 3, -b 5 -w 4"
        );
        let message = missing_model_message(Side::X, &rules, &available[..1]);
        assert!(message.ends_with("run `evotac train` first"));
    }

    #[test]
    fn test_human_beats_zero_network() {
        let rules = Rules::default();
        let network = Network::zeros(Architecture::for_board(3, 4).unwrap());
        let ai = AiPlayer {
            agent: Agent::new(&network, 0.0),
            side: Side::O,
        };
        // Invalid lines are skipped until a legal move arrives.
        let input = Cursor::new("1 1\n0 0\n9 9\nfoo\n0 1\n2 1\n");
        let human = HumanPlayer::new(input, Side::X);

        let result = play_match(&rules, &human, &ai, &mut Pcg32::seed_from_u64(0)).unwrap();
        assert_eq!(result.outcome, MatchOutcome::XWins);
        assert_eq!(result.moves_played, 5);
        assert!(!result.forfeit);
        assert_eq!(end_message(result.outcome, Side::X), "You win!");
        assert_eq!(end_message(result.outcome, Side::O), "AI wins!");
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let rules = Rules::default();
        let network = Network::zeros(Architecture::for_board(3, 4).unwrap());
        let ai = AiPlayer {
            agent: Agent::new(&network, 0.0),
            side: Side::X,
        };
        let human = HumanPlayer::new(Cursor::new("1 1\n"), Side::O);
        let err = play_match(&rules, &ai, &human, &mut Pcg32::seed_from_u64(0)).unwrap_err();
        assert!(err.to_string().contains("Input closed"));
    }
}
