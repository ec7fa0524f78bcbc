use std::{thread, time::Duration};

use evotac_engine::{GameRecord, ReplayCursor};

use crate::{command::BoardArg, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    #[clap(flatten)]
    board: BoardArg,
    /// Number of the game to replay (`games/game_{n}.json`)
    #[arg(short = 'n', long = "game")]
    game: usize,
    /// Show only the board after this many moves
    #[arg(long)]
    step: Option<usize>,
    /// Pause between printed moves, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay: u64,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let path = arg.board.data_dir().game_path(arg.game);
    let record: GameRecord = util::read_json_file("game", &path)?;
    let mut cursor = ReplayCursor::new(record, arg.board.rules()?)?;

    println!("{}", cursor.record().outcome.description());
    if let Some(step) = arg.step {
        cursor.seek(step);
        println!();
        print!("{}", render_frame(&cursor));
        return Ok(());
    }

    loop {
        println!();
        print!("{}", render_frame(&cursor));
        if !cursor.forward() {
            break;
        }
        if arg.delay > 0 {
            thread::sleep(Duration::from_millis(arg.delay));
        }
    }
    Ok(())
}

fn render_frame(cursor: &ReplayCursor) -> String {
    let mut frame = format!("{}\n{}\n", cursor.title(), cursor.board());
    if let Some((side, line)) = cursor.winner() {
        let cells = line
            .iter()
            .map(|(row, col)| format!("({row}, {col})"))
            .collect::<Vec<_>>()
            .join(" ");
        frame.push_str(&format!("{side} line: {cells}\n"));
    }
    frame
}

#[cfg(test)]
mod tests {
    use evotac_engine::{MatchOutcome, PlacedMove, Rules, Side};

    use super::*;

    #[test]
    fn test_frame_shows_winning_line() {
        let record = GameRecord {
            outcome: MatchOutcome::XWins,
            moves: [(0, 0, Side::X), (1, 0, Side::O), (0, 1, Side::X), (1, 1, Side::O), (0, 2, Side::X)]
                .into_iter()
                .map(|(row, col, side)| PlacedMove { row, col, side })
                .collect(),
        };
        let mut cursor = ReplayCursor::new(record, Rules::default()).unwrap();
        assert!(!render_frame(&cursor).contains("line"));

        cursor.seek(5);
        let frame = render_frame(&cursor);
        assert!(frame.starts_with("Move: 5/5\n"));
        assert!(frame.ends_with("X line: (0, 0) (0, 1) (0, 2)\n"));
    }
}
