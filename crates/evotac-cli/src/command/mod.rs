use std::path::PathBuf;

use clap::{Parser, Subcommand};

use self::{play::PlayArg, replay::ReplayArg, train::TrainArg};

mod play;
mod replay;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve X and O networks with a genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Print the board states of a saved game
    Replay(#[clap(flatten)] ReplayArg),
    /// Play against a trained network on the terminal
    Play(#[clap(flatten)] PlayArg),
}

/// Board configuration shared by every subcommand.
#[derive(Debug, Clone, clap::Args)]
struct BoardArg {
    /// Board side length
    #[arg(short = 'b', long, default_value_t = 3)]
    board_size: usize,
    /// Number of marks in a row needed to win
    #[arg(short = 'w', long, default_value_t = 3)]
    win_line: usize,
    /// Directory holding saved models, training logs and games
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
}

impl BoardArg {
    fn rules(&self) -> anyhow::Result<evotac_engine::Rules> {
        Ok(evotac_engine::Rules::new(self.board_size, self.win_line)?)
    }

    fn data_dir(&self) -> crate::util::DataDir {
        crate::util::DataDir::new(&self.data_dir)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Replay(arg) => replay::run(&arg)?,
        Mode::Play(arg) => play::run(&arg)?,
    }
    Ok(())
}
