use anyhow::{Context as _, ensure};
use chrono::{DateTime, Utc};
use evotac_engine::{Rules, Side};
use evotac_nn::{Architecture, Network};
use evotac_training::RunSeed;
use serde::{Deserialize, Serialize};

/// Best network of one side, as saved at the end of training.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Checkpoint {
    pub side: Side,
    pub board_size: usize,
    pub win_line: usize,
    pub trained_at: DateTime<Utc>,
    pub generations: usize,
    /// Score in the last tournament; absent if no generation ran.
    pub final_fitness: Option<f32>,
    pub seed: RunSeed,
    pub network: Network,
}

impl Checkpoint {
    pub fn rules(&self) -> anyhow::Result<Rules> {
        Rules::new(self.board_size, self.win_line).context("Checkpoint has invalid rules")
    }

    /// Checks that the checkpoint was trained for `side` under `rules`.
    pub fn ensure_compatible(&self, side: Side, rules: &Rules) -> anyhow::Result<()> {
        ensure!(
            self.side == side,
            "Checkpoint is for side {}, expected {side}",
            self.side
        );
        ensure!(
            self.rules()? == *rules,
            "Checkpoint was trained on a {0}x{0} board with win line {1}",
            self.board_size,
            self.win_line
        );
        let arch = self.network.architecture();
        let expected = Architecture::for_board(rules.board_size(), arch.hidden_size)?;
        ensure!(
            *arch == expected,
            "Checkpoint network does not fit a {0}x{0} board",
            rules.board_size()
        );
        Ok(())
    }
}
