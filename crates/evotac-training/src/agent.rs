//! Move selection on top of a [`Network`].

use evotac_engine::{Board, Policy};
use evotac_nn::{Network, NetworkError};
use rand::Rng;

/// A network plus an exploration probability.
///
/// Agents only borrow their network and are rebuilt from the current
/// population every generation, so they never see stale parameters.
#[derive(Debug, Clone, Copy)]
pub struct Agent<'a> {
    network: &'a Network,
    exploration_rate: f64,
}

impl<'a> Agent<'a> {
    #[must_use]
    pub fn new(network: &'a Network, exploration_rate: f64) -> Self {
        Self {
            network,
            exploration_rate,
        }
    }

    #[must_use]
    pub fn network(&self) -> &'a Network {
        self.network
    }

    /// Picks an action index in `[0, action_space)`.
    ///
    /// With probability `exploration_rate` the index is uniformly random;
    /// otherwise it is the argmax of the network scores, ties going to the
    /// lowest index. The observation must match the network input size even
    /// when the random branch is taken.
    pub fn choose_move<R>(
        &self,
        observation: &[f32],
        action_space: usize,
        rng: &mut R,
    ) -> Result<usize, NetworkError>
    where
        R: Rng + ?Sized,
    {
        let expected = self.network.architecture().input_size;
        if observation.len() != expected {
            return Err(NetworkError::ShapeMismatch {
                expected,
                actual: observation.len(),
            });
        }
        if rng.random::<f64>() < self.exploration_rate && action_space > 0 {
            return Ok(rng.random_range(0..action_space));
        }
        let scores = self.network.forward(observation)?;
        Ok(argmax(&scores))
    }

    /// Best-scoring empty cell of `board`, without exploration.
    ///
    /// Returns `None` when the board is full.
    pub fn choose_legal_move(&self, board: &Board) -> Result<Option<usize>, NetworkError> {
        let scores = self.network.forward(&board.observation())?;
        let mut best: Option<(usize, f32)> = None;
        for index in board.valid_moves() {
            let score = scores.get(index).copied().unwrap_or(f32::NEG_INFINITY);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((index, score));
            }
        }
        Ok(best.map(|(index, _)| index))
    }
}

impl Policy for Agent<'_> {
    type Error = NetworkError;

    fn choose_move<R>(&self, board: &Board, rng: &mut R) -> Result<usize, NetworkError>
    where
        R: Rng + ?Sized,
    {
        Agent::choose_move(self, &board.observation(), board.cell_count(), rng)
    }
}

/// Index of the first maximum.
fn argmax(scores: &[f32]) -> usize {
    let mut best = 0;
    for (i, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = i;
        }
    }
    best
}
