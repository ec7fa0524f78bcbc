//! Turning match results into fitness.

use evotac_engine::{MatchOutcome, MatchResult};

use crate::{config::ScoringParams, population::FitnessScores};

/// Rewards quick wins: `max(floor, (max_moves - moves_played) / max_moves * scale)`.
///
/// With the default parameters a win on the last possible move scores 1 and a
/// one-move win on a 3x3 board scores about 8.9.
#[must_use]
pub fn move_score(moves_played: usize, max_moves: usize, params: &ScoringParams) -> f32 {
    #[expect(clippy::cast_precision_loss)]
    let (remaining, max) = (
        max_moves.saturating_sub(moves_played) as f32,
        max_moves as f32,
    );
    (remaining / max * params.move_score_scale).max(params.move_score_floor)
}

/// Adds the fitness changes of one match to the two participating slots.
pub fn score_match(
    result: &MatchResult,
    max_moves: usize,
    params: &ScoringParams,
    (x_scores, x_slot): (&mut FitnessScores, usize),
    (o_scores, o_slot): (&mut FitnessScores, usize),
) {
    let score = move_score(result.moves_played, max_moves, params);
    match result.outcome {
        MatchOutcome::XWins => {
            x_scores.add(x_slot, score * params.x_win_multiplier);
            o_scores.add(o_slot, -params.loss_penalty);
        }
        MatchOutcome::OWins => {
            o_scores.add(o_slot, score * params.o_win_multiplier);
            x_scores.add(x_slot, -params.loss_penalty);
        }
        MatchOutcome::Draw => {
            x_scores.add(x_slot, params.x_draw_reward);
            o_scores.add(o_slot, params.o_draw_reward);
        }
    }
}

/// Aggregate results over a set of matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchTally {
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
    /// Games decided by an illegal move; also counted in the win columns.
    pub forfeits: usize,
}

impl MatchTally {
    pub fn record(&mut self, result: &MatchResult) {
        match result.outcome {
            MatchOutcome::XWins => self.x_wins += 1,
            MatchOutcome::OWins => self.o_wins += 1,
            MatchOutcome::Draw => self.draws += 1,
        }
        if result.forfeit {
            self.forfeits += 1;
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.x_wins + self.o_wins + self.draws
    }
}
