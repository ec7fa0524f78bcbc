//! Run configuration.
//!
//! Every knob of a training run lives in [`TrainingConfig`]. It is built once
//! before training starts and never changes afterwards. The defaults reproduce
//! the tuned constants the trainer has always used, including the asymmetric
//! treatment of X (first mover) and O (second mover).

use evotac_engine::{Rules, RulesError, Side};
use evotac_nn::{Architecture, NetworkError};

/// How match results turn into fitness.
///
/// O is rewarded more for wins and draws because it moves second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    /// Multiplier applied to the move score when X wins.
    pub x_win_multiplier: f32,
    /// Multiplier applied to the move score when O wins.
    pub o_win_multiplier: f32,
    /// Subtracted from the losing side.
    pub loss_penalty: f32,
    pub x_draw_reward: f32,
    pub o_draw_reward: f32,
    /// Move score of a win on the very first move of an empty board.
    pub move_score_scale: f32,
    /// Lower bound of the move score.
    pub move_score_floor: f32,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            x_win_multiplier: 2.0,
            o_win_multiplier: 3.0,
            loss_penalty: 5.0,
            x_draw_reward: 1.0,
            o_draw_reward: 5.0,
            move_score_scale: 10.0,
            move_score_floor: 1.0,
        }
    }
}

/// Per-side survival thresholds, as a fraction of the `[min, max]` score range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionParams {
    pub x_threshold: f32,
    /// Stricter than X since draws inflate O's scores.
    pub o_threshold: f32,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            x_threshold: 0.7,
            o_threshold: 0.8,
        }
    }
}

impl SelectionParams {
    #[must_use]
    pub const fn threshold_for(&self, side: Side) -> f32 {
        match side {
            Side::X => self.x_threshold,
            Side::O => self.o_threshold,
        }
    }
}

/// Gaussian mutation applied to offspring, one decision per parameter tensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationParams {
    /// Probability that a tensor is mutated at all.
    pub rate: f64,
    /// Probability that a mutated tensor gets the strong noise.
    pub strong_chance: f64,
    pub weak_strength: f32,
    pub strong_strength: f32,
}

impl Default for MutationParams {
    fn default() -> Self {
        Self {
            rate: 0.1,
            strong_chance: 0.05,
            weak_strength: 0.01,
            strong_strength: 0.1,
        }
    }
}

impl MutationParams {
    /// Parameters under which mutation never changes anything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            rate: 0.0,
            strong_chance: 0.0,
            weak_strength: 0.0,
            strong_strength: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub rules: Rules,
    pub population_size: usize,
    pub generations: usize,
    /// Full round-robin tournaments per generation.
    pub rounds: usize,
    pub hidden_size: usize,
    /// Probability that an agent plays a uniformly random cell.
    pub exploration_rate: f64,
    pub scoring: ScoringParams,
    pub selection: SelectionParams,
    pub mutation: MutationParams,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            population_size: 10,
            generations: 100,
            rounds: 5,
            hidden_size: Architecture::DEFAULT_HIDDEN_SIZE,
            exploration_rate: 0.05,
            scoring: ScoringParams::default(),
            selection: SelectionParams::default(),
            mutation: MutationParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ConfigError {
    #[display("invalid rules: {_0}")]
    #[from]
    Rules(RulesError),
    #[display("invalid network architecture: {_0}")]
    #[from]
    Architecture(NetworkError),
    #[display("population size must be at least 2, got {size}")]
    PopulationTooSmall { size: usize },
    #[display("generations must be at least 1")]
    NoGenerations,
    #[display("rounds per generation must be at least 1")]
    NoRounds,
    #[display("{name} must be within [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },
    #[display("{name} must be a non-negative finite number, got {value}")]
    InvalidStrength { name: &'static str, value: f32 },
    #[display("{side} population has {actual} networks, expected {expected}")]
    PopulationSizeMismatch {
        side: Side,
        expected: usize,
        actual: usize,
    },
    #[display("{side} population does not match the configured network architecture")]
    ArchitectureMismatch { side: Side },
}

fn unit_range(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { name, value })
    }
}

fn strength(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidStrength { name, value })
    }
}

impl TrainingConfig {
    /// Network architecture implied by the board size and hidden size.
    pub fn architecture(&self) -> Result<Architecture, ConfigError> {
        Ok(Architecture::for_board(
            self.rules.board_size(),
            self.hidden_size,
        )?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Rules may have been built without `Rules::new`.
        Rules::new(self.rules.board_size(), self.rules.win_line())?;
        self.architecture()?;
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall {
                size: self.population_size,
            });
        }
        if self.generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if self.rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        unit_range("exploration rate", self.exploration_rate)?;
        unit_range("mutation rate", self.mutation.rate)?;
        unit_range("strong mutation chance", self.mutation.strong_chance)?;
        unit_range("X threshold", self.selection.x_threshold.into())?;
        unit_range("O threshold", self.selection.o_threshold.into())?;
        strength("weak mutation strength", self.mutation.weak_strength)?;
        strength("strong mutation strength", self.mutation.strong_strength)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = TrainingConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.architecture().unwrap().input_size, 9);
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = TrainingConfig {
            population_size: 1,
            ..TrainingConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::PopulationTooSmall { size: 1 })
        );

        let config = TrainingConfig {
            rounds: 0,
            ..TrainingConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoRounds));

        let mut config = TrainingConfig::default();
        config.mutation.rate = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfUnitRange {
                name: "mutation rate",
                ..
            })
        ));

        let mut config = TrainingConfig::default();
        config.mutation.weak_strength = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStrength { .. })
        ));

        let config = TrainingConfig {
            hidden_size: 0,
            ..TrainingConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Architecture(NetworkError::EmptyLayer))
        );
    }

    #[test]
    fn test_thresholds_per_side() {
        let selection = SelectionParams::default();
        assert_eq!(selection.threshold_for(Side::X), 0.7);
        assert_eq!(selection.threshold_for(Side::O), 0.8);
    }
}
