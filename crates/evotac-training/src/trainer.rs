//! The generation loop.

use std::mem;

use evotac_engine::{MatchResult, Side, play_match};
use evotac_nn::{Network, NetworkError};
use rand::Rng;

use crate::{
    agent::Agent,
    config::{ConfigError, TrainingConfig},
    genetic::{PopulationEvolver, SelectionSummary, log_selection},
    history::GenerationRecord,
    population::{FitnessScores, Population},
    scoring::MatchTally,
    tournament::Tournament,
};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TrainingError {
    #[display("invalid configuration: {_0}")]
    Config(ConfigError),
    #[display("network evaluation failed: {_0}")]
    Network(NetworkError),
}

/// Everything produced by one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub record: GenerationRecord,
    pub tally: MatchTally,
    pub x_selection: SelectionSummary,
    pub o_selection: SelectionSummary,
}

impl GenerationReport {
    #[must_use]
    pub fn selection(&self, side: Side) -> &SelectionSummary {
        match side {
            Side::X => &self.x_selection,
            Side::O => &self.o_selection,
        }
    }
}

/// Best network of one side after training.
#[derive(Debug, Clone)]
pub struct Champion {
    pub network: Network,
    /// Its score in the last tournament, if any generation ran.
    pub fitness: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub records: Vec<GenerationRecord>,
    pub best_x: Champion,
    pub best_o: Champion,
}

/// Drives the evolution of the X and O populations, one generation at a time.
///
/// All randomness comes from the injected source `R`; with a seeded source
/// and the same configuration two trainers produce identical runs.
///
/// # Example
///
/// ```
/// use evotac_training::{RunSeed, Trainer, TrainingConfig, TrainingError};
///
/// let config = TrainingConfig {
///     population_size: 4,
///     generations: 2,
///     rounds: 1,
///     hidden_size: 8,
///     ..TrainingConfig::default()
/// };
/// let mut trainer = Trainer::new(config, RunSeed::from_u128(1).rng()).unwrap();
/// let outcome = trainer.train(|_report| Ok::<_, TrainingError>(())).unwrap();
/// assert_eq!(outcome.records.len(), 2);
/// assert_eq!(outcome.records[0].x_wins + outcome.records[0].o_wins + outcome.records[0].draws, 16);
/// ```
#[derive(Debug)]
pub struct Trainer<R> {
    config: TrainingConfig,
    evolver: PopulationEvolver,
    x_population: Population,
    o_population: Population,
    x_scores: FitnessScores,
    o_scores: FitnessScores,
    records: Vec<GenerationRecord>,
    last_report: Option<GenerationReport>,
    rng: R,
}

impl<R> Trainer<R>
where
    R: Rng,
{
    /// Creates a trainer with freshly initialized populations for both sides.
    pub fn new(config: TrainingConfig, mut rng: R) -> Result<Self, TrainingError> {
        config.validate()?;
        let architecture = config.architecture()?;
        let x_population = Population::random(architecture, config.population_size, &mut rng);
        let o_population = Population::random(architecture, config.population_size, &mut rng);
        Self::with_populations(config, x_population, o_population, rng)
    }

    /// Creates a trainer starting from the given populations.
    pub fn with_populations(
        config: TrainingConfig,
        x_population: Population,
        o_population: Population,
        rng: R,
    ) -> Result<Self, TrainingError> {
        config.validate()?;
        let architecture = config.architecture()?;
        for (side, population) in [(Side::X, &x_population), (Side::O, &o_population)] {
            if population.len() != config.population_size {
                return Err(ConfigError::PopulationSizeMismatch {
                    side,
                    expected: config.population_size,
                    actual: population.len(),
                }
                .into());
            }
            if population
                .networks()
                .iter()
                .any(|network| *network.architecture() != architecture)
            {
                return Err(ConfigError::ArchitectureMismatch { side }.into());
            }
        }

        let evolver = PopulationEvolver {
            population_size: config.population_size,
            mutation: config.mutation,
        };
        Ok(Self {
            evolver,
            x_scores: FitnessScores::zeros(config.population_size),
            o_scores: FitnessScores::zeros(config.population_size),
            x_population,
            o_population,
            records: Vec::with_capacity(config.generations),
            last_report: None,
            config,
            rng,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    #[must_use]
    pub fn population(&self, side: Side) -> &Population {
        match side {
            Side::X => &self.x_population,
            Side::O => &self.o_population,
        }
    }

    #[must_use]
    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    /// Number of generations completed so far.
    #[must_use]
    pub fn completed_generations(&self) -> usize {
        self.records.len()
    }

    /// Runs one tournament and evolves both populations.
    ///
    /// A network error aborts the generation before either population is
    /// replaced.
    pub fn run_generation(&mut self) -> Result<GenerationReport, TrainingError> {
        let tournament = Tournament {
            rules: &self.config.rules,
            rounds: self.config.rounds,
            exploration_rate: self.config.exploration_rate,
            scoring: &self.config.scoring,
        };
        let tally = tournament.run(
            &self.x_population,
            &self.o_population,
            &mut self.x_scores,
            &mut self.o_scores,
            &mut self.rng,
        )?;

        let selection = self.config.selection;
        let (x_population, x_selection) = self.evolver.evolve(
            mem::take(&mut self.x_population),
            &self.x_scores,
            selection.threshold_for(Side::X),
            &mut self.rng,
        );
        let (o_population, o_selection) = self.evolver.evolve(
            mem::take(&mut self.o_population),
            &self.o_scores,
            selection.threshold_for(Side::O),
            &mut self.rng,
        );
        self.x_population = x_population;
        self.o_population = o_population;

        let record = GenerationRecord {
            generation: self.records.len() + 1,
            x_wins: tally.x_wins,
            o_wins: tally.o_wins,
            draws: tally.draws,
        };
        self.records.push(record);

        log_selection(Side::X, &x_selection);
        log_selection(Side::O, &o_selection);
        tracing::info!(
            "Generation {}: X wins: {}, O wins: {}, draws: {} (forfeits: {})",
            record.generation,
            record.x_wins,
            record.o_wins,
            record.draws,
            tally.forfeits,
        );

        let report = GenerationReport {
            record,
            tally,
            x_selection,
            o_selection,
        };
        self.last_report = Some(report.clone());
        Ok(report)
    }

    /// Runs the remaining generations, handing every report to `on_generation`.
    ///
    /// Stops at the first error from either the trainer or the callback.
    pub fn train<F, E>(&mut self, mut on_generation: F) -> Result<TrainingOutcome, E>
    where
        F: FnMut(&GenerationReport) -> Result<(), E>,
        E: From<TrainingError>,
    {
        tracing::info!(
            "Training {} generations: population {}, rounds {}, board {}x{} (win line {})",
            self.config.generations,
            self.config.population_size,
            self.config.rounds,
            self.config.rules.board_size(),
            self.config.rules.board_size(),
            self.config.rules.win_line(),
        );
        while self.records.len() < self.config.generations {
            let report = self.run_generation()?;
            on_generation(&report)?;
        }
        Ok(self.outcome())
    }

    /// Slot 0 of a side, i.e. the top survivor of the last generation.
    #[must_use]
    pub fn champion(&self, side: Side) -> Champion {
        let network = self.population(side).networks()[0].clone();
        let fitness = self
            .last_report
            .as_ref()
            .map(|report| report.selection(side).max_score);
        Champion { network, fitness }
    }

    #[must_use]
    pub fn outcome(&self) -> TrainingOutcome {
        TrainingOutcome {
            records: self.records.clone(),
            best_x: self.champion(Side::X),
            best_o: self.champion(Side::O),
        }
    }

    /// Plays the two champions against each other without exploration.
    pub fn exhibition_match(&mut self) -> Result<MatchResult, TrainingError> {
        let x_agent = Agent::new(&self.x_population.networks()[0], 0.0);
        let o_agent = Agent::new(&self.o_population.networks()[0], 0.0);
        Ok(play_match(
            &self.config.rules,
            &x_agent,
            &o_agent,
            &mut self.rng,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use evotac_engine::Rules;
    use evotac_nn::Architecture;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn small_config() -> TrainingConfig {
        TrainingConfig {
            population_size: 4,
            generations: 3,
            rounds: 1,
            hidden_size: 8,
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_generation_keeps_population_size() {
        let mut trainer = Trainer::new(small_config(), Pcg32::seed_from_u64(41)).unwrap();
        for generation in 1..=3 {
            let report = trainer.run_generation().unwrap();
            assert_eq!(report.record.generation, generation);
            assert_eq!(report.record.total(), 16);
            for side in Side::ALL {
                assert_eq!(trainer.population(side).len(), 4);
                assert_eq!(trainer.population(side).generation(), generation);
            }
        }
        assert_eq!(trainer.completed_generations(), 3);
    }

    #[test]
    fn test_champion_is_slot_zero_with_max_score() {
        let mut trainer = Trainer::new(small_config(), Pcg32::seed_from_u64(42)).unwrap();
        assert_eq!(trainer.champion(Side::X).fitness, None);
        let report = trainer.run_generation().unwrap();
        let champion = trainer.champion(Side::O);
        assert_eq!(champion.fitness, Some(report.o_selection.max_score));
        assert!(
            champion
                .network
                .bit_eq(&trainer.population(Side::O).networks()[0])
        );
    }

    #[test]
    fn test_rejects_mismatched_populations() {
        let config = small_config();
        let arch = config.architecture().unwrap();
        let mut rng = Pcg32::seed_from_u64(43);
        let x = Population::random(arch, 4, &mut rng);
        let o = Population::random(arch, 3, &mut rng);
        let err = Trainer::with_populations(config.clone(), x.clone(), o, rng.clone()).unwrap_err();
        assert_eq!(
            err,
            TrainingError::Config(ConfigError::PopulationSizeMismatch {
                side: Side::O,
                expected: 4,
                actual: 3
            })
        );

        let other = Architecture::for_board(3, 16).unwrap();
        let o = Population::random(other, 4, &mut rng);
        let err = Trainer::with_populations(config, x, o, rng).unwrap_err();
        assert_eq!(
            err,
            TrainingError::Config(ConfigError::ArchitectureMismatch { side: Side::O })
        );
    }

    #[test]
    fn test_callback_error_stops_training() {
        let mut trainer = Trainer::new(small_config(), Pcg32::seed_from_u64(44)).unwrap();
        let mut calls = 0;
        let result = trainer.train(|report| {
            calls += 1;
            if report.record.generation == 2 {
                Err(TrainingError::Config(ConfigError::NoRounds))
            } else {
                Ok(())
            }
        });
        assert!(result.is_err());
        assert_eq!(calls, 2);
        assert_eq!(trainer.completed_generations(), 2);
    }

    #[test]
    fn test_exhibition_match_is_greedy() {
        let config = TrainingConfig {
            rules: Rules::new(3, 3).unwrap(),
            ..small_config()
        };
        let mut trainer = Trainer::new(config, Pcg32::seed_from_u64(45)).unwrap();
        trainer.run_generation().unwrap();
        let first = trainer.exhibition_match().unwrap();
        let second = trainer.exhibition_match().unwrap();
        assert_eq!(first, second);
    }
}
