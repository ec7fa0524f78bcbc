//! Evolutionary training of tic-tac-toe playing networks.
//!
//! Two populations of networks, one per side, co-evolve: every X network
//! plays every O network, match outcomes are turned into fitness scores, and
//! each population is then rebuilt from its best scorers.
//!
//! # How Training Works
//!
//! 1. **Population** - Create `population_size` randomly initialized networks per side
//! 2. **Tournament** - Play `rounds` full round-robins of X against O ([`Tournament`])
//! 3. **Fitness** - Reward wins and draws, penalize losses, all scaled by game length ([`scoring`])
//! 4. **Selection** - Keep the networks scoring above a side-specific fraction of the score range
//! 5. **Reproduction** - Refill with mutated uniform crossovers of two survivors ([`genome`])
//! 6. **Repeat** - Once per generation, recording X wins, O wins and draws
//!
//! # Architecture
//!
//! ```text
//! Trainer
//!     ↓ runs
//! Tournament ── Agent (network + exploration) ── evotac_engine::play_match
//!     ↓ produces
//! FitnessScores
//!     ↓ guides
//! PopulationEvolver (selection, crossover, mutation)
//!     ↓ yields
//! next Population version
//! ```
//!
//! # Reproducibility
//!
//! Every random draw of a run comes from the single source handed to
//! [`Trainer::new`]. Building it from a [`RunSeed`] makes a run repeatable
//! for a fixed configuration.
//!
//! # Limitations
//!
//! - Fitness is relative to the opposing population only, so scores from
//!   different generations are not comparable.
//! - Matches run sequentially.

pub use self::{
    agent::Agent,
    config::{ConfigError, MutationParams, ScoringParams, SelectionParams, TrainingConfig},
    genetic::{PopulationEvolver, SelectionSummary},
    history::{GenerationRecord, HistoryWriter},
    population::{FitnessScores, Population},
    scoring::MatchTally,
    seed::{ParseSeedError, RunSeed},
    tournament::Tournament,
    trainer::{Champion, GenerationReport, Trainer, TrainingError, TrainingOutcome},
};

pub mod agent;
pub mod config;
pub mod genetic;
pub mod genome;
pub mod history;
pub mod population;
pub mod scoring;
pub mod seed;
pub mod tournament;
pub mod trainer;
