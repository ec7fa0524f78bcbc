use anyhow::Context as _;
use chrono::Utc;
use evotac_engine::{GameRecord, Side};
use evotac_training::{
    HistoryWriter, MutationParams, RunSeed, ScoringParams, SelectionParams, Trainer,
    TrainingConfig,
};

use crate::{
    command::BoardArg,
    schema::checkpoint::Checkpoint,
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    #[clap(flatten)]
    board: BoardArg,
    /// Number of generations
    #[arg(short = 'g', long, default_value_t = 100)]
    generations: usize,
    /// Networks per side
    #[arg(short = 'p', long = "population", default_value_t = 10)]
    population_size: usize,
    /// Round-robin tournaments per generation
    #[arg(short = 'r', long, default_value_t = 5)]
    rounds: usize,
    /// Width of the two hidden layers
    #[arg(long, default_value_t = 128)]
    hidden_size: usize,
    /// Probability of playing a random cell during training
    #[arg(long, default_value_t = 0.05)]
    exploration_rate: f64,
    /// Survival threshold of X, as a fraction of the score range
    #[arg(long, default_value_t = 0.7)]
    x_threshold: f32,
    /// Survival threshold of O, as a fraction of the score range
    #[arg(long, default_value_t = 0.8)]
    o_threshold: f32,
    /// Probability that a parameter tensor of a child is mutated
    #[arg(long, default_value_t = 0.1)]
    mutation_rate: f64,
    /// Probability that a mutation uses the strong noise
    #[arg(long, default_value_t = 0.05)]
    strong_mutation_chance: f64,
    /// Standard deviation of the weak mutation noise
    #[arg(long, default_value_t = 0.01)]
    weak_mutation_strength: f32,
    /// Standard deviation of the strong mutation noise
    #[arg(long, default_value_t = 0.1)]
    strong_mutation_strength: f32,
    #[arg(long, default_value_t = 2.0)]
    x_win_multiplier: f32,
    #[arg(long, default_value_t = 3.0)]
    o_win_multiplier: f32,
    #[arg(long, default_value_t = 5.0)]
    loss_penalty: f32,
    #[arg(long, default_value_t = 1.0)]
    x_draw_reward: f32,
    #[arg(long, default_value_t = 5.0)]
    o_draw_reward: f32,
    /// Seed of the run as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<RunSeed>,
}

impl TrainArg {
    pub(crate) fn config(&self) -> anyhow::Result<TrainingConfig> {
        let config = TrainingConfig {
            rules: self.board.rules()?,
            population_size: self.population_size,
            generations: self.generations,
            rounds: self.rounds,
            hidden_size: self.hidden_size,
            exploration_rate: self.exploration_rate,
            scoring: ScoringParams {
                x_win_multiplier: self.x_win_multiplier,
                o_win_multiplier: self.o_win_multiplier,
                loss_penalty: self.loss_penalty,
                x_draw_reward: self.x_draw_reward,
                o_draw_reward: self.o_draw_reward,
                ..ScoringParams::default()
            },
            selection: SelectionParams {
                x_threshold: self.x_threshold,
                o_threshold: self.o_threshold,
            },
            mutation: MutationParams {
                rate: self.mutation_rate,
                strong_chance: self.strong_mutation_chance,
                weak_strength: self.weak_mutation_strength,
                strong_strength: self.strong_mutation_strength,
            },
        };
        config.validate()?;
        Ok(config)
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let config = arg.config()?;
    let rules = config.rules;
    let parameter_count = config.architecture()?.parameter_count();
    let data_dir = arg.board.data_dir();
    let seed = arg.seed.unwrap_or_else(rand::random);
    tracing::info!("Run seed: {seed}");

    let log_path = data_dir.log_path(&rules);
    let mut history = HistoryWriter::new(util::create_file(&log_path)?)
        .with_context(|| format!("Failed to write training log: {}", log_path.display()))?;

    let mut trainer = Trainer::new(config, seed.rng())?;
    let outcome = trainer.train(|report| {
        history
            .append(&report.record)
            .with_context(|| format!("Failed to write training log: {}", log_path.display()))
    })?;

    eprintln!("Training completed.");
    eprintln!("  Seed: {seed}");
    eprintln!("  Generations: {}", outcome.records.len());
    eprintln!("  Parameters per network: {parameter_count}");
    eprintln!("  Log: {}", log_path.display());

    let trained_at = Utc::now();
    for (side, champion) in [(Side::X, &outcome.best_x), (Side::O, &outcome.best_o)] {
        let checkpoint = Checkpoint {
            side,
            board_size: rules.board_size(),
            win_line: rules.win_line(),
            trained_at,
            generations: outcome.records.len(),
            final_fitness: champion.fitness,
            seed,
            network: champion.network.clone(),
        };
        let path = data_dir.model_path(side, &rules);
        util::write_json_file("checkpoint", &path, &checkpoint)?;
        eprintln!();
        eprintln!("Model {side} saved successfully");
        eprintln!("  Path: {}", path.display());
        if let Some(fitness) = checkpoint.final_fitness {
            eprintln!("  Final fitness: {fitness:.3}");
        }
    }

    let result = trainer.exhibition_match()?;
    let number = data_dir.next_game_number()?;
    let path = data_dir.game_path(number);
    util::write_json_file("game", &path, &GameRecord::from(&result))?;
    eprintln!();
    eprintln!(
        "Exhibition game: {} after {} moves",
        result.outcome.description(),
        result.moves_played
    );
    eprintln!("  Saved as game {number}: {}", path.display());

    Ok(())
}
