//! All-pairs tournament between the X and O populations.

use evotac_engine::{Rules, play_match};
use evotac_nn::NetworkError;
use rand::Rng;

use crate::{
    config::ScoringParams,
    population::{FitnessScores, Population},
    scoring::{MatchTally, score_match},
};

/// Settings of one tournament.
#[derive(Debug, Clone, Copy)]
pub struct Tournament<'a> {
    pub rules: &'a Rules,
    pub rounds: usize,
    pub exploration_rate: f64,
    pub scoring: &'a ScoringParams,
}

impl Tournament<'_> {
    /// Number of matches [`Tournament::run`] plays for the given populations.
    #[must_use]
    pub fn match_count(&self, x_population: &Population, o_population: &Population) -> usize {
        self.rounds * x_population.len() * o_population.len()
    }

    /// Resets both score buffers, then plays every X slot against every O slot
    /// once per round, scoring each match as soon as it ends.
    ///
    /// Matches run one after another on the shared random source, so a
    /// seeded source makes the whole tournament reproducible.
    pub fn run<R>(
        &self,
        x_population: &Population,
        o_population: &Population,
        x_scores: &mut FitnessScores,
        o_scores: &mut FitnessScores,
        rng: &mut R,
    ) -> Result<MatchTally, NetworkError>
    where
        R: Rng + ?Sized,
    {
        assert_eq!(x_scores.len(), x_population.len());
        assert_eq!(o_scores.len(), o_population.len());
        x_scores.reset();
        o_scores.reset();

        let x_agents = x_population.agents(self.exploration_rate);
        let o_agents = o_population.agents(self.exploration_rate);
        let max_moves = self.rules.max_moves();
        let mut tally = MatchTally::default();
        let match_count = self.match_count(x_population, o_population);
        tracing::debug!("Playing {match_count} matches");

        for _ in 0..self.rounds {
            for (i, x_agent) in x_agents.iter().enumerate() {
                for (j, o_agent) in o_agents.iter().enumerate() {
                    let result = play_match(self.rules, x_agent, o_agent, rng)?;
                    score_match(
                        &result,
                        max_moves,
                        self.scoring,
                        (x_scores, i),
                        (o_scores, j),
                    );
                    tally.record(&result);
                }
            }
        }
        debug_assert_eq!(tally.total(), match_count);
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use evotac_nn::{Architecture, Network};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_match_count_is_rounds_times_pairs() {
        let rules = Rules::default();
        let scoring = ScoringParams::default();
        let tournament = Tournament {
            rules: &rules,
            rounds: 2,
            exploration_rate: 0.05,
            scoring: &scoring,
        };
        let mut rng = Pcg32::seed_from_u64(31);
        let arch = Architecture::for_board(3, 8).unwrap();
        let x = Population::random(arch, 3, &mut rng);
        let o = Population::random(arch, 3, &mut rng);
        let mut x_scores = FitnessScores::from(vec![1.0e6; 3]);
        let mut o_scores = FitnessScores::zeros(3);

        let tally = tournament
            .run(&x, &o, &mut x_scores, &mut o_scores, &mut rng)
            .unwrap();

        assert_eq!(tally.total(), 18);
        assert_eq!(tournament.match_count(&x, &o), 18);
        // Stale scores were cleared before play.
        assert!(x_scores.as_slice().iter().all(|s| *s < 1.0e5));
    }

    #[test]
    fn test_zero_networks_play_deterministically() {
        // Every zero network plays cell 0; O's reply is illegal, so X wins
        // by forfeit after a single move.
        let rules = Rules::default();
        let scoring = ScoringParams::default();
        let tournament = Tournament {
            rules: &rules,
            rounds: 1,
            exploration_rate: 0.0,
            scoring: &scoring,
        };
        let arch = Architecture::for_board(3, 4).unwrap();
        let x = Population::from_networks(vec![Network::zeros(arch); 2]);
        let o = Population::from_networks(vec![Network::zeros(arch); 2]);
        let mut x_scores = FitnessScores::zeros(2);
        let mut o_scores = FitnessScores::zeros(2);

        let tally = tournament
            .run(&x, &o, &mut x_scores, &mut o_scores, &mut Pcg32::seed_from_u64(0))
            .unwrap();

        assert_eq!(tally.x_wins, 4);
        assert_eq!(tally.forfeits, 4);
        let per_win = crate::scoring::move_score(1, 9, &scoring) * 2.0;
        for slot in 0..2 {
            assert!((x_scores.get(slot) - 2.0 * per_win).abs() < 1e-5);
            assert_eq!(o_scores.get(slot), -10.0);
        }
    }

    #[test]
    fn test_shape_mismatch_aborts() {
        let rules = Rules::new(4, 3).unwrap();
        let scoring = ScoringParams::default();
        let tournament = Tournament {
            rules: &rules,
            rounds: 1,
            exploration_rate: 0.0,
            scoring: &scoring,
        };
        let arch = Architecture::for_board(3, 4).unwrap();
        let x = Population::from_networks(vec![Network::zeros(arch); 2]);
        let o = Population::from_networks(vec![Network::zeros(arch); 2]);
        let result = tournament.run(
            &x,
            &o,
            &mut FitnessScores::zeros(2),
            &mut FitnessScores::zeros(2),
            &mut Pcg32::seed_from_u64(0),
        );
        assert_eq!(
            result,
            Err(NetworkError::ShapeMismatch {
                expected: 9,
                actual: 16
            })
        );
    }
}
