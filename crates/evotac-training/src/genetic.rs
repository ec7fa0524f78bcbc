//! Adaptive-threshold selection and reproduction.
//!
//! After a tournament every slot of a population carries a fitness score. The
//! next generation is built in three steps:
//!
//! 1. **Rank** - Slots are sorted by fitness, best first. The sort is stable,
//!    so equal scores keep their slot order.
//! 2. **Select** - With `min`/`max` the lowest and highest score, every slot
//!    scoring at least `min + (max - min) * threshold_percentage` survives. If
//!    that leaves fewer than two survivors, the top two are kept instead so
//!    there are always two distinct parents.
//! 3. **Reproduce** - Survivors move unchanged into the next generation
//!    (elitism). The remaining slots are filled with children of two distinct,
//!    randomly sampled survivors, each built by [`crossover`] followed by
//!    [`mutate`].
//!
//! The threshold adapts to the spread of the scores: a population where
//! everyone did equally well keeps everybody, while one clear winner leaves
//! only the forced top two.
//!
//! # Example
//!
//! ```rust,ignore
//! use evotac_training::genetic::PopulationEvolver;
//!
//! let evolver = PopulationEvolver {
//!     population_size: 10,
//!     mutation: MutationParams::default(),
//! };
//! let (next, summary) = evolver.evolve(population, &scores, 0.7, &mut rng);
//! assert_eq!(next.len(), 10);
//! ```

use std::iter;

use evotac_engine::Side;
use rand::{Rng, seq::index};

use crate::{
    config::MutationParams,
    genome::{crossover, mutate},
    population::{FitnessScores, Population},
};

/// Outcome of the selection step for one side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionSummary {
    pub min_score: f32,
    pub max_score: f32,
    pub threshold: f32,
    /// Number of slots carried over unchanged.
    pub survivors: usize,
    /// Whether the top-two fallback replaced the threshold result.
    pub fallback: bool,
    pub population_size: usize,
}

/// Counts survivors among scores sorted in descending order.
///
/// # Panics
///
/// Panics if `sorted_scores` is empty or not sorted in descending order.
#[must_use]
pub fn select_survivors(sorted_scores: &[f32], threshold_percentage: f32) -> SelectionSummary {
    assert!(
        sorted_scores.is_sorted_by(|a, b| a >= b),
        "scores must be sorted in descending order"
    );
    let max_score = sorted_scores[0];
    let min_score = sorted_scores[sorted_scores.len() - 1];
    let threshold = min_score + (max_score - min_score) * threshold_percentage;
    let above = sorted_scores.iter().filter(|s| **s >= threshold).count();
    let fallback = above < 2;
    let survivors = if fallback {
        sorted_scores.len().min(2)
    } else {
        above
    };
    SelectionSummary {
        min_score,
        max_score,
        threshold,
        survivors,
        fallback,
        population_size: sorted_scores.len(),
    }
}

/// Produces the next generation of a population.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    /// Size of every generation.
    pub population_size: usize,
    pub mutation: MutationParams,
}

impl PopulationEvolver {
    /// Ranks, selects and reproduces, returning the next population version.
    ///
    /// Slot 0 of the result holds the best-scoring network of `population`.
    ///
    /// # Panics
    ///
    /// Panics if `scores` does not have one entry per slot, or if the
    /// population has fewer than two networks.
    pub fn evolve<R>(
        &self,
        population: Population,
        scores: &FitnessScores,
        threshold_percentage: f32,
        rng: &mut R,
    ) -> (Population, SelectionSummary)
    where
        R: Rng + ?Sized,
    {
        assert_eq!(population.len(), scores.len());
        assert!(population.len() >= 2, "need at least two networks to breed");

        let generation = population.generation();
        let mut ranked = iter::zip(scores.as_slice().iter().copied(), population.into_networks())
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

        let sorted_scores = ranked.iter().map(|(score, _)| *score).collect::<Vec<_>>();
        let summary = select_survivors(&sorted_scores, threshold_percentage);

        let mut next = Vec::with_capacity(self.population_size.max(summary.survivors));
        next.extend(
            ranked
                .into_iter()
                .take(summary.survivors)
                .map(|(_, network)| network),
        );
        let survivor_count = next.len();
        while next.len() < self.population_size {
            let parents = index::sample(rng, survivor_count, 2);
            let mut child = crossover(&next[parents.index(0)], &next[parents.index(1)], rng);
            mutate(&mut child, &self.mutation, rng);
            next.push(child);
        }
        next.truncate(self.population_size);

        (Population::versioned(generation + 1, next), summary)
    }
}

/// Logs a selection summary the way the trainer reports it.
pub(crate) fn log_selection(side: Side, summary: &SelectionSummary) {
    tracing::debug!(
        "{side} Selection: Min score: {:.2}, Max score: {:.2}, Threshold: {:.2}",
        summary.min_score,
        summary.max_score,
        summary.threshold,
    );
    tracing::debug!(
        "Selected {} out of {} models{}",
        summary.survivors,
        summary.population_size,
        if summary.fallback {
            " (top-two fallback)"
        } else {
            ""
        },
    );
}
