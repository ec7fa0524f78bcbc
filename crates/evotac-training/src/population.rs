use evotac_nn::{Architecture, Network};
use rand::Rng;

use crate::agent::Agent;

/// One side's networks for a single generation.
///
/// A population is a versioned arena: slots are addressed by index, and
/// evolution consumes one version to produce the next (see
/// [`PopulationEvolver`](crate::genetic::PopulationEvolver)). Networks are
/// owned by exactly one slot; survivors move into the next version rather
/// than being shared.
#[derive(Debug, Clone, Default)]
pub struct Population {
    generation: usize,
    networks: Vec<Network>,
}

impl Population {
    /// Creates generation 0 with `count` randomly initialized networks.
    #[must_use]
    pub fn random<R>(architecture: Architecture, count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let networks = (0..count)
            .map(|_| Network::random(architecture, rng))
            .collect();
        Self::from_networks(networks)
    }

    /// Creates generation 0 from existing networks.
    #[must_use]
    pub fn from_networks(networks: Vec<Network>) -> Self {
        Self {
            generation: 0,
            networks,
        }
    }

    pub(crate) fn versioned(generation: usize, networks: Vec<Network>) -> Self {
        Self {
            generation,
            networks,
        }
    }

    /// How many times this population has been evolved.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    #[must_use]
    pub fn into_networks(self) -> Vec<Network> {
        self.networks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Slot 0, which holds the top survivor once the population has evolved.
    #[must_use]
    pub fn best(&self) -> Option<&Network> {
        self.networks.first()
    }

    /// Fresh agents for every slot, in slot order.
    #[must_use]
    pub fn agents(&self, exploration_rate: f64) -> Vec<Agent<'_>> {
        self.networks
            .iter()
            .map(|network| Agent::new(network, exploration_rate))
            .collect()
    }
}

/// Running fitness accumulator, one value per population slot.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessScores(Vec<f32>);

impl FitnessScores {
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    pub fn reset(&mut self) {
        self.0.fill(0.0);
    }

    pub fn add(&mut self, slot: usize, delta: f32) {
        self.0[slot] += delta;
    }

    #[must_use]
    pub fn get(&self, slot: usize) -> f32 {
        self.0[slot]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f32>> for FitnessScores {
    fn from(scores: Vec<f32>) -> Self {
        Self(scores)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_random_population() {
        let arch = Architecture::for_board(3, 8).unwrap();
        let population = Population::random(arch, 4, &mut Pcg32::seed_from_u64(9));
        assert_eq!(population.len(), 4);
        assert_eq!(population.generation(), 0);
        assert!(!population.networks()[0].bit_eq(&population.networks()[1]));
        assert_eq!(population.agents(0.05).len(), 4);
        let next = Population::versioned(1, population.into_networks());
        assert_eq!(next.generation(), 1);
        assert_eq!(next.best().map(Network::architecture), Some(&arch));
    }

    #[test]
    fn test_fitness_reset() {
        let mut scores = FitnessScores::zeros(3);
        scores.add(1, 4.5);
        scores.add(1, -5.0);
        assert_eq!(scores.as_slice(), &[0.0, -0.5, 0.0]);
        scores.reset();
        assert_eq!(scores, FitnessScores::zeros(3));
    }
}
