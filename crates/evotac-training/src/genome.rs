//! Genetic operators on network parameters.
//!
//! Both operators work at the granularity of whole parameter tensors
//! ([`ParamSlot`](evotac_nn::ParamSlot)s), never individual elements:
//!
//! - [`crossover`] copies each tensor from one of the two parents
//! - [`mutate`] adds Gaussian noise to a randomly chosen subset of tensors

use evotac_nn::Network;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::config::MutationParams;

/// Builds a child whose tensors are each copied from parent `a` or `b` with
/// equal probability, independently per slot.
///
/// # Panics
///
/// Panics if the parents have different architectures.
pub fn crossover<R>(a: &Network, b: &Network, rng: &mut R) -> Network
where
    R: Rng + ?Sized,
{
    assert_eq!(a.architecture(), b.architecture());
    Network::from_slot_fn(*a.architecture(), |slot| {
        if rng.random_bool(0.5) {
            a.param(slot).clone()
        } else {
            b.param(slot).clone()
        }
    })
}

/// Perturbs `network` in place.
///
/// Each tensor is picked with probability `params.rate`. A picked tensor gets
/// `N(0, 1) * strong_strength` noise added to every element with probability
/// `params.strong_chance`, and `N(0, 1) * weak_strength` otherwise.
pub fn mutate<R>(network: &mut Network, params: &MutationParams, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for (_slot, tensor) in network.params_mut() {
        if !rng.random_bool(params.rate) {
            continue;
        }
        let strength = if rng.random_bool(params.strong_chance) {
            params.strong_strength
        } else {
            params.weak_strength
        };
        for value in tensor.data_mut() {
            let noise: f32 = rng.sample(StandardNormal);
            *value += noise * strength;
        }
    }
}
