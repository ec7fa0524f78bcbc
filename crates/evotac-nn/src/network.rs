use std::array;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Architecture, NetworkError, PARAM_COUNT, ParamKind, ParamSlot, Tensor};

const LAYER_NORM_EPS: f32 = 1e-5;

/// A feed-forward network with one tensor per [`ParamSlot`].
///
/// Serialized as its architecture plus an ordered list of named tensors, the
/// same "parameter name → array" mapping checkpoints are built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "NetworkRepr", try_from = "NetworkRepr")]
pub struct Network {
    architecture: Architecture,
    params: [Tensor; PARAM_COUNT],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NetworkRepr {
    architecture: Architecture,
    parameters: Vec<NamedTensor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NamedTensor {
    name: String,
    #[serde(flatten)]
    tensor: Tensor,
}

impl From<Network> for NetworkRepr {
    fn from(network: Network) -> Self {
        let architecture = network.architecture;
        let parameters = ParamSlot::ALL
            .into_iter()
            .zip(network.params)
            .map(|(slot, tensor)| NamedTensor {
                name: slot.name().to_owned(),
                tensor,
            })
            .collect();
        Self {
            architecture,
            parameters,
        }
    }
}

impl TryFrom<NetworkRepr> for Network {
    type Error = NetworkError;

    fn try_from(repr: NetworkRepr) -> Result<Self, Self::Error> {
        let architecture = Architecture::new(
            repr.architecture.input_size,
            repr.architecture.hidden_size,
            repr.architecture.output_size,
        )?;
        Network::from_parameters(
            architecture,
            repr.parameters.into_iter().map(|p| (p.name, p.tensor)),
        )
    }
}

impl Network {
    /// Creates a network with every parameter set to zero.
    ///
    /// All outputs of such a network are zero, so its argmax is always cell 0.
    #[must_use]
    pub fn zeros(architecture: Architecture) -> Self {
        Self::from_slot_fn(architecture, |slot| Tensor::zeros(slot.shape(&architecture)))
    }

    /// Creates a randomly initialized network.
    ///
    /// Linear weights and biases are drawn uniformly from
    /// `[-1/sqrt(fan_in), 1/sqrt(fan_in))`; layer norms start as the identity
    /// (weight 1, bias 0).
    #[must_use]
    pub fn random<R>(architecture: Architecture, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::from_slot_fn(architecture, |slot| {
            let shape = slot.shape(&architecture);
            match slot.kind() {
                ParamKind::LinearWeight | ParamKind::LinearBias => {
                    #[expect(clippy::cast_precision_loss)]
                    let bound = 1.0 / (slot.fan_in(&architecture) as f32).sqrt();
                    Tensor::from_fn(shape, |_| rng.random_range(-bound..bound))
                }
                ParamKind::NormWeight => Tensor::full(shape, 1.0),
                ParamKind::NormBias => Tensor::zeros(shape),
            }
        })
    }

    /// Builds a network by producing the tensor of every slot, in slot order.
    ///
    /// # Panics
    ///
    /// Panics if a produced tensor does not have the shape of its slot.
    pub fn from_slot_fn<F>(architecture: Architecture, mut f: F) -> Self
    where
        F: FnMut(ParamSlot) -> Tensor,
    {
        let params = array::from_fn(|i| {
            let slot = ParamSlot::ALL[i];
            let tensor = f(slot);
            assert_eq!(
                tensor.shape(),
                slot.shape(&architecture).as_slice(),
                "wrong shape for {}",
                slot.name()
            );
            tensor
        });
        Self {
            architecture,
            params,
        }
    }

    /// Builds a network from a name → tensor mapping.
    ///
    /// Every slot must appear exactly once with the shape the architecture
    /// requires; unknown names are rejected.
    pub fn from_parameters<I>(architecture: Architecture, parameters: I) -> Result<Self, NetworkError>
    where
        I: IntoIterator<Item = (String, Tensor)>,
    {
        let mut slots: [Option<Tensor>; PARAM_COUNT] = array::from_fn(|_| None);
        for (name, tensor) in parameters {
            let slot = ParamSlot::from_name(&name)
                .ok_or_else(|| NetworkError::UnexpectedParameter { name: name.clone() })?;
            let expected = slot.shape(&architecture);
            if tensor.shape() != expected.as_slice() {
                return Err(NetworkError::ParameterShape {
                    name,
                    expected,
                    actual: tensor.shape().to_vec(),
                });
            }
            if !tensor.is_consistent() {
                return Err(NetworkError::DataLength {
                    name,
                    expected: expected.iter().product(),
                    actual: tensor.len(),
                });
            }
            let entry = &mut slots[slot.index()];
            if entry.is_some() {
                return Err(NetworkError::DuplicateParameter { name });
            }
            *entry = Some(tensor);
        }

        let mut params = Vec::with_capacity(PARAM_COUNT);
        for (slot, tensor) in ParamSlot::ALL.into_iter().zip(slots) {
            let tensor = tensor.ok_or_else(|| NetworkError::MissingParameter {
                name: slot.name().to_owned(),
            })?;
            params.push(tensor);
        }
        let params = params
            .try_into()
            .unwrap_or_else(|_| unreachable!("one tensor per slot"));
        Ok(Self {
            architecture,
            params,
        })
    }

    #[must_use]
    pub fn architecture(&self) -> &Architecture {
        &self.architecture
    }

    #[must_use]
    pub fn param(&self, slot: ParamSlot) -> &Tensor {
        &self.params[slot.index()]
    }

    pub fn param_mut(&mut self, slot: ParamSlot) -> &mut Tensor {
        &mut self.params[slot.index()]
    }

    /// Iterates over `(slot, tensor)` pairs in slot order.
    pub fn params(&self) -> impl Iterator<Item = (ParamSlot, &Tensor)> + '_ {
        ParamSlot::ALL.into_iter().zip(&self.params)
    }

    pub fn params_mut(&mut self) -> impl Iterator<Item = (ParamSlot, &mut Tensor)> + '_ {
        ParamSlot::ALL.into_iter().zip(&mut self.params)
    }

    /// Bitwise equality of every parameter.
    #[must_use]
    pub fn bit_eq(&self, other: &Self) -> bool {
        self.architecture == other.architecture
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.bit_eq(b))
    }

    /// Computes one score per output for the given input.
    ///
    /// This is an inference-only pass; parameters are never touched.
    pub fn forward(&self, input: &[f32]) -> Result<Vec<f32>, NetworkError> {
        let expected = self.architecture.input_size;
        if input.len() != expected {
            return Err(NetworkError::ShapeMismatch {
                expected,
                actual: input.len(),
            });
        }

        let mut hidden = self.linear(ParamSlot::Fc1Weight, ParamSlot::Fc1Bias, input);
        self.layer_norm(ParamSlot::Ln1Weight, ParamSlot::Ln1Bias, &mut hidden);
        relu(&mut hidden);

        let mut hidden = self.linear(ParamSlot::Fc2Weight, ParamSlot::Fc2Bias, &hidden);
        self.layer_norm(ParamSlot::Ln2Weight, ParamSlot::Ln2Bias, &mut hidden);
        relu(&mut hidden);

        Ok(self.linear(ParamSlot::Fc3Weight, ParamSlot::Fc3Bias, &hidden))
    }

    fn linear(&self, weight: ParamSlot, bias: ParamSlot, input: &[f32]) -> Vec<f32> {
        let weight = self.param(weight).data();
        let bias = self.param(bias).data();
        weight
            .chunks_exact(input.len())
            .zip(bias)
            .map(|(row, b)| b + row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>())
            .collect()
    }

    fn layer_norm(&self, weight: ParamSlot, bias: ParamSlot, values: &mut [f32]) {
        #[expect(clippy::cast_precision_loss)]
        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
        let inv_std = 1.0 / (variance + LAYER_NORM_EPS).sqrt();
        let weight = self.param(weight).data();
        let bias = self.param(bias).data();
        for ((v, w), b) in values.iter_mut().zip(weight).zip(bias) {
            *v = (*v - mean) * inv_std * w + b;
        }
    }
}

fn relu(values: &mut [f32]) {
    for v in values {
        *v = v.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn small_arch() -> Architecture {
        Architecture::new(2, 2, 2).unwrap()
    }

    /// fc1 = identity, layer norms identity, fc2 = identity, fc3 swaps outputs.
    fn hand_built() -> Network {
        let arch = small_arch();
        let mut network = Network::zeros(arch);
        network
            .param_mut(ParamSlot::Fc1Weight)
            .data_mut()
            .copy_from_slice(&[1.0, 0.0, 0.0, 1.0]);
        network
            .param_mut(ParamSlot::Fc2Weight)
            .data_mut()
            .copy_from_slice(&[1.0, 0.0, 0.0, 1.0]);
        network
            .param_mut(ParamSlot::Fc3Weight)
            .data_mut()
            .copy_from_slice(&[0.0, 1.0, 1.0, 0.0]);
        for slot in [ParamSlot::Ln1Weight, ParamSlot::Ln2Weight] {
            network.param_mut(slot).data_mut().fill(1.0);
        }
        network
            .param_mut(ParamSlot::Fc3Bias)
            .data_mut()
            .copy_from_slice(&[0.5, 0.0]);
        network
    }

    #[test]
    fn test_forward_hand_built() {
        let network = hand_built();
        // fc1: [3, 1] → ln: [1, -1] (approximately) → relu: [1, 0]
        // fc2: [1, 0] → ln: [1, -1] → relu: [1, 0] → fc3 swap + bias: [0.5, 1]
        let out = network.forward(&[3.0, 1.0]).unwrap();
        assert!((out[0] - 0.5).abs() < 1e-3, "{out:?}");
        assert!((out[1] - 1.0).abs() < 1e-3, "{out:?}");
    }

    #[test]
    fn test_forward_shape_mismatch() {
        let network = Network::zeros(Architecture::for_board(3, 4).unwrap());
        assert_eq!(
            network.forward(&[0.0; 16]),
            Err(NetworkError::ShapeMismatch {
                expected: 9,
                actual: 16
            })
        );
    }

    #[test]
    fn test_random_init_ranges() {
        let arch = Architecture::for_board(3, 16).unwrap();
        let network = Network::random(arch, &mut Pcg32::seed_from_u64(1));
        let bound = 1.0 / 3.0;
        assert!(
            network
                .param(ParamSlot::Fc1Weight)
                .data()
                .iter()
                .all(|w| w.abs() <= bound)
        );
        assert!(
            network
                .param(ParamSlot::Fc2Bias)
                .data()
                .iter()
                .all(|w| w.abs() <= 0.25)
        );
        assert!(network.param(ParamSlot::Ln1Weight).data().iter().all(|w| *w == 1.0));
        assert!(network.param(ParamSlot::Ln2Bias).data().iter().all(|w| *w == 0.0));
        let scores = network.forward(&[0.0, 1.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(scores.len(), 9);
        assert!(scores.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_serde_round_trip_keeps_names() {
        let arch = small_arch();
        let network = Network::random(arch, &mut Pcg32::seed_from_u64(2));
        let json = serde_json::to_value(&network).unwrap();
        let names = json["parameters"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(names[0], "fc1.weight");
        assert_eq!(names[9], "fc3.bias");
        let back: Network = serde_json::from_value(json).unwrap();
        assert!(back.bit_eq(&network));
    }

    #[test]
    fn test_from_parameters_validation() {
        let arch = small_arch();
        let full = || {
            Network::zeros(arch)
                .params()
                .map(|(slot, t)| (slot.name().to_owned(), t.clone()))
                .collect::<Vec<_>>()
        };

        let mut missing = full();
        missing.pop();
        assert_eq!(
            Network::from_parameters(arch, missing),
            Err(NetworkError::MissingParameter {
                name: "fc3.bias".to_owned()
            })
        );

        let mut unknown = full();
        unknown.push(("fc9.weight".to_owned(), Tensor::zeros(vec![1])));
        assert!(matches!(
            Network::from_parameters(arch, unknown),
            Err(NetworkError::UnexpectedParameter { .. })
        ));

        let mut duplicate = full();
        duplicate.push(duplicate[0].clone());
        assert!(matches!(
            Network::from_parameters(arch, duplicate),
            Err(NetworkError::DuplicateParameter { .. })
        ));

        let mut wrong_shape = full();
        wrong_shape[0].1 = Tensor::zeros(vec![3, 2]);
        assert!(matches!(
            Network::from_parameters(arch, wrong_shape),
            Err(NetworkError::ParameterShape { .. })
        ));

        let mut short = full();
        short[1].1 = Tensor::from_parts(vec![2], vec![0.0]);
        assert!(matches!(
            Network::from_parameters(arch, short),
            Err(NetworkError::DataLength { .. })
        ));

        let mut reordered = full();
        reordered.reverse();
        assert!(Network::from_parameters(arch, reordered).is_ok());
    }
}
