use serde::{Deserialize, Serialize};

use crate::NetworkError;

/// Layer sizes of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Architecture {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
}

impl Architecture {
    pub const DEFAULT_HIDDEN_SIZE: usize = 128;

    pub fn new(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
    ) -> Result<Self, NetworkError> {
        if input_size == 0 || hidden_size == 0 || output_size == 0 {
            return Err(NetworkError::EmptyLayer);
        }
        Ok(Self {
            input_size,
            hidden_size,
            output_size,
        })
    }

    /// One input and one output per cell of a `board_size x board_size` board.
    pub fn for_board(board_size: usize, hidden_size: usize) -> Result<Self, NetworkError> {
        let cells = board_size * board_size;
        Self::new(cells, hidden_size, cells)
    }

    /// Total number of scalar parameters.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        ParamSlot::ALL
            .iter()
            .map(|slot| slot.shape(self).iter().product::<usize>())
            .sum()
    }
}

/// What a parameter slot is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    LinearWeight,
    LinearBias,
    NormWeight,
    NormBias,
}

/// The statically known parameter tensors of the network, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSlot {
    Fc1Weight,
    Fc1Bias,
    Ln1Weight,
    Ln1Bias,
    Fc2Weight,
    Fc2Bias,
    Ln2Weight,
    Ln2Bias,
    Fc3Weight,
    Fc3Bias,
}

pub const PARAM_COUNT: usize = ParamSlot::ALL.len();

impl ParamSlot {
    pub const ALL: [ParamSlot; 10] = [
        ParamSlot::Fc1Weight,
        ParamSlot::Fc1Bias,
        ParamSlot::Ln1Weight,
        ParamSlot::Ln1Bias,
        ParamSlot::Fc2Weight,
        ParamSlot::Fc2Bias,
        ParamSlot::Ln2Weight,
        ParamSlot::Ln2Bias,
        ParamSlot::Fc3Weight,
        ParamSlot::Fc3Bias,
    ];

    /// Position of this slot in [`ParamSlot::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ParamSlot::Fc1Weight => "fc1.weight",
            ParamSlot::Fc1Bias => "fc1.bias",
            ParamSlot::Ln1Weight => "ln1.weight",
            ParamSlot::Ln1Bias => "ln1.bias",
            ParamSlot::Fc2Weight => "fc2.weight",
            ParamSlot::Fc2Bias => "fc2.bias",
            ParamSlot::Ln2Weight => "ln2.weight",
            ParamSlot::Ln2Bias => "ln2.bias",
            ParamSlot::Fc3Weight => "fc3.weight",
            ParamSlot::Fc3Bias => "fc3.bias",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.name() == name)
    }

    #[must_use]
    pub const fn kind(self) -> ParamKind {
        match self {
            ParamSlot::Fc1Weight | ParamSlot::Fc2Weight | ParamSlot::Fc3Weight => {
                ParamKind::LinearWeight
            }
            ParamSlot::Fc1Bias | ParamSlot::Fc2Bias | ParamSlot::Fc3Bias => ParamKind::LinearBias,
            ParamSlot::Ln1Weight | ParamSlot::Ln2Weight => ParamKind::NormWeight,
            ParamSlot::Ln1Bias | ParamSlot::Ln2Bias => ParamKind::NormBias,
        }
    }

    /// Number of inputs feeding the layer this slot belongs to.
    #[must_use]
    pub const fn fan_in(self, arch: &Architecture) -> usize {
        match self {
            ParamSlot::Fc1Weight | ParamSlot::Fc1Bias => arch.input_size,
            _ => arch.hidden_size,
        }
    }

    /// Row-major shape of the tensor in this slot.
    #[must_use]
    pub fn shape(self, arch: &Architecture) -> Vec<usize> {
        let Architecture {
            input_size,
            hidden_size,
            output_size,
        } = *arch;
        match self {
            ParamSlot::Fc1Weight => vec![hidden_size, input_size],
            ParamSlot::Fc2Weight => vec![hidden_size, hidden_size],
            ParamSlot::Fc3Weight => vec![output_size, hidden_size],
            ParamSlot::Fc3Bias => vec![output_size],
            ParamSlot::Fc1Bias
            | ParamSlot::Fc2Bias
            | ParamSlot::Ln1Weight
            | ParamSlot::Ln1Bias
            | ParamSlot::Ln2Weight
            | ParamSlot::Ln2Bias => vec![hidden_size],
        }
    }
}
