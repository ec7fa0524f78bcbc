//! Fixed-architecture multilayer perceptron used as a move-scoring function.
//!
//! The network maps a flattened board observation to one score per cell:
//!
//! ```text
//! input (n²) → Linear → LayerNorm → ReLU → Linear → LayerNorm → ReLU → Linear → scores (n²)
//! ```
//!
//! Its parameters are a fixed list of named tensors declared by [`ParamSlot`].
//! Every network built for the same [`Architecture`] has identical slot shapes,
//! so two networks can be recombined slot by slot. There is no training code
//! here; parameters are only ever changed from outside (see `evotac-training`).
//!
//! # Example
//!
//! ```
//! use evotac_nn::{Architecture, Network};
//!
//! let arch = Architecture::for_board(3, 16).unwrap();
//! let network = Network::zeros(arch);
//! let scores = network.forward(&[0.0; 9]).unwrap();
//! assert_eq!(scores, vec![0.0; 9]);
//! assert!(network.forward(&[0.0; 4]).is_err());
//! ```

pub use self::{architecture::*, network::*, tensor::*};

mod architecture;
mod network;
mod tensor;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum NetworkError {
    #[display("input has {actual} values, network expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[display("layer sizes must be non-zero")]
    EmptyLayer,
    #[display("missing parameter '{name}'")]
    MissingParameter { name: String },
    #[display("unexpected parameter '{name}'")]
    UnexpectedParameter { name: String },
    #[display("parameter '{name}' given more than once")]
    DuplicateParameter { name: String },
    #[display("parameter '{name}' has shape {actual:?}, expected {expected:?}")]
    ParameterShape {
        name: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[display("parameter '{name}' holds {actual} values, its shape needs {expected}")]
    DataLength {
        name: String,
        expected: usize,
        actual: usize,
    },
}
