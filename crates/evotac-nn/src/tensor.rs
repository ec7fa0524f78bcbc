use serde::{Deserialize, Serialize};

/// A dense row-major `f32` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl Tensor {
    #[must_use]
    pub fn zeros(shape: Vec<usize>) -> Self {
        Self::full(shape, 0.0)
    }

    #[must_use]
    pub fn full(shape: Vec<usize>, value: f32) -> Self {
        let len = shape.iter().product();
        Self {
            shape,
            data: vec![value; len],
        }
    }

    /// Builds a tensor by calling `f` once per element in storage order.
    pub fn from_fn<F>(shape: Vec<usize>, f: F) -> Self
    where
        F: FnMut(usize) -> f32,
    {
        let len = shape.iter().product();
        Self {
            shape,
            data: (0..len).map(f).collect(),
        }
    }

    /// Creates a tensor without checking that `data` fits `shape`.
    ///
    /// Use [`Tensor::is_consistent`] before trusting the result.
    #[must_use]
    pub fn from_parts(shape: Vec<usize>, data: Vec<f32>) -> Self {
        Self { shape, data }
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the element count matches the shape.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.shape.iter().product::<usize>() == self.data.len()
    }

    /// Bitwise equality, so `NaN` payloads and signed zeros count as differences.
    #[must_use]
    pub fn bit_eq(&self, other: &Self) -> bool {
        self.shape == other.shape
            && self.data.len() == other.data.len()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}
