use crate::util::OutDim;
use serde::{Deserialize, Serialize};

fn default_pixel_scale() -> f64 {
    1.0 / 255.0
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Cnn`](super::Cnn).
pub struct CnnConfig {
    pub(super) n_stack: usize,
    pub(super) out_dim: usize,
    #[serde(default = "default_pixel_scale")]
    pub(super) pixel_scale: f64,
}

impl CnnConfig {
    /// Constructs [`CnnConfig`].
    ///
    /// * `n_stack` - Number of stacked 84x84 frames of an observation.
    /// * `out_dim` - Dimension of the feature vector.
    pub fn new(n_stack: usize, out_dim: usize) -> Self {
        Self {
            n_stack,
            out_dim,
            pixel_scale: default_pixel_scale(),
        }
    }

    /// Sets the factor multiplied to the input pixels.
    pub fn pixel_scale(mut self, v: f64) -> Self {
        self.pixel_scale = v;
        self
    }
}

impl OutDim for CnnConfig {
    fn get_out_dim(&self) -> usize {
        self.out_dim
    }

    fn set_out_dim(&mut self, v: usize) {
        self.out_dim = v;
    }
}
