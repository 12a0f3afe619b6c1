//! The planner module pre-computes the twiddle factors a transform needs, based on the
//! sequence length, the engine, and the direction of the transform.
//!
//! A planner is built once per validated [`TransformConfig`] and shared read-only by every
//! worker of a run.
use num_complex::Complex64;

use crate::config::{Engine, TransformConfig};
use crate::twiddles::{generate_dft_twiddles, generate_fft_twiddles};

/// Reverse is for running the Inverse Discrete Fourier Transform
/// Forward is for running the regular transform
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Direction {
    /// Leave the exponent term in the twiddle factor alone
    #[default]
    Forward = 1,
    /// Multiply the exponent term in the twiddle factor by -1
    Reverse = -1,
}

impl Direction {
    /// Sign of the exponent of every twiddle factor
    pub(crate) fn sign(self) -> f64 {
        match self {
            Direction::Forward => -1.0,
            Direction::Reverse => 1.0,
        }
    }
}

/// Pre-computed twiddle factors for one run.
///
/// For [`Engine::Naive`] the table holds the `N` roots of unity `W_N^m`.
/// For [`Engine::Recursive`] it holds `exp(-j * π * i / N)` for every global butterfly index `i`.
#[derive(Debug, Clone)]
pub struct Planner {
    /// Twiddle factors, conjugated for [`Direction::Reverse`]
    pub twiddles: Vec<Complex64>,
    /// The engine this table was laid out for
    pub engine: Engine,
    /// The direction of the transform associated with this `Planner`
    pub direction: Direction,
}

impl Planner {
    /// Create a `Planner` for the sequence length, engine, and direction of `config`.
    pub fn new(config: &TransformConfig) -> Self {
        Self::for_engine(config.engine(), config.len(), config.direction())
    }

    pub(crate) fn for_engine(engine: Engine, len: usize, direction: Direction) -> Self {
        let twiddles = match engine {
            Engine::Naive => generate_dft_twiddles(len, direction),
            Engine::Recursive => generate_fft_twiddles(len, direction),
        };

        Self {
            twiddles,
            engine,
            direction,
        }
    }

    /// Length of the sequences this planner transforms
    pub fn len(&self) -> usize {
        self.twiddles.len()
    }

    /// Always `false`: a validated configuration has at least one sample
    pub fn is_empty(&self) -> bool {
        self.twiddles.is_empty()
    }
}
