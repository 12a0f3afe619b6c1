//! Input and output sequences of one transform run

use num_complex::Complex64;
use num_traits::Zero;

use crate::error::{FftError, Result};

/// Owns the time-domain input and the same-length frequency-domain output.
///
/// The input is read-only once the buffer is built. The output is written by exactly one
/// engine run; a second run on the same buffer is rejected.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    input: Vec<Complex64>,
    output: Vec<Complex64>,
    transformed: bool,
}

impl SampleBuffer {
    /// Create a buffer over `input`, with a zeroed output of the same length
    pub fn new(input: Vec<Complex64>) -> Self {
        let output = vec![Complex64::zero(); input.len()];
        Self {
            input,
            output,
            transformed: false,
        }
    }

    /// Create a buffer over real samples; every imaginary part is zero
    pub fn from_reals(reals: &[f64]) -> Self {
        Self::new(reals.iter().map(|&re| Complex64::new(re, 0.0)).collect())
    }

    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub fn input(&self) -> &[Complex64] {
        &self.input
    }

    /// Transform result, all zeros until an engine has run
    pub fn output(&self) -> &[Complex64] {
        &self.output
    }

    pub fn is_transformed(&self) -> bool {
        self.transformed
    }

    /// Hand the transform result off, dropping the input
    pub fn into_output(self) -> Vec<Complex64> {
        self.output
    }

    /// Split into the read-only input and the writable output for a run over `len` samples.
    ///
    /// Marks the buffer as transformed; fails if it already was, or if the lengths disagree.
    pub(crate) fn begin_run(&mut self, len: usize) -> Result<(&[Complex64], &mut [Complex64])> {
        if self.transformed {
            return Err(FftError::AlreadyTransformed);
        }
        if self.input.len() != len {
            return Err(FftError::LengthMismatch {
                expected: len,
                actual: self.input.len(),
            });
        }

        self.transformed = true;
        Ok((&self.input, &mut self.output))
    }
}
