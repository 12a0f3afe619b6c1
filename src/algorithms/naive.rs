//! Direct Discrete Fourier Transform
//!
//! Every output bin is the full sum `output[k] = Σ_t input[t] * W_N^(t * k)`. The bins are
//! split into contiguous ranges, one per worker; each worker reads the whole input and
//! writes only its own slice of the output, so no synchronization is needed.
//!
use std::ops::Range;
use std::thread;

use log::{debug, trace};
use num_complex::Complex64;
use num_traits::Zero;

use crate::algorithms::{join_workers, Transform};
use crate::config::{Engine, TransformConfig};
use crate::error::Result;
use crate::partition::naive_ranges;
use crate::planner::{Direction, Planner};
use crate::sample_buffer::SampleBuffer;

/// Sum the bins `first_bin..first_bin + out.len()` into `out`, scaled by `scale`.
///
/// `twiddles` holds the `N` roots `W_N^m`; the exponent `t * k mod N` is advanced by `k` per
/// sample instead of being recomputed.
#[multiversion::multiversion(targets(
    "x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86_64+avx2+fma",
    "x86_64+sse4.2",
    "x86+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86+avx2+fma",
    "x86+sse4.2",
    "x86+sse2",
    "aarch64+neon",
))]
fn dft_bins(
    input: &[Complex64],
    twiddles: &[Complex64],
    first_bin: usize,
    out: &mut [Complex64],
    scale: f64,
) {
    let n = input.len();

    for (k, bin) in (first_bin..).zip(out.iter_mut()) {
        let mut sum = Complex64::zero();
        let mut m = 0;
        for &x in input {
            sum += x * twiddles[m];
            m += k;
            if m >= n {
                m -= n;
            }
        }
        *bin = sum * scale;
    }
}

/// The O(N²) engine, parallelized over output bins
#[derive(Debug, Clone)]
pub struct NaiveTransform {
    config: TransformConfig,
    planner: Planner,
}

impl NaiveTransform {
    /// Forward transform of `len` samples on `workers` threads
    pub fn new(len: usize, workers: usize) -> Result<Self> {
        Ok(Self::from_config(TransformConfig::new(
            len,
            workers,
            Engine::Naive,
        )?))
    }

    /// Build the engine for `config`.
    ///
    /// Any validated configuration is acceptable here, whichever engine it names.
    pub fn from_config(config: TransformConfig) -> Self {
        let planner = Planner::for_engine(Engine::Naive, config.len(), config.direction());
        Self { config, planner }
    }

    /// Bin range owned by each worker, indexed by worker id
    pub fn ranges(&self) -> Vec<Range<usize>> {
        naive_ranges(self.config.len(), self.config.workers())
    }
}

impl Transform for NaiveTransform {
    fn config(&self) -> &TransformConfig {
        &self.config
    }

    fn process(&self, buffer: &mut SampleBuffer) -> Result<()> {
        let (input, output) = buffer.begin_run(self.config.len())?;
        let twiddles = &self.planner.twiddles;
        let scale = match self.config.direction() {
            Direction::Forward => 1.0,
            Direction::Reverse => 1.0 / input.len() as f64,
        };

        debug!(
            "dft: {} samples on {} workers ({:?})",
            input.len(),
            self.config.workers(),
            self.config.direction()
        );

        thread::scope(|s| {
            let mut rest = output;
            let mut handles = Vec::with_capacity(self.config.workers());

            for (worker, bins) in self.ranges().into_iter().enumerate() {
                let (slice, tail) = std::mem::take(&mut rest).split_at_mut(bins.len());
                rest = tail;

                handles.push(s.spawn(move || {
                    trace!("dft worker {worker}: bins {bins:?}");
                    if !bins.is_empty() {
                        dft_bins(input, twiddles, bins.start, slice, scale);
                    }
                }));
            }

            join_workers(handles)
        })
    }
}

#[cfg(test)]
mod tests {
    use utilities::{assert_complex_closeness, gen_random_complex, rustfft_forward};

    use super::*;
    use crate::error::FftError;

    fn run(input: &[Complex64], workers: usize) -> Vec<Complex64> {
        let engine = NaiveTransform::new(input.len(), workers).unwrap();
        let mut buffer = SampleBuffer::new(input.to_vec());
        engine.process(&mut buffer).unwrap();
        buffer.into_output()
    }

    #[test]
    fn matches_rustfft() {
        for len in [1, 2, 3, 5, 8, 10, 17, 64, 100] {
            let signal = gen_random_complex(len);
            let expected = rustfft_forward(&signal);
            for workers in [1, 2, 3, 4, 7] {
                assert_complex_closeness(&run(&signal, workers), &expected, 1e-9);
            }
        }
    }

    #[test]
    fn impulse() {
        let mut signal = vec![Complex64::zero(); 10];
        signal[0] = Complex64::new(1.0, 0.0);

        let ones = vec![Complex64::new(1.0, 0.0); 10];
        assert_complex_closeness(&run(&signal, 3), &ones, 1e-12);
    }

    #[test]
    fn more_workers_than_bins() {
        let signal = gen_random_complex(3);
        let expected = rustfft_forward(&signal);
        assert_complex_closeness(&run(&signal, 8), &expected, 1e-9);
    }

    #[test]
    fn second_run_rejected() {
        let engine = NaiveTransform::new(4, 2).unwrap();
        let mut buffer = SampleBuffer::from_reals(&[1.0, 2.0, 3.0, 4.0]);
        engine.process(&mut buffer).unwrap();
        assert!(matches!(
            engine.process(&mut buffer),
            Err(FftError::AlreadyTransformed)
        ));
    }

    #[test]
    fn wrong_length_rejected() {
        let engine = NaiveTransform::new(4, 2).unwrap();
        let mut buffer = SampleBuffer::from_reals(&[1.0, 2.0, 3.0]);
        assert!(matches!(
            engine.process(&mut buffer),
            Err(FftError::LengthMismatch { .. })
        ));
    }
}
