#![doc = include_str!("../README.md")]

use num_complex::Complex64;

pub use crate::algorithms::{engine_for, NaiveTransform, RecursiveTransform, Transform};
pub use crate::config::{Engine, TransformConfig};
pub use crate::error::{FftError, Result};
pub use crate::partition::{partition, Partition};
pub use crate::planner::{Direction, Planner};
pub use crate::sample_buffer::SampleBuffer;

pub mod algorithms;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod partition;
pub mod planner;
pub mod sample_buffer;
mod scratch;
mod twiddles;

/// Transform `buffer` with the engine, worker count, and direction of `config`
pub fn transform(buffer: &mut SampleBuffer, config: &TransformConfig) -> Result<()> {
    engine_for(*config)?.process(buffer)
}

/// Forward transform of `input` with `engine` on `workers` threads
pub fn forward(engine: Engine, input: &[Complex64], workers: usize) -> Result<Vec<Complex64>> {
    run(input, TransformConfig::new(input.len(), workers, engine)?)
}

/// Inverse transform of `input`, scaled by `1/N`, with `engine` on `workers` threads
pub fn inverse(engine: Engine, input: &[Complex64], workers: usize) -> Result<Vec<Complex64>> {
    let config = TransformConfig::new(input.len(), workers, engine)?.with_direction(Direction::Reverse);
    run(input, config)
}

fn run(input: &[Complex64], config: TransformConfig) -> Result<Vec<Complex64>> {
    let mut buffer = SampleBuffer::new(input.to_vec());
    transform(&mut buffer, &config)?;
    Ok(buffer.into_output())
}

#[cfg(test)]
mod tests {
    use utilities::{assert_complex_closeness, gen_random_complex};

    use super::*;

    #[test]
    fn engines_agree() {
        let signal = gen_random_complex(256);
        let naive = forward(Engine::Naive, &signal, 3).unwrap();
        for workers in [1, 2, 4, 8] {
            let fast = forward(Engine::Recursive, &signal, workers).unwrap();
            assert_complex_closeness(&fast, &naive, 1e-9);
        }
    }

    #[test]
    fn round_trip() {
        let signal = gen_random_complex(100);
        let spectrum = forward(Engine::Naive, &signal, 4).unwrap();
        let back = inverse(Engine::Naive, &spectrum, 4).unwrap();
        assert_complex_closeness(&back, &signal, 1e-9);
    }

    #[test]
    fn transform_dispatches_on_engine() {
        let config = TransformConfig::new(6, 2, Engine::Naive).unwrap();
        let mut buffer = SampleBuffer::from_reals(&[1.0; 6]);
        transform(&mut buffer, &config).unwrap();
        assert!((buffer.output()[0].re - 6.0).abs() < 1e-12);

        let config = TransformConfig::new(8, 2, Engine::Recursive).unwrap();
        let mut buffer = SampleBuffer::from_reals(&[1.0; 6]);
        assert!(matches!(
            transform(&mut buffer, &config),
            Err(FftError::LengthMismatch { .. })
        ));
    }
}
