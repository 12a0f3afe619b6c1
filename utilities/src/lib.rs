pub extern crate rustfft;

// export rustfft to parfft tests
use rand::{distributions::Uniform, prelude::*};
use rustfft::num_complex::Complex64;
use rustfft::num_traits::Float;
use rustfft::FftPlanner;

/// Asserts that two fp numbers are approximately equal.
///
/// # Panics
///
/// Panics if `actual` and `expected` are too far from each other
#[allow(dead_code)]
#[track_caller]
pub fn assert_float_closeness<T: Float + std::fmt::Display>(actual: T, expected: T, epsilon: T) {
    if (actual - expected).abs() >= epsilon {
        panic!(
            "Assertion failed: {actual} too far from expected value {expected} (with epsilon {epsilon})",
        );
    }
}

/// Asserts that two complex sequences agree bin by bin.
///
/// The tolerance is relative to the largest magnitude in `expected`, so long
/// transforms with large DC terms are compared fairly.
///
/// # Panics
///
/// Panics if the lengths differ or any bin is too far from its expected value
#[track_caller]
pub fn assert_complex_closeness(actual: &[Complex64], expected: &[Complex64], epsilon: f64) {
    assert_eq!(actual.len(), expected.len(), "sequence lengths differ");

    let scale = expected.iter().map(|z| z.norm()).fold(1.0, f64::max);
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        let err = (a - e).norm();
        if err >= epsilon * scale {
            panic!("Assertion failed at bin {i}: {a} too far from expected value {e} (error {err})");
        }
    }
}

/// Generate a random, complex, signal in the provided buffers
///
/// # Panics
///
/// Panics if `reals.len() != imags.len()`
pub fn gen_random_signal<T>(reals: &mut [T], imags: &mut [T])
where
    T: Float + rand::distributions::uniform::SampleUniform,
{
    assert_eq!(
        reals.len(),
        imags.len(),
        "Real and imaginary slices must be of equal length"
    );

    let mut rng = thread_rng();

    let uniform_dist = Uniform::new(T::from(-1.0).unwrap(), T::from(1.0).unwrap());
    for (real, imag) in reals.iter_mut().zip(imags.iter_mut()) {
        *real = uniform_dist.sample(&mut rng);
        *imag = uniform_dist.sample(&mut rng);
    }
}

/// Generate a random complex signal of length `len` with components in `[-1, 1)`
pub fn gen_random_complex(len: usize) -> Vec<Complex64> {
    let mut reals = vec![0.0; len];
    let mut imags = vec![0.0; len];
    gen_random_signal(&mut reals, &mut imags);

    reals
        .into_iter()
        .zip(imags)
        .map(|(re, im)| Complex64::new(re, im))
        .collect()
}

/// Forward transform of `signal` computed by RustFFT, used as the reference
pub fn rustfft_forward(signal: &[Complex64]) -> Vec<Complex64> {
    let mut buffer = signal.to_vec();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(buffer.len());
    fft.process(&mut buffer);
    buffer
}
