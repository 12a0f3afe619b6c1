use std::f64::consts::PI;

use num_complex::Complex64;

use crate::planner::Direction;

/// Generate `count` roots of unity `exp(sign * j * 2π * k / denominator)` for `k` in `0..count`.
///
/// Every root is computed from its own angle rather than by repeated rotation, so the error
/// does not accumulate along the table.
pub(crate) fn generate_roots(count: usize, denominator: usize, direction: Direction) -> Vec<Complex64> {
    let angle_mult = direction.sign() * 2.0 * PI / denominator as f64;

    (0..count)
        .map(|k| {
            let (sin, cos) = (angle_mult * k as f64).sin_cos();
            Complex64::new(cos, sin)
        })
        .collect()
}

/// Twiddles for the direct summation: `W_N^m` for `m` in `0..N`.
///
/// The kernel for bin `k` and sample `t` is entry `(t * k) mod N`.
pub(crate) fn generate_dft_twiddles(n: usize, direction: Direction) -> Vec<Complex64> {
    generate_roots(n, n, direction)
}

/// Twiddles for the ping-pong butterflies: `exp(-j * π * i / N)` for `i` in `0..N`.
///
/// Butterflies index this table with the global loop index `i`, at every recursion depth.
pub(crate) fn generate_fft_twiddles(n: usize, direction: Direction) -> Vec<Complex64> {
    generate_roots(n, 2 * n, direction)
}
