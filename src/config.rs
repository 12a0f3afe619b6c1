//! Validated configuration of a single transform run

use crate::error::{FftError, Result};
use crate::planner::Direction;

/// Upper bound on the worker count of one run, for either engine
pub const MAX_WORKERS: usize = 1024;

/// The transform engine to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// Direct O(N²) summation, output bins split contiguously across workers
    Naive,
    /// Recursive O(N log N) decimation-in-time, recursion subtrees split across workers
    Recursive,
}

impl Engine {
    /// Short name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            Engine::Naive => "dft",
            Engine::Recursive => "fft",
        }
    }
}

/// Immutable parameters of one run: sequence length N, worker count P, engine, direction.
///
/// Only [`TransformConfig::new`] builds one, so every value in circulation satisfies the
/// preconditions of its engine:
///
/// - both engines need `N >= 1` and `1 <= P <= MAX_WORKERS`;
/// - [`Engine::Recursive`] also needs `N` and `P` to be powers of two with `P <= N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformConfig {
    len: usize,
    workers: usize,
    engine: Engine,
    direction: Direction,
}

impl TransformConfig {
    /// Validate `(len, workers)` for `engine` and build a forward configuration.
    pub fn new(len: usize, workers: usize, engine: Engine) -> Result<Self> {
        validate(len, workers, engine)?;

        Ok(Self {
            len,
            workers,
            engine,
            direction: Direction::Forward,
        })
    }

    /// Same configuration, transforming in `direction`
    pub fn with_direction(self, direction: Direction) -> Self {
        Self { direction, ..self }
    }

    /// Sequence length N
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: zero-length configurations are rejected
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Worker count P
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

pub(crate) fn validate(len: usize, workers: usize, engine: Engine) -> Result<()> {
    if len == 0 {
        return Err(FftError::EmptySequence);
    }
    if workers == 0 {
        return Err(FftError::NoWorkers);
    }
    if workers > MAX_WORKERS {
        return Err(FftError::WorkerLimit {
            workers,
            limit: MAX_WORKERS,
        });
    }

    if engine == Engine::Recursive {
        if !len.is_power_of_two() {
            return Err(FftError::LengthNotPowerOfTwo(len));
        }
        if !workers.is_power_of_two() {
            return Err(FftError::WorkersNotPowerOfTwo(workers));
        }
        if workers > len {
            return Err(FftError::TooManyWorkers { workers, len });
        }
    }

    Ok(())
}
