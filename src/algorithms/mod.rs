//! Transform engines
//!
//! This module contains the two interchangeable transform engines.
//!
//! ## Available Algorithms
//!
//! - **Naive**: the definitional O(N²) summation. Accepts any length and any worker count.
//!   Workers own contiguous ranges of output bins and never synchronize.
//!
//! - **Recursive**: O(N log N) decimation-in-time over two ping-pong scratch buffers.
//!   Requires power-of-two lengths and worker counts. Workers own leaf subtrees of the
//!   recursion and meet at a barrier before every merge level.
//!
//! ## Algorithm Selection
//!
//! - Use the naive engine for lengths that are not powers of two, or as a reference.
//! - Use the recursive engine everywhere else.
use std::thread::ScopedJoinHandle;

use crate::config::{Engine, TransformConfig};
use crate::error::{FftError, Result};
use crate::sample_buffer::SampleBuffer;

pub mod naive;
pub mod recursive;

pub use naive::NaiveTransform;
pub use recursive::RecursiveTransform;

/// A transform engine bound to one validated configuration
pub trait Transform: Send + Sync {
    fn config(&self) -> &TransformConfig;

    /// Transform `buffer.input()` into `buffer.output()`.
    ///
    /// Fails if the buffer length differs from the configured length, or if the buffer has
    /// already been transformed.
    fn process(&self, buffer: &mut SampleBuffer) -> Result<()>;
}

/// Build the engine selected by `config`
pub fn engine_for(config: TransformConfig) -> Result<Box<dyn Transform>> {
    Ok(match config.engine() {
        Engine::Naive => Box::new(NaiveTransform::from_config(config)),
        Engine::Recursive => Box::new(RecursiveTransform::from_config(config)?),
    })
}

/// Join every worker of a run, reporting the first one that panicked
pub(crate) fn join_workers(handles: Vec<ScopedJoinHandle<'_, ()>>) -> Result<()> {
    let mut result = Ok(());
    for (worker, handle) in handles.into_iter().enumerate() {
        if handle.join().is_err() && result.is_ok() {
            result = Err(FftError::WorkerPanicked(worker));
        }
    }
    result
}
