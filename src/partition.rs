//! Mapping of worker threads onto the work of each engine
//!
//! - [`Engine::Naive`]: each worker owns one contiguous range of output bins.
//! - [`Engine::Recursive`]: each worker owns one leaf subtree of the recursion, found by
//!   following `log2(P)` child choices from the root. The subtrees are then merged level by
//!   level at strides `P/2, P/4, ..., 1`, each level behind a barrier.
//!
use std::ops::Range;

use crate::config::{validate, Engine};
use crate::error::Result;

/// One node of the recursion tree, owned by a single worker.
///
/// The node covers the global indices `offset + k * stride`. Nodes at the same stride have
/// distinct offsets in `0..stride`, so their index sets are disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subtree {
    pub worker: usize,
    pub offset: usize,
    pub stride: usize,
}

/// The combine steps performed at one stride once the level below is complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeLevel {
    pub stride: usize,
    /// Whether every worker must pass a barrier before any group of this level starts
    pub barrier: bool,
    pub groups: Vec<Subtree>,
}

/// Leaf assignment and merge schedule of the recursive engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FftSchedule {
    pub workers: usize,
    /// One leaf per worker, indexed by worker id
    pub leaves: Vec<Subtree>,
    /// Merge levels in execution order, from stride `P/2` down to the root at stride 1
    pub merges: Vec<MergeLevel>,
}

impl FftSchedule {
    /// Build the schedule for `workers` workers, a power of two
    pub fn new(workers: usize) -> Self {
        debug_assert!(workers.is_power_of_two());

        let leaves = (0..workers)
            .map(|worker| Subtree {
                worker,
                offset: worker,
                stride: workers,
            })
            .collect();

        // At stride s the groups are the offsets 0..s. Group g reads the results of groups
        // g and g + s of the level below, which belong to different workers, hence the barrier.
        let merges = std::iter::successors(Some(workers / 2), |s| Some(s / 2))
            .take_while(|&s| s >= 1)
            .map(|stride| MergeLevel {
                stride,
                barrier: true,
                groups: (0..stride)
                    .map(|offset| Subtree {
                        worker: offset,
                        offset,
                        stride,
                    })
                    .collect(),
            })
            .collect();

        Self {
            workers,
            leaves,
            merges,
        }
    }

    /// Groups of `level` executed by `worker`
    pub fn groups_for(level: &MergeLevel, worker: usize) -> impl Iterator<Item = &Subtree> {
        level.groups.iter().filter(move |g| g.worker == worker)
    }

    /// Number of barriers each worker passes during a run
    pub fn barrier_count(&self) -> usize {
        self.merges.iter().filter(|level| level.barrier).count()
    }
}

/// Work assignment of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Partition {
    /// Output bin range per worker, indexed by worker id
    Naive(Vec<Range<usize>>),
    Recursive(FftSchedule),
}

/// Partition the work of `engine` over `len` samples among `workers` workers.
///
/// Fails on the same `(len, workers)` combinations [`TransformConfig::new`] rejects.
pub fn partition(len: usize, workers: usize, engine: Engine) -> Result<Partition> {
    validate(len, workers, engine)?;

    Ok(match engine {
        Engine::Naive => Partition::Naive(naive_ranges(len, workers)),
        Engine::Recursive => Partition::Recursive(FftSchedule::new(workers)),
    })
}

/// Split `0..len` into `workers` contiguous ranges of `ceil(len / workers)` bins.
///
/// Trailing workers may receive an empty range when the division is uneven or when
/// `workers > len`.
pub fn naive_ranges(len: usize, workers: usize) -> Vec<Range<usize>> {
    let chunk = len.div_ceil(workers);

    (0..workers)
        .map(|worker| {
            let start = (worker * chunk).min(len);
            let end = ((worker + 1) * chunk).min(len);
            start..end
        })
        .collect()
}
