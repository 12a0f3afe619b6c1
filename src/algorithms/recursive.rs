//! Recursive Decimation-in-Time (DIT) FFT
//!
//! The recursion splits the input by index parity down to single samples, then combines
//! pairs of half-size transforms with butterflies on the way back up. Two scratch buffers
//! swap roles at every depth (see [`crate::scratch`]), so the result at the root is already
//! in frequency order.
//!
//! ## Parallel Schedule
//!
//! With `P = 2^L` workers:
//!
//! 1. Worker `w` computes the leaf subtree at stride `P` and offset `w`, alone.
//! 2. For each stride `s = P/2, P/4, ..., 1`: every worker waits at the barrier, then worker
//!    `g < s` merges the node at offset `g`.
//! 3. The root (stride 1) is merged once, by worker 0.
//!
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Barrier;
use std::thread;

use log::{debug, trace};
use num_complex::Complex64;

use crate::algorithms::{join_workers, Transform};
use crate::config::{validate, Engine, TransformConfig};
use crate::error::Result;
use crate::partition::{FftSchedule, Subtree};
use crate::planner::{Direction, Planner};
use crate::sample_buffer::SampleBuffer;
use crate::scratch::{Buffer, PingPong};

/// The O(N log N) engine, parallelized over recursion subtrees
#[derive(Debug, Clone)]
pub struct RecursiveTransform {
    config: TransformConfig,
    planner: Planner,
    schedule: FftSchedule,
}

impl RecursiveTransform {
    /// Forward transform of `len` samples on `workers` threads.
    ///
    /// Fails unless `len` and `workers` are powers of two with `workers <= len`.
    pub fn new(len: usize, workers: usize) -> Result<Self> {
        Self::from_config(TransformConfig::new(len, workers, Engine::Recursive)?)
    }

    /// Build the engine for `config`, re-checking the power-of-two preconditions in case
    /// `config` was validated for the naive engine.
    pub fn from_config(config: TransformConfig) -> Result<Self> {
        validate(config.len(), config.workers(), Engine::Recursive)?;

        let planner = Planner::for_engine(Engine::Recursive, config.len(), config.direction());
        let schedule = FftSchedule::new(config.workers());

        Ok(Self {
            config,
            planner,
            schedule,
        })
    }
}

/// One unit of a worker's share
#[derive(Debug, Clone, Copy)]
enum Step {
    /// Compute the whole leaf subtree
    Leaf(Subtree),
    /// Merge one group whose children are complete
    Merge(Subtree),
}

/// Walk `worker`'s share of `schedule`, handing each step to `task`.
///
/// A panic inside `task` must not strand the other workers at a barrier. The panicking
/// worker records the failure and keeps arriving at every remaining barrier. Once the
/// failure is visible no worker runs another step. The panic resumes after the last
/// barrier, where joining the worker reports it.
fn drive_worker<F>(
    worker: usize,
    schedule: &FftSchedule,
    barrier: &Barrier,
    failed: &AtomicBool,
    mut task: F,
) where
    F: FnMut(Step),
{
    let mut payload = None;
    let mut attempt = |step: Step| {
        if failed.load(Ordering::Acquire) {
            return;
        }
        if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(|| task(step))) {
            failed.store(true, Ordering::Release);
            payload.get_or_insert(panic);
        }
    };

    attempt(Step::Leaf(schedule.leaves[worker]));

    for level in &schedule.merges {
        if level.barrier {
            barrier.wait();
        }
        for group in FftSchedule::groups_for(level, worker) {
            attempt(Step::Merge(*group));
        }
    }

    if let Some(panic) = payload {
        panic::resume_unwind(panic);
    }
}

/// Share of one worker: its leaf subtree, then its groups at each merge level
fn run_worker(
    worker: usize,
    schedule: &FftSchedule,
    scratch: &PingPong,
    twiddles: &[Complex64],
    barrier: &Barrier,
    failed: &AtomicBool,
) {
    drive_worker(worker, schedule, barrier, failed, |step| match step {
        Step::Leaf(leaf) => {
            trace!(
                "fft worker {worker}: leaf at offset {} stride {}",
                leaf.offset,
                leaf.stride
            );
            // SAFETY: leaves have distinct offsets below their common stride, and no merge
            // starts before every worker has passed the first barrier.
            unsafe { scratch.claim(leaf.offset, leaf.stride) }.combine(twiddles);
        }
        Step::Merge(group) => {
            trace!("fft worker {worker}: merge at offset {} stride {}", group.offset, group.stride);
            // SAFETY: groups of one level have distinct offsets below the level stride, and
            // the barrier separates this level from the views of the previous one.
            unsafe { scratch.claim(group.offset, group.stride) }.merge(twiddles);
        }
    });
}

impl Transform for RecursiveTransform {
    fn config(&self) -> &TransformConfig {
        &self.config
    }

    fn process(&self, buffer: &mut SampleBuffer) -> Result<()> {
        let (input, output) = buffer.begin_run(self.config.len())?;
        let workers = self.config.workers();

        debug!(
            "fft: {} samples on {} workers, {} merge levels ({:?})",
            input.len(),
            workers,
            self.schedule.merges.len(),
            self.config.direction()
        );

        let scratch = PingPong::new(input);
        let barrier = Barrier::new(workers);
        let failed = AtomicBool::new(false);

        thread::scope(|s| {
            let handles = (0..workers)
                .map(|worker| {
                    let (schedule, scratch, barrier, failed) =
                        (&self.schedule, &scratch, &barrier, &failed);
                    let twiddles = self.planner.twiddles.as_slice();
                    s.spawn(move || {
                        run_worker(worker, schedule, scratch, twiddles, barrier, failed)
                    })
                })
                .collect();

            join_workers(handles)
        })?;

        let root = scratch.into_buffer(Buffer::destination(1));
        match self.config.direction() {
            Direction::Forward => output.copy_from_slice(&root),
            Direction::Reverse => {
                let scale = 1.0 / root.len() as f64;
                output
                    .iter_mut()
                    .zip(root)
                    .for_each(|(out, z)| *out = z * scale);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use num_traits::Zero;
    use utilities::{assert_complex_closeness, gen_random_complex, rustfft_forward};

    use super::*;
    use crate::error::FftError;

    fn run(input: &[Complex64], workers: usize) -> Vec<Complex64> {
        let engine = RecursiveTransform::new(input.len(), workers).unwrap();
        let mut buffer = SampleBuffer::new(input.to_vec());
        engine.process(&mut buffer).unwrap();
        buffer.into_output()
    }

    #[test]
    fn fft() {
        for k in 0..13 {
            let n = 1 << k;
            let signal = gen_random_complex(n);
            let expected = rustfft_forward(&signal);

            let mut workers = 1;
            while workers <= n.min(16) {
                assert_complex_closeness(&run(&signal, workers), &expected, 1e-9);
                workers *= 2;
            }
        }
    }

    #[test]
    fn single_sample() {
        let out = run(&[Complex64::new(2.5, -1.0)], 1);
        assert_eq!(out, vec![Complex64::new(2.5, -1.0)]);
    }

    #[test]
    fn one_sample_per_worker() {
        let signal = gen_random_complex(8);
        let expected = rustfft_forward(&signal);
        assert_complex_closeness(&run(&signal, 8), &expected, 1e-9);
    }

    #[test]
    fn dc_input() {
        let c = Complex64::new(0.75, -0.25);
        let out = run(&vec![c; 64], 4);

        let mut expected = vec![Complex64::zero(); 64];
        expected[0] = c * 64.0;
        assert_complex_closeness(&out, &expected, 1e-12);
    }

    #[test]
    fn rejects_bad_sizes() {
        assert!(matches!(
            RecursiveTransform::new(12, 1),
            Err(FftError::LengthNotPowerOfTwo(12))
        ));
        assert!(matches!(
            RecursiveTransform::new(16, 6),
            Err(FftError::WorkersNotPowerOfTwo(6))
        ));
        assert!(matches!(
            RecursiveTransform::new(2, 4),
            Err(FftError::TooManyWorkers { .. })
        ));

        let naive_only = TransformConfig::new(10, 3, Engine::Naive).unwrap();
        assert!(RecursiveTransform::from_config(naive_only).is_err());
    }

    /// Run the schedule of 4 workers, panicking on the step chosen by `fails`, and collect
    /// the steps that ran to completion.
    fn drive_with_failure(fails: impl Fn(usize, Step) -> bool + Sync) -> (Result<()>, Vec<Step>) {
        let workers = 4;
        let schedule = FftSchedule::new(workers);
        let barrier = Barrier::new(workers);
        let failed = AtomicBool::new(false);
        let completed = std::sync::Mutex::new(Vec::new());

        let result = thread::scope(|s| {
            let handles = (0..workers)
                .map(|worker| {
                    let (schedule, barrier, failed) = (&schedule, &barrier, &failed);
                    let (fails, completed) = (&fails, &completed);
                    s.spawn(move || {
                        drive_worker(worker, schedule, barrier, failed, |step| {
                            if fails(worker, step) {
                                panic!("worker {worker} failed");
                            }
                            completed.lock().unwrap().push(step);
                        })
                    })
                })
                .collect();
            join_workers(handles)
        });

        (result, completed.into_inner().unwrap())
    }

    #[test]
    fn panic_in_leaf_is_reported() {
        let (result, completed) =
            drive_with_failure(|worker, step| worker == 1 && matches!(step, Step::Leaf(_)));

        assert!(matches!(result, Err(FftError::WorkerPanicked(1))));
        assert!(completed.iter().all(|step| matches!(step, Step::Leaf(_))));
    }

    #[test]
    fn panic_in_merge_skips_root() {
        let (result, completed) = drive_with_failure(|worker, step| {
            worker == 1 && matches!(step, Step::Merge(group) if group.stride == 2)
        });

        assert!(matches!(result, Err(FftError::WorkerPanicked(1))));
        assert_eq!(
            completed
                .iter()
                .filter(|step| matches!(step, Step::Leaf(_)))
                .count(),
            4
        );
        assert!(!completed
            .iter()
            .any(|step| matches!(step, Step::Merge(group) if group.stride == 1)));
    }

    #[test]
    fn inverse_scales_by_len() {
        let signal = gen_random_complex(32);
        let spectrum = run(&signal, 4);

        let config = TransformConfig::new(32, 2, Engine::Recursive)
            .unwrap()
            .with_direction(Direction::Reverse);
        let engine = RecursiveTransform::from_config(config).unwrap();
        let mut buffer = SampleBuffer::new(spectrum);
        engine.process(&mut buffer).unwrap();

        assert_complex_closeness(buffer.output(), &signal, 1e-12);
    }
}
