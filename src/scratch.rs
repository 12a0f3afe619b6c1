//! Ping-pong scratch buffers shared by the workers of the recursive engine
//!
//! The recursion alternates two buffers, A and B. A combine step at stride `s` reads the
//! buffer its children wrote and writes the other one, so the roles swap at every depth and
//! the root result comes out in frequency order without a reordering pass.
//!
//! Workers write into the same two buffers at the same time, on disjoint index sets. A
//! [`Node`] view is the unit of ownership: it may only touch indices congruent to its
//! offset modulo its stride, in either buffer.
use std::cell::UnsafeCell;

use num_complex::Complex64;

/// One of the two scratch buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buffer {
    A,
    B,
}

impl Buffer {
    /// Buffer written by the combine step at `stride`.
    ///
    /// Depth `d = log2(stride)` writes A when `d` is even and B when `d` is odd, so the root
    /// (stride 1, depth 0) always lands in A.
    pub fn destination(stride: usize) -> Self {
        if stride.trailing_zeros() % 2 == 0 {
            Buffer::A
        } else {
            Buffer::B
        }
    }

    /// Buffer read by the combine step at `stride`, i.e. written by its children
    pub fn source(stride: usize) -> Self {
        Self::destination(stride).other()
    }

    pub fn other(self) -> Self {
        match self {
            Buffer::A => Buffer::B,
            Buffer::B => Buffer::A,
        }
    }
}

/// The two scratch sequences of a run
pub(crate) struct PingPong {
    a: Box<[UnsafeCell<Complex64>]>,
    b: Box<[UnsafeCell<Complex64>]>,
}

// SAFETY: cells are reached only through `Node`, whose constructor requires that no two
// live views with overlapping index sets exist on different threads.
unsafe impl Sync for PingPong {}

impl PingPong {
    /// Both buffers start as copies of `input`, so the leaves find their sample whichever
    /// buffer their depth parity selects.
    pub fn new(input: &[Complex64]) -> Self {
        let copy = || -> Box<[UnsafeCell<Complex64>]> {
            input.iter().copied().map(UnsafeCell::new).collect()
        };
        Self {
            a: copy(),
            b: copy(),
        }
    }

    pub fn len(&self) -> usize {
        self.a.len()
    }

    fn cells(&self, buffer: Buffer) -> &[UnsafeCell<Complex64>] {
        match buffer {
            Buffer::A => &self.a,
            Buffer::B => &self.b,
        }
    }

    /// Claim the recursion node covering `offset + k * stride`.
    ///
    /// # Safety
    ///
    /// Until the returned view is dropped, no other thread may hold a view whose index set
    /// intersects this one. Views at the same stride with distinct offsets below the stride
    /// never intersect. Views claimed on different sides of a barrier never coexist.
    pub unsafe fn claim(&self, offset: usize, stride: usize) -> Node<'_> {
        debug_assert!(offset < stride);
        Node {
            scratch: self,
            offset,
            stride,
        }
    }

    /// Consume the scratch space, keeping `buffer`
    pub fn into_buffer(self, buffer: Buffer) -> Vec<Complex64> {
        let cells = match buffer {
            Buffer::A => self.a,
            Buffer::B => self.b,
        };
        cells
            .into_vec()
            .into_iter()
            .map(UnsafeCell::into_inner)
            .collect()
    }
}

/// Exclusive view on one node of the recursion tree
pub(crate) struct Node<'a> {
    scratch: &'a PingPong,
    offset: usize,
    stride: usize,
}

impl Node<'_> {
    #[cfg(test)]
    fn owns(&self, index: usize) -> bool {
        index % self.stride == self.offset
    }

    /// The even and odd children of this node. Both are subsets of this view.
    fn children(&self) -> (Node<'_>, Node<'_>) {
        let stride = self.stride * 2;
        let child = |offset| Node {
            scratch: self.scratch,
            offset,
            stride,
        };
        (child(self.offset), child(self.offset + self.stride))
    }

    /// Compute this whole subtree: both children recursively, then this node's merge.
    ///
    /// A node with `stride >= N` is a single sample and is already in place.
    pub fn combine(&self, twiddles: &[Complex64]) {
        if self.stride >= self.scratch.len() {
            return;
        }

        let (even, odd) = self.children();
        even.combine(twiddles);
        odd.combine(twiddles);

        self.merge(twiddles);
    }

    /// Butterflies of this node, assuming both children are complete.
    pub fn merge(&self, twiddles: &[Complex64]) {
        let s = self.stride;
        let (dst, src) = (Buffer::destination(s), Buffer::source(s));

        // SAFETY: the kernel touches only indices congruent to `offset` modulo `stride`,
        // which belong to this view.
        unsafe {
            butterflies(
                self.scratch.cells(src),
                self.scratch.cells(dst),
                twiddles,
                self.offset,
                s,
            )
        }
    }
}

/// Butterflies of the node at `offset`, `stride`, reading `src` and writing `dst`.
///
/// For `i = 0, 2s, 4s, ...` below `N`, with `t = exp(-j * π * i / N) * src[o + i + s]`:
/// `dst[o + i/2] = src[o + i] + t` and `dst[o + (i + N)/2] = src[o + i] - t`.
/// `N` and `i` are global at every depth.
///
/// # Safety
///
/// No other thread may access the indices `offset + k * stride` of `src` or `dst` for the
/// duration of the call.
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
unsafe fn butterflies(
    src: &[UnsafeCell<Complex64>],
    dst: &[UnsafeCell<Complex64>],
    twiddles: &[Complex64],
    offset: usize,
    stride: usize,
) {
    let n = src.len();
    let o = offset;

    for i in (0..n).step_by(2 * stride) {
        unsafe {
            let even = *src[o + i].get();
            let t = twiddles[i] * *src[o + i + stride].get();
            *dst[o + i / 2].get() = even + t;
            *dst[o + (i + n) / 2].get() = even - t;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Direction;
    use crate::twiddles::generate_fft_twiddles;

    #[test]
    fn roles_alternate_with_depth() {
        assert_eq!(Buffer::destination(1), Buffer::A);
        assert_eq!(Buffer::destination(2), Buffer::B);
        assert_eq!(Buffer::destination(4), Buffer::A);
        assert_eq!(Buffer::destination(8), Buffer::B);

        for log_s in 0..10 {
            let stride = 1 << log_s;
            assert_eq!(Buffer::source(stride), Buffer::destination(stride * 2));
        }
    }

    #[test]
    fn two_point_butterfly() {
        let input = [Complex64::new(3.0, 0.0), Complex64::new(1.0, 2.0)];
        let scratch = PingPong::new(&input);
        let twiddles = generate_fft_twiddles(2, Direction::Forward);

        // SAFETY: single thread, single view.
        unsafe { scratch.claim(0, 1) }.combine(&twiddles);

        let out = scratch.into_buffer(Buffer::A);
        assert_eq!(out, vec![Complex64::new(4.0, 2.0), Complex64::new(2.0, -2.0)]);
    }

    #[test]
    fn children_partition_parent() {
        let input = vec![Complex64::new(0.0, 0.0); 16];
        let scratch = PingPong::new(&input);
        // SAFETY: single thread.
        let node = unsafe { scratch.claim(1, 2) };
        let (even, odd) = node.children();

        assert_eq!((even.offset, even.stride), (1, 4));
        assert_eq!((odd.offset, odd.stride), (3, 4));
        for idx in 0..16 {
            assert_eq!(node.owns(idx), even.owns(idx) || odd.owns(idx));
            assert!(!(even.owns(idx) && odd.owns(idx)));
        }
    }
}
