// SPDX-License-Identifier: Apache-2.0

pub const DEFAULT_MEMCOPY_THRESHOLD: usize = 1024 * 1024;
pub const DEFAULT_MEMCOPY_THREADS: usize = 1;
pub const DEFAULT_MEMCOPY_BLOCK_SIZE: usize = 64;

/// Options for tuning [`FixedSizeBufferWriter`](super::FixedSizeBufferWriter)'s
/// bulk copy performance. None of these affect what is written, only how fast.
///
/// # Memcopy threshold
///
/// The minimum write size, in bytes, to copy in parallel. Defaults to `1MiB`.
/// Spawning threads has a fixed cost which small copies don't make up for.
///
/// # Memcopy threads
///
/// The number of threads a large write is split between, at least one.
/// Defaults to `1`, meaning every copy runs on the calling thread.
///
/// # Memcopy block size
///
/// Each thread's share of a parallel copy is rounded up to a multiple of this
/// size, keeping chunk boundaries aligned. Defaults to `64B`, a common cache line
/// size.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriterOptions {
	pub memcopy_threshold: usize,
	pub memcopy_threads: usize,
	pub memcopy_block_size: usize,
}

impl Default for WriterOptions {
	fn default() -> Self { Self::new() }
}

impl WriterOptions {
	/// Creates a new set of writer options.
	pub const fn new() -> Self {
		Self {
			memcopy_threshold: DEFAULT_MEMCOPY_THRESHOLD,
			memcopy_threads: DEFAULT_MEMCOPY_THREADS,
			memcopy_block_size: DEFAULT_MEMCOPY_BLOCK_SIZE,
		}
	}

	/// Returns the parallel copy threshold.
	#[inline]
	pub const fn memcopy_threshold(&self) -> usize { self.memcopy_threshold }

	/// Returns the parallel copy thread count.
	#[inline]
	pub const fn memcopy_threads(&self) -> usize { self.memcopy_threads }

	/// Returns the parallel copy block size.
	#[inline]
	pub const fn memcopy_block_size(&self) -> usize { self.memcopy_block_size }

	/// Returns `true` if a write of `len` bytes should be copied in parallel.
	#[inline]
	pub const fn is_parallel(&self, len: usize) -> bool {
		self.memcopy_threads > 1 && len >= self.memcopy_threshold
	}

	/// Sets the parallel copy threshold.
	#[inline]
	pub fn set_memcopy_threshold(&mut self, value: usize) {
		self.memcopy_threshold = value;
	}

	/// Sets the parallel copy thread count. Zero is treated as one.
	#[inline]
	pub fn set_memcopy_threads(&mut self, value: usize) {
		self.memcopy_threads = value.max(1);
	}

	/// Sets the parallel copy block size. Zero is treated as one.
	#[inline]
	pub fn set_memcopy_block_size(&mut self, value: usize) {
		self.memcopy_block_size = value.max(1);
	}

	/// Sets the parallel copy threshold, returning the options.
	#[inline]
	pub const fn with_memcopy_threshold(mut self, value: usize) -> Self {
		self.memcopy_threshold = value;
		self
	}

	/// Sets the parallel copy thread count, returning the options. Zero is
	/// treated as one.
	#[inline]
	pub const fn with_memcopy_threads(mut self, value: usize) -> Self {
		self.memcopy_threads = if value == 0 { 1 } else { value };
		self
	}

	/// Sets the parallel copy block size, returning the options. Zero is treated
	/// as one.
	#[inline]
	pub const fn with_memcopy_block_size(mut self, value: usize) -> Self {
		self.memcopy_block_size = if value == 0 { 1 } else { value };
		self
	}
}
