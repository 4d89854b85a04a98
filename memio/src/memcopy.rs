// SPDX-License-Identifier: Apache-2.0

use std::thread;
use all_asserts::assert_gt;
use tracing::trace;

/// Copies `source` into `target` split between `threads` scoped threads, each
/// copying a disjoint, contiguous chunk. Chunk lengths are rounded up to a
/// multiple of `block_size`, so fewer than `threads` chunks may be copied when
/// the data is small. Returns once every chunk is copied. The calling thread
/// copies the first chunk itself.
///
/// # Panics
///
/// Panics if `target` and `source` have different lengths.
pub fn parallel_copy(target: &mut [u8], source: &[u8], threads: usize, block_size: usize) {
	assert_eq!(target.len(), source.len(), "copy target and source lengths should match");

	let threads = threads.max(1);
	if threads == 1 || source.len() <= block_size {
		target.copy_from_slice(source);
		return
	}

	let chunk_len = source.len()
		.div_ceil(threads)
		.next_multiple_of(block_size.max(1));
	assert_gt!(chunk_len, 0);
	trace!(len = source.len(), threads, chunk_len, "parallel copy");

	thread::scope(|scope| {
		let mut chunks = target.chunks_mut(chunk_len).zip(source.chunks(chunk_len));
		let first = chunks.next();
		for (target, source) in chunks {
			scope.spawn(move || target.copy_from_slice(source));
		}

		if let Some((target, source)) = first {
			target.copy_from_slice(source);
		}
	});
}
