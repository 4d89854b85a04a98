// SPDX-License-Identifier: Apache-2.0

use std::iter::FusedIterator;
use crate::{Buffer, Context, Error, Result, ResultContext};
use super::InputStream;

/// Returns an iterator reading `stream` in chunks of `block_size` bytes from its
/// current position. See [`InputStreamIterator`].
///
/// Fails with an [`Invalid`](crate::ErrorKind::Invalid) error if the stream is
/// closed or `block_size` is zero.
pub fn make_input_stream_iterator<S: InputStream>(
	stream: S,
	block_size: usize
) -> Result<InputStreamIterator<S>> {
	if stream.is_closed() {
		return Err(Error::invalid(Context::Iterate, "cannot iterate over a closed stream"))
	}
	if block_size == 0 {
		return Err(Error::invalid(Context::Iterate, "block size must be non-zero"))
	}

	Ok(InputStreamIterator {
		stream: Some(stream),
		block_size,
	})
}

/// A lazy, forward-only sequence of chunks read from an [`InputStream`], each of
/// at most the block size. Every chunk is produced by exactly one read.
///
/// The sequence ends at the first empty read; the stream is released then, and
/// every following call produces the end again. If the stream is closed before
/// the end, the next call fails with an [`Invalid`](crate::ErrorKind::Invalid)
/// error.
pub struct InputStreamIterator<S> {
	stream: Option<S>,
	block_size: usize,
}

impl<S: InputStream> InputStreamIterator<S> {
	/// Reads the next chunk, returning `None` at the end.
	pub fn next_chunk(&mut self) -> Result<Option<Buffer>> {
		let Some(stream) = self.stream.as_mut() else {
			return Ok(None)
		};

		if stream.is_closed() {
			return Err(Error::invalid(Context::Iterate, "stream closed during iteration"))
		}

		let chunk = stream.read(self.block_size)
			.context(Context::Iterate)?;
		if chunk.is_empty() {
			self.stream = None;
			Ok(None)
		} else {
			Ok(Some(chunk))
		}
	}

	/// Returns the block size.
	pub fn block_size(&self) -> usize { self.block_size }

	/// Returns `true` if the end of the stream was reached.
	pub fn is_done(&self) -> bool { self.stream.is_none() }

	/// Returns a reference to the stream, or `None` once iteration is done.
	pub fn get_ref(&self) -> Option<&S> { self.stream.as_ref() }

	/// Returns a mutable reference to the stream, or `None` once iteration is
	/// done.
	pub fn get_mut(&mut self) -> Option<&mut S> { self.stream.as_mut() }
}

impl<S: InputStream> Iterator for InputStreamIterator<S> {
	type Item = Result<Buffer>;

	fn next(&mut self) -> Option<Self::Item> {
		self.next_chunk().transpose()
	}
}

impl<S: InputStream> FusedIterator for InputStreamIterator<S> { }
