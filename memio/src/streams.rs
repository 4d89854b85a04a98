// Copyright 2023 Strixpyrr
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Stream contracts, split by capability: [`OutputStream`] for writing,
//! [`InputStream`] for sequential reading, [`Seekable`] for cursor movement,
//! and [`RandomAccessFile`] for readers of known size that also support
//! addressed reads.

mod fixed;
mod iter;
mod latency;
mod mock;
mod options;
mod output;
mod reader;
mod slow;
mod view;

pub use fixed::*;
pub use iter::*;
pub use latency::*;
pub use mock::*;
pub use options::*;
pub use output::*;
pub use reader::*;
pub use slow::*;
pub use view::*;

use crate::{Buffer, Context, Error, Result};

/// A data stream, either [`InputStream`] or [`OutputStream`].
pub trait Stream {
	/// Returns `true` if the stream is closed. Always answerable, even after
	/// the stream is closed.
	fn is_closed(&self) -> bool;

	/// Closes the stream. Closing is idempotent, `close` may be called more than
	/// once with no effect.
	fn close(&mut self) -> Result;

	/// Returns a "closed" error for `context` if the stream is closed.
	#[inline]
	fn check_open(&self, context: Context) -> Result {
		if self.is_closed() {
			Err(Error::closed(context))
		} else {
			Ok(())
		}
	}
}

/// A writable stream.
pub trait OutputStream: Stream {
	/// Writes all of `data` to the stream.
	fn write(&mut self, data: &[u8]) -> Result;

	/// Writes the contents of `buffer` to the stream.
	fn write_buffer(&mut self, buffer: &Buffer) -> Result {
		self.write(buffer)
	}

	/// Returns the current write position.
	fn tell(&self) -> Result<i64>;

	/// Writes buffered data to its final target.
	fn flush(&mut self) -> Result {
		self.check_open(Context::Other("flush stream"))
	}
}

/// A readable stream.
pub trait InputStream: Stream {
	/// Reads at most `count` bytes, advancing the stream. Fewer bytes than
	/// requested are returned at the end of the stream, and an empty buffer once
	/// the stream is exhausted.
	fn read(&mut self, count: usize) -> Result<Buffer>;

	/// Reads at most `target.len()` bytes into `target`, returning the number of
	/// bytes read.
	fn read_into(&mut self, target: &mut [u8]) -> Result<usize>;

	/// Returns at most `count` bytes without advancing the stream. The view
	/// borrows the stream and is only valid until its next mutation.
	fn peek(&mut self, count: usize) -> Result<&[u8]> {
		let _ = count;
		self.check_open(Context::Peek)?;
		Err(Error::unsupported(Context::Peek))
	}

	/// Skips at most `count` bytes, returning the number of bytes skipped.
	fn advance(&mut self, count: usize) -> Result<usize> {
		Ok(self.read(count)?.len())
	}

	/// Returns the current read position.
	fn tell(&self) -> Result<i64>;

	/// Returns `true` if [`read`](Self::read) returns views into existing memory
	/// rather than copies.
	fn supports_zero_copy(&self) -> bool { false }
}

/// A stream that supports moving its cursor to an absolute position.
pub trait Seekable {
	/// Seeks to `position`. Fails if the position is negative or past the end of
	/// the stream, leaving the cursor unchanged.
	fn seek(&mut self, position: i64) -> Result;
}

/// A readable, seekable stream of known size supporting addressed reads.
pub trait RandomAccessFile: InputStream + Seekable {
	/// Returns the size of the file in bytes.
	fn size(&self) -> Result<i64>;

	/// Reads at most `count` bytes at `position` without moving the cursor.
	fn read_at(&self, position: i64, count: usize) -> Result<Buffer>;

	/// Reads at most `target.len()` bytes at `position` into `target` without
	/// moving the cursor, returning the number of bytes read.
	fn read_at_into(&self, position: i64, target: &mut [u8]) -> Result<usize>;
}

macro_rules! forward_impl {
	($($ty:ty)+) => {
		$(
		impl<S: Stream + ?Sized> Stream for $ty {
			#[inline]
			fn is_closed(&self) -> bool { (**self).is_closed() }

			#[inline]
			fn close(&mut self) -> Result { (**self).close() }
		}

		impl<S: OutputStream + ?Sized> OutputStream for $ty {
			#[inline]
			fn write(&mut self, data: &[u8]) -> Result { (**self).write(data) }

			#[inline]
			fn write_buffer(&mut self, buffer: &Buffer) -> Result { (**self).write_buffer(buffer) }

			#[inline]
			fn tell(&self) -> Result<i64> { OutputStream::tell(&**self) }

			#[inline]
			fn flush(&mut self) -> Result { (**self).flush() }
		}

		impl<S: InputStream + ?Sized> InputStream for $ty {
			#[inline]
			fn read(&mut self, count: usize) -> Result<Buffer> { (**self).read(count) }

			#[inline]
			fn read_into(&mut self, target: &mut [u8]) -> Result<usize> { (**self).read_into(target) }

			#[inline]
			fn peek(&mut self, count: usize) -> Result<&[u8]> { (**self).peek(count) }

			#[inline]
			fn advance(&mut self, count: usize) -> Result<usize> { (**self).advance(count) }

			#[inline]
			fn tell(&self) -> Result<i64> { InputStream::tell(&**self) }

			#[inline]
			fn supports_zero_copy(&self) -> bool { (**self).supports_zero_copy() }
		}

		impl<S: Seekable + ?Sized> Seekable for $ty {
			#[inline]
			fn seek(&mut self, position: i64) -> Result { (**self).seek(position) }
		}

		impl<S: RandomAccessFile + ?Sized> RandomAccessFile for $ty {
			#[inline]
			fn size(&self) -> Result<i64> { (**self).size() }

			#[inline]
			fn read_at(&self, position: i64, count: usize) -> Result<Buffer> {
				(**self).read_at(position, count)
			}

			#[inline]
			fn read_at_into(&self, position: i64, target: &mut [u8]) -> Result<usize> {
				(**self).read_at_into(position, target)
			}
		}
		)+
	};
}

forward_impl! { &mut S Box<S> }

/// Clamps a read of `count` bytes at `position` to a stream of `len` bytes,
/// returning the number of readable bytes.
#[inline]
pub(crate) fn clamp_read(position: i64, len: i64, count: usize) -> usize {
	let remaining = len.saturating_sub(position).max(0);
	usize::try_from(remaining).map_or(count, |remaining| count.min(remaining))
}

/// Checks that `position` is in `0..=len`.
#[inline]
pub(crate) fn check_position(context: Context, position: i64, len: i64) -> Result {
	if (0..=len).contains(&position) {
		Ok(())
	} else {
		Err(Error::out_of_bounds(context, position, len))
	}
}
