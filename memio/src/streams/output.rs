// SPDX-License-Identifier: Apache-2.0

use std::mem;
use std::ops::{Deref, DerefMut};
use tracing::{trace, warn};
use crate::{Buffer, Context, Error, ResizableBuffer, Result, ResultContext};
use super::{OutputStream, Stream};

/// The smallest capacity the stream grows to on its first write.
const MIN_CAPACITY: usize = 256;

enum Storage<'a> {
	Owned(ResizableBuffer),
	Borrowed(&'a mut ResizableBuffer),
}

impl Deref for Storage<'_> {
	type Target = ResizableBuffer;

	fn deref(&self) -> &ResizableBuffer {
		match self {
			Self::Owned(buf) => buf,
			Self::Borrowed(buf) => buf,
		}
	}
}

impl DerefMut for Storage<'_> {
	fn deref_mut(&mut self) -> &mut ResizableBuffer {
		match self {
			Self::Owned(buf) => buf,
			Self::Borrowed(buf) => buf,
		}
	}
}

/// An [`OutputStream`] appending to a growable buffer.
///
/// While the stream is open, the target buffer's length is the stream's
/// capacity, which grows geometrically; bytes past [`tell`] are unused. Closing
/// the stream, either explicitly or by dropping it, resizes the target to the
/// exact number of bytes written. [`finish`] closes the stream and hands the
/// written bytes out as an immutable [`Buffer`].
///
/// [`tell`]: OutputStream::tell
/// [`finish`]: Self::finish
pub struct BufferOutputStream<'a> {
	target: Storage<'a>,
	position: usize,
	closed: bool,
}

impl BufferOutputStream<'static> {
	/// Creates a stream writing to an owned buffer with `initial_capacity` bytes
	/// allocated up front.
	pub fn create(initial_capacity: usize) -> Result<Self> {
		Ok(Self {
			target: Storage::Owned(ResizableBuffer::allocate(initial_capacity)?),
			position: 0,
			closed: false,
		})
	}
}

impl<'a> BufferOutputStream<'a> {
	/// Creates a stream writing into `target` from its start. Its current length
	/// is used as the initial capacity; existing bytes are overwritten.
	pub fn wrap(target: &'a mut ResizableBuffer) -> Self {
		Self {
			target: Storage::Borrowed(target),
			position: 0,
			closed: false,
		}
	}

	/// Returns the current capacity, the number of bytes that can be written
	/// before the target grows.
	pub fn capacity(&self) -> usize { self.target.len() }

	/// Closes the stream and returns the bytes written, trimmed to size. With a
	/// wrapped target, the bytes are moved out of it, leaving it empty.
	pub fn finish(&mut self) -> Result<Buffer> {
		self.check_open(Context::Finish)?;
		self.close()?;
		let data = mem::take(&mut *self.target);
		trace!(len = data.len(), "finished output stream");
		Ok(data.freeze())
	}

	/// Finalizes the current target, then reopens the stream on a new owned
	/// target with `initial_capacity` bytes allocated. The position is reset to
	/// zero. May be called on a finished or closed stream.
	pub fn reset(&mut self, initial_capacity: usize) -> Result {
		self.close()?;
		let target = ResizableBuffer::allocate(initial_capacity)
			.context(Context::Reset)?;
		self.target = Storage::Owned(target);
		self.position = 0;
		self.closed = false;
		Ok(())
	}

	/// Grows the target to hold at least `len` bytes.
	fn reserve(&mut self, len: usize) -> Result {
		let capacity = self.capacity();
		if len <= capacity {
			return Ok(())
		}

		let mut new_capacity = capacity.max(MIN_CAPACITY);
		while new_capacity < len {
			new_capacity = new_capacity.saturating_mul(2);
		}
		trace!(capacity, new_capacity, "growing output stream");
		self.target
			.resize(new_capacity)
			.context(Context::Write)
	}
}

impl Stream for BufferOutputStream<'_> {
	fn is_closed(&self) -> bool { self.closed }

	/// Closes the stream, resizing the target to the written length.
	fn close(&mut self) -> Result {
		if !self.closed {
			self.closed = true;
			self.target.resize(self.position)?;
		}
		Ok(())
	}
}

impl OutputStream for BufferOutputStream<'_> {
	fn write(&mut self, data: &[u8]) -> Result {
		self.check_open(Context::Write)?;
		if data.is_empty() {
			return Ok(())
		}

		let end = self.position
			.checked_add(data.len())
			.ok_or_else(|| Error::capacity(Context::Write, data.len(), usize::MAX - self.position))?;
		self.reserve(end)?;
		self.target[self.position..end].copy_from_slice(data);
		self.position = end;
		Ok(())
	}

	fn tell(&self) -> Result<i64> {
		self.check_open(Context::Tell)?;
		Ok(self.position as i64)
	}
}

impl Drop for BufferOutputStream<'_> {
	fn drop(&mut self) {
		if let Err(error) = self.close() {
			warn!(%error, "failed to close output stream on drop");
		}
	}
}

#[cfg(test)]
mod test {
	use crate::streams::{OutputStream, Stream};
	use crate::ResizableBuffer;
	use super::BufferOutputStream;

	#[test]
	fn grows_geometrically() {
		let mut stream = BufferOutputStream::create(0).unwrap();
		assert_eq!(stream.capacity(), 0);
		stream.write(b"a").unwrap();
		assert_eq!(stream.capacity(), 256);
		stream.write(&[0; 300]).unwrap();
		assert_eq!(stream.capacity(), 512);
		stream.write(&[0; 2000]).unwrap();
		assert_eq!(stream.capacity(), 4096);
		assert_eq!(stream.tell().unwrap(), 2301);
	}

	#[test]
	fn wrap_overwrites() {
		let mut target = ResizableBuffer::from(b"xxxxxxxx".to_vec());
		let mut stream = BufferOutputStream::wrap(&mut target);
		assert_eq!(stream.capacity(), 8);
		stream.write(b"abc").unwrap();
		stream.close().unwrap();
		drop(stream);
		assert_eq!(target.as_slice(), b"abc");
	}

	#[test]
	fn finish_moves_out_of_wrapped() {
		let mut target = ResizableBuffer::new();
		let mut stream = BufferOutputStream::wrap(&mut target);
		stream.write(b"abc").unwrap();
		assert_eq!(stream.finish().unwrap(), "abc");
		drop(stream);
		assert!(target.is_empty());
	}

	#[test]
	fn finish_twice() {
		let mut stream = BufferOutputStream::create(16).unwrap();
		stream.finish().unwrap();
		assert!(stream.finish().unwrap_err().is_io());
	}

	#[test]
	fn tell_after_close() {
		let mut stream = BufferOutputStream::create(16).unwrap();
		stream.close().unwrap();
		assert!(stream.tell().unwrap_err().is_io());
	}
}
