// SPDX-License-Identifier: Apache-2.0

use crate::{Context, Error, Result};
use crate::memcopy::parallel_copy;
use super::{check_position, OutputStream, Seekable, Stream, WriterOptions};

/// An [`OutputStream`] writing into a pre-allocated target of fixed capacity,
/// such as a `Vec<u8>`, a `&mut [u8]`, or a [`ResizableBuffer`]. The target is
/// never resized; writes past the end are rejected whole.
///
/// Large writes may be copied by several threads in parallel, configured with
/// [`WriterOptions`]. This only changes how long a write takes, never its
/// result.
///
/// [`ResizableBuffer`]: crate::ResizableBuffer
pub struct FixedSizeBufferWriter<B: AsMut<[u8]>> {
	target: B,
	capacity: usize,
	position: usize,
	closed: bool,
	options: WriterOptions,
}

impl<B: AsMut<[u8]>> FixedSizeBufferWriter<B> {
	/// Creates a writer over `target` with default options.
	pub fn new(target: B) -> Self {
		Self::with_options(target, WriterOptions::default())
	}

	/// Creates a writer over `target`.
	pub fn with_options(mut target: B, options: WriterOptions) -> Self {
		let capacity = target.as_mut().len();
		Self {
			target,
			capacity,
			position: 0,
			closed: false,
			options,
		}
	}

	/// Returns the fixed capacity of the target.
	#[inline]
	pub fn capacity(&self) -> usize { self.capacity }

	/// Returns the options.
	#[inline]
	pub fn options(&self) -> WriterOptions { self.options }

	/// Sets the options, applying from the next write.
	pub fn set_options(&mut self, options: WriterOptions) {
		self.options = options;
	}

	/// Sets the number of threads used to copy large writes.
	pub fn set_memcopy_threads(&mut self, value: usize) {
		self.options.set_memcopy_threads(value);
	}

	/// Sets the minimum write size to copy in parallel.
	pub fn set_memcopy_threshold(&mut self, value: usize) {
		self.options.set_memcopy_threshold(value);
	}

	/// Sets the block size parallel copy chunks are aligned to.
	pub fn set_memcopy_block_size(&mut self, value: usize) {
		self.options.set_memcopy_block_size(value);
	}

	/// Writes `data` at `position`, leaving the cursor after it. Equivalent to a
	/// [`seek`](Seekable::seek) followed by a [`write`](OutputStream::write).
	pub fn write_at(&mut self, position: i64, data: &[u8]) -> Result {
		self.seek(position)?;
		self.write(data)
	}

	/// Returns a reference to the target.
	pub fn get_ref(&self) -> &B { &self.target }

	/// Returns the target, consuming the writer.
	pub fn into_inner(self) -> B { self.target }
}

impl<B: AsMut<[u8]>> Stream for FixedSizeBufferWriter<B> {
	fn is_closed(&self) -> bool { self.closed }

	fn close(&mut self) -> Result {
		self.closed = true;
		Ok(())
	}
}

impl<B: AsMut<[u8]>> OutputStream for FixedSizeBufferWriter<B> {
	/// Copies `data` into the target at the cursor. Fails without writing
	/// anything if `data` doesn't fit in the remaining capacity.
	fn write(&mut self, data: &[u8]) -> Result {
		self.check_open(Context::Write)?;
		let remaining = self.capacity - self.position;
		if data.len() > remaining {
			return Err(Error::capacity(Context::Write, data.len(), remaining))
		}

		let end = self.position + data.len();
		let target = &mut self.target.as_mut()[self.position..end];
		if self.options.is_parallel(data.len()) {
			parallel_copy(
				target,
				data,
				self.options.memcopy_threads(),
				self.options.memcopy_block_size()
			);
		} else {
			target.copy_from_slice(data);
		}
		self.position = end;
		Ok(())
	}

	fn tell(&self) -> Result<i64> {
		self.check_open(Context::Tell)?;
		Ok(self.position as i64)
	}
}

impl<B: AsMut<[u8]>> Seekable for FixedSizeBufferWriter<B> {
	fn seek(&mut self, position: i64) -> Result {
		self.check_open(Context::Seek)?;
		check_position(Context::Seek, position, self.capacity as i64)?;
		self.position = position as usize;
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use crate::streams::{OutputStream, Seekable, Stream, WriterOptions};
	use super::FixedSizeBufferWriter;

	#[test]
	fn rejects_whole_write() {
		let mut writer = FixedSizeBufferWriter::new(vec![0; 8]);
		writer.write(b"abcdef").unwrap();
		assert!(writer.write(b"ghi").unwrap_err().is_io());
		assert_eq!(writer.tell().unwrap(), 6);
		assert_eq!(writer.into_inner(), b"abcdef\0\0");
	}

	#[test]
	fn write_at() {
		let mut writer = FixedSizeBufferWriter::new(vec![b'.'; 8]);
		writer.write_at(2, b"ab").unwrap();
		writer.write(b"cd").unwrap();
		assert_eq!(writer.tell().unwrap(), 6);
		assert!(writer.write_at(9, b"x").unwrap_err().is_io());
		assert_eq!(writer.get_ref(), b"..abcd..");
	}

	#[test]
	fn borrowed_slice() {
		let mut target = [0u8; 4];
		let mut writer = FixedSizeBufferWriter::new(&mut target[..]);
		writer.write(b"ab").unwrap();
		writer.close().unwrap();
		assert_eq!(&target, b"ab\0\0");
	}

	#[test]
	fn closed() {
		let mut writer = FixedSizeBufferWriter::new(vec![0; 4]);
		writer.close().unwrap();
		writer.close().unwrap();
		assert!(writer.is_closed());
		assert!(writer.write(b"a").unwrap_err().is_io());
		assert!(writer.seek(0).unwrap_err().is_io());
		assert!(writer.tell().unwrap_err().is_io());
	}

	#[test]
	fn options_apply_between_writes() {
		let mut writer = FixedSizeBufferWriter::with_options(
			vec![0; 4096],
			WriterOptions::new().with_memcopy_threshold(1024)
		);
		writer.write(&[1; 2048]).unwrap();
		writer.set_memcopy_threads(4);
		assert!(writer.options().is_parallel(2048));
		writer.write(&[2; 2048]).unwrap();
		let target = writer.into_inner();
		assert!(target[..2048].iter().all(|&b| b == 1));
		assert!(target[2048..].iter().all(|&b| b == 2));
	}
}
