// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use crate::{Buffer, Context, Result};
use super::{check_position, clamp_read, InputStream, RandomAccessFile, Seekable, Stream};

/// A zero-copy [`RandomAccessFile`] reading from a [`Buffer`].
///
/// [`read`](InputStream::read) returns slices sharing the source buffer's memory
/// rather than copies. Slices hold their own reference to that memory, so they
/// stay valid after the reader is dropped.
///
/// A reader shared through an [`Arc`], for example by several
/// [`BoundedStreamView`]s, can still be closed by any holder; see the
/// [`Stream`] implementation for `Arc<BufferReader>`.
///
/// [`BoundedStreamView`]: super::BoundedStreamView
#[derive(Debug)]
pub struct BufferReader {
	buffer: Buffer,
	position: usize,
	closed: AtomicBool,
}

impl BufferReader {
	/// Creates a reader over `buffer`, starting at position zero.
	pub fn new(buffer: Buffer) -> Self {
		Self {
			buffer,
			position: 0,
			closed: AtomicBool::new(false),
		}
	}

	/// Returns the source buffer.
	pub fn buffer(&self) -> &Buffer { &self.buffer }

	#[inline]
	fn len(&self) -> i64 { self.buffer.len() as i64 }

	/// Returns the number of bytes readable from `position`, at most `count`.
	#[inline]
	fn readable(&self, position: usize, count: usize) -> usize {
		clamp_read(position as i64, self.len(), count)
	}
}

impl Clone for BufferReader {
	fn clone(&self) -> Self {
		Self {
			buffer: self.buffer.clone(),
			position: self.position,
			closed: AtomicBool::new(self.is_closed()),
		}
	}
}

impl From<Buffer> for BufferReader {
	fn from(value: Buffer) -> Self { Self::new(value) }
}

impl From<Vec<u8>> for BufferReader {
	fn from(value: Vec<u8>) -> Self { Self::new(value.into()) }
}

impl From<&[u8]> for BufferReader {
	fn from(value: &[u8]) -> Self { Self::new(value.into()) }
}

impl From<&str> for BufferReader {
	fn from(value: &str) -> Self { Self::new(value.into()) }
}

impl From<String> for BufferReader {
	fn from(value: String) -> Self { Self::new(value.into()) }
}

impl Stream for BufferReader {
	fn is_closed(&self) -> bool { self.closed.load(Ordering::Acquire) }

	fn close(&mut self) -> Result {
		*self.closed.get_mut() = true;
		Ok(())
	}
}

/// Closes the shared reader for every holder of the [`Arc`], including views
/// created over it.
impl Stream for Arc<BufferReader> {
	fn is_closed(&self) -> bool { (**self).is_closed() }

	fn close(&mut self) -> Result {
		self.closed.store(true, Ordering::Release);
		Ok(())
	}
}

impl InputStream for BufferReader {
	fn read(&mut self, count: usize) -> Result<Buffer> {
		self.check_open(Context::Read)?;
		let count = self.readable(self.position, count);
		let slice = self.buffer.slice(self.position, count);
		self.position += count;
		Ok(slice)
	}

	fn read_into(&mut self, target: &mut [u8]) -> Result<usize> {
		self.check_open(Context::Read)?;
		let count = self.readable(self.position, target.len());
		target[..count].copy_from_slice(&self.buffer[self.position..][..count]);
		self.position += count;
		Ok(count)
	}

	fn peek(&mut self, count: usize) -> Result<&[u8]> {
		self.check_open(Context::Peek)?;
		let count = self.readable(self.position, count);
		Ok(&self.buffer[self.position..][..count])
	}

	fn advance(&mut self, count: usize) -> Result<usize> {
		self.check_open(Context::Read)?;
		let count = self.readable(self.position, count);
		self.position += count;
		Ok(count)
	}

	fn tell(&self) -> Result<i64> {
		self.check_open(Context::Tell)?;
		Ok(self.position as i64)
	}

	fn supports_zero_copy(&self) -> bool { true }
}

impl Seekable for BufferReader {
	fn seek(&mut self, position: i64) -> Result {
		self.check_open(Context::Seek)?;
		check_position(Context::Seek, position, self.len())?;
		self.position = position as usize;
		Ok(())
	}
}

impl RandomAccessFile for BufferReader {
	fn size(&self) -> Result<i64> {
		self.check_open(Context::Size)?;
		Ok(self.len())
	}

	fn read_at(&self, position: i64, count: usize) -> Result<Buffer> {
		self.check_open(Context::Read)?;
		check_position(Context::Read, position, self.len())?;
		let position = position as usize;
		Ok(self.buffer.slice(position, self.readable(position, count)))
	}

	fn read_at_into(&self, position: i64, target: &mut [u8]) -> Result<usize> {
		self.check_open(Context::Read)?;
		check_position(Context::Read, position, self.len())?;
		let position = position as usize;
		let count = self.readable(position, target.len());
		target[..count].copy_from_slice(&self.buffer[position..][..count]);
		Ok(count)
	}
}
