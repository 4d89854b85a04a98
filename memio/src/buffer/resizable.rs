// SPDX-License-Identifier: Apache-2.0

use std::ops::{Deref, DerefMut};
use crate::{AllocError, Buffer, Context, Error, Result};

/// A mutable, growable byte buffer. Unlike [`Vec`], growing is fallible and
/// reports an [`Alloc`](crate::ErrorKind::Alloc) error rather than aborting.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResizableBuffer {
	data: Vec<u8>,
}

impl ResizableBuffer {
	/// Creates an empty buffer.
	pub const fn new() -> Self { Self { data: Vec::new() } }

	/// Allocates a zero-filled buffer of `len` bytes.
	pub fn allocate(len: usize) -> Result<Self> {
		let mut buf = Self::new();
		buf.resize(len)?;
		Ok(buf)
	}

	/// Allocates an empty buffer with space for at least `capacity` bytes.
	pub fn with_capacity(capacity: usize) -> Result<Self> {
		let mut buf = Self::new();
		buf.reserve(capacity)?;
		Ok(buf)
	}

	#[inline]
	pub fn len(&self) -> usize { self.data.len() }

	#[inline]
	pub fn is_empty(&self) -> bool { self.data.is_empty() }

	#[inline]
	pub fn capacity(&self) -> usize { self.data.capacity() }

	#[inline]
	pub fn as_slice(&self) -> &[u8] { &self.data }

	#[inline]
	pub fn as_mut_slice(&mut self) -> &mut [u8] { &mut self.data }

	/// Reserves space for at least `additional` bytes past the current length.
	pub fn reserve(&mut self, additional: usize) -> Result {
		self.data
			.try_reserve(additional)
			.map_err(|err| Error::alloc(Context::Allocate, AllocError::new(additional, err)))
	}

	/// Resizes to `new_len` bytes. Existing bytes up to `min(len, new_len)` are
	/// preserved, new bytes are zeroed.
	pub fn resize(&mut self, new_len: usize) -> Result {
		if let Some(additional) = new_len.checked_sub(self.len()) {
			self.reserve(additional)?;
		}
		self.data.resize(new_len, 0);
		Ok(())
	}

	/// Releases excess capacity.
	pub fn shrink_to_fit(&mut self) {
		self.data.shrink_to_fit();
	}

	/// Clears all bytes, keeping the allocation.
	pub fn clear(&mut self) {
		self.data.clear();
	}

	/// Converts into an immutable [`Buffer`], trimming excess capacity.
	pub fn freeze(self) -> Buffer { self.data.into() }

	/// Returns the inner vector.
	pub fn into_vec(self) -> Vec<u8> { self.data }
}

impl Deref for ResizableBuffer {
	type Target = [u8];

	fn deref(&self) -> &[u8] { &self.data }
}

impl DerefMut for ResizableBuffer {
	fn deref_mut(&mut self) -> &mut [u8] { &mut self.data }
}

impl AsRef<[u8]> for ResizableBuffer {
	fn as_ref(&self) -> &[u8] { &self.data }
}

impl AsMut<[u8]> for ResizableBuffer {
	fn as_mut(&mut self) -> &mut [u8] { &mut self.data }
}

impl From<Vec<u8>> for ResizableBuffer {
	fn from(data: Vec<u8>) -> Self { Self { data } }
}

#[cfg(test)]
mod test {
	use super::ResizableBuffer;

	#[test]
	fn resize_preserves_prefix() {
		let mut buf = ResizableBuffer::from(b"data123456".to_vec());
		buf.resize(4).unwrap();
		assert_eq!(buf.as_slice(), b"data");
		buf.resize(6).unwrap();
		assert_eq!(buf.as_slice(), b"data\0\0");
	}

	#[test]
	fn allocate_zeroed() {
		let buf = ResizableBuffer::allocate(16).unwrap();
		assert_eq!(buf.len(), 16);
		assert!(buf.iter().all(|&b| b == 0));
	}

	#[test]
	fn allocate_overflow() {
		let err = ResizableBuffer::with_capacity(usize::MAX).unwrap_err();
		assert!(err.is_io());
	}

	#[test]
	fn freeze() {
		let mut buf = ResizableBuffer::with_capacity(64).unwrap();
		buf.resize(3).unwrap();
		buf.as_mut_slice().copy_from_slice(b"abc");
		assert_eq!(buf.freeze(), "abc");
	}
}
