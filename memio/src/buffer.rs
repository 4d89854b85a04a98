// SPDX-License-Identifier: Apache-2.0

mod resizable;

pub use resizable::*;

use std::fmt;
use std::fmt::{Debug, Formatter};
use std::ops::Deref;
use std::sync::Arc;
use all_asserts::assert_le;

/// An immutable, reference-counted byte buffer.
///
/// Cloning and [slicing](Self::slice) are O(1): the backing memory is shared,
/// never copied. A slice keeps a link to the buffer it was cut from, and the
/// memory is released only once the last buffer referencing it is dropped. This
/// lets slices outlive whatever produced them, for example a [`BufferReader`].
///
/// [`BufferReader`]: crate::BufferReader
#[derive(Clone)]
pub struct Buffer {
	memory: Arc<[u8]>,
	offset: usize,
	length: usize,
	parent: Option<Arc<Buffer>>,
}

impl Buffer {
	/// Creates an empty buffer.
	pub fn empty() -> Self { Self::from_boxed(Box::default()) }

	/// Creates a buffer taking ownership of `vec`. Excess capacity is trimmed.
	pub fn from_vec(vec: Vec<u8>) -> Self {
		Self::from_boxed(vec.into_boxed_slice())
	}

	fn from_boxed(memory: Box<[u8]>) -> Self {
		let length = memory.len();
		Self {
			memory: Arc::from(memory),
			offset: 0,
			length,
			parent: None,
		}
	}

	/// Returns the number of bytes in the buffer.
	#[inline]
	pub fn len(&self) -> usize { self.length }

	/// Returns `true` if the buffer contains no bytes.
	#[inline]
	pub fn is_empty(&self) -> bool { self.length == 0 }

	/// Returns the buffer contents.
	#[inline]
	pub fn as_slice(&self) -> &[u8] {
		&self.memory[self.offset..][..self.length]
	}

	/// Returns a zero-copy view of `length` bytes starting at `offset`. The new
	/// buffer's [parent](Self::parent) is this buffer.
	///
	/// # Panics
	///
	/// Panics if the range is out of bounds.
	pub fn slice(&self, offset: usize, length: usize) -> Self {
		assert_le!(
			offset.saturating_add(length),
			self.length,
			"slice range should lie within the parent buffer"
		);
		Self {
			memory: self.memory.clone(),
			offset: self.offset + offset,
			length,
			parent: Some(Arc::new(self.clone())),
		}
	}

	/// Returns the buffer this buffer was sliced from, if any.
	pub fn parent(&self) -> Option<&Buffer> { self.parent.as_deref() }

	/// Returns `true` if this buffer is a slice of another buffer.
	pub fn is_slice(&self) -> bool { self.parent.is_some() }

	/// Returns `true` if `other` shares this buffer's backing memory.
	pub fn shares_memory(&self, other: &Buffer) -> bool {
		Arc::ptr_eq(&self.memory, &other.memory)
	}

	/// Copies the contents into a new vector.
	pub fn to_vec(&self) -> Vec<u8> { self.as_slice().to_vec() }
}

impl Default for Buffer {
	fn default() -> Self { Self::empty() }
}

impl Deref for Buffer {
	type Target = [u8];

	fn deref(&self) -> &[u8] { self.as_slice() }
}

impl AsRef<[u8]> for Buffer {
	fn as_ref(&self) -> &[u8] { self.as_slice() }
}

impl Debug for Buffer {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Buffer")
			.field("data", &self.as_slice())
			.field("offset", &self.offset)
			.field("is_slice", &self.is_slice())
			.finish_non_exhaustive()
	}
}

impl PartialEq for Buffer {
	fn eq(&self, other: &Self) -> bool {
		self.as_slice() == other.as_slice()
	}
}

impl Eq for Buffer { }

impl PartialEq<[u8]> for Buffer {
	fn eq(&self, other: &[u8]) -> bool { self.as_slice() == other }
}

impl PartialEq<&[u8]> for Buffer {
	fn eq(&self, other: &&[u8]) -> bool { self.as_slice() == *other }
}

impl PartialEq<str> for Buffer {
	fn eq(&self, other: &str) -> bool { self.as_slice() == other.as_bytes() }
}

impl PartialEq<&str> for Buffer {
	fn eq(&self, other: &&str) -> bool { self.as_slice() == other.as_bytes() }
}

impl From<Vec<u8>> for Buffer {
	fn from(value: Vec<u8>) -> Self { Self::from_vec(value) }
}

impl From<&[u8]> for Buffer {
	fn from(value: &[u8]) -> Self { Self::from_boxed(value.into()) }
}

impl From<&str> for Buffer {
	fn from(value: &str) -> Self { value.as_bytes().into() }
}

impl From<String> for Buffer {
	fn from(value: String) -> Self { value.into_bytes().into() }
}

#[cfg(feature = "bytes")]
impl From<Buffer> for bytes::Bytes {
	/// Converts into [`Bytes`](bytes::Bytes) without copying, keeping the backing
	/// memory alive for as long as the bytes are.
	fn from(value: Buffer) -> Self {
		bytes::Bytes::from_owner(value)
	}
}
