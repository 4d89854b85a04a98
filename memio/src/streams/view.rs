// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use tracing::debug;
use crate::{Buffer, Context, Error, Result};
use super::{check_position, clamp_read, InputStream, RandomAccessFile, Seekable, Stream};

/// Returns a stream reading `length` bytes of `file` starting at `offset`, with
/// its own cursor starting at zero. See [`BoundedStreamView`].
///
/// Fails with an [`Invalid`](crate::ErrorKind::Invalid) error if `offset` or
/// `length` is negative, or if the window end doesn't fit in an `i64`.
pub fn get_stream<F: RandomAccessFile + ?Sized>(
	file: Arc<F>,
	offset: i64,
	length: i64
) -> Result<BoundedStreamView<F>> {
	if offset < 0 {
		return Err(Error::invalid(Context::Other("create stream view"), "negative view offset"))
	}
	if length < 0 {
		return Err(Error::invalid(Context::Other("create stream view"), "negative view length"))
	}
	if offset.checked_add(length).is_none() {
		return Err(Error::invalid(Context::Other("create stream view"), "view end overflows"))
	}

	Ok(BoundedStreamView {
		file: Some(file),
		start: offset,
		length,
		position: 0,
	})
}

/// A stream over the window `[offset, offset + length)` of a shared
/// [`RandomAccessFile`].
///
/// Reads are addressed against the file with [`read_at`], never through its
/// cursor, so any number of views over one file keep independent positions and
/// leave the file's own position untouched. Reading past the window returns
/// fewer bytes, then none.
///
/// Closing a view releases its handle to the file. The file itself is only
/// closed if that was the last handle; a file still held elsewhere, by the
/// caller or by sibling views, stays open. Closing the file is visible through
/// every view's [`is_closed`](Stream::is_closed).
///
/// [`read_at`]: RandomAccessFile::read_at
pub struct BoundedStreamView<F: RandomAccessFile + ?Sized> {
	file: Option<Arc<F>>,
	start: i64,
	length: i64,
	position: i64,
}

impl<F: RandomAccessFile + ?Sized> BoundedStreamView<F> {
	/// Returns the window offset in the underlying file.
	pub fn offset(&self) -> i64 { self.start }

	/// Returns the window length.
	pub fn len(&self) -> i64 { self.length }

	/// Returns `true` if the window is empty.
	pub fn is_empty(&self) -> bool { self.length == 0 }

	/// Returns the underlying file, or `None` if the view is closed.
	pub fn file(&self) -> Option<&Arc<F>> { self.file.as_ref() }

	fn open_file(&self, context: Context) -> Result<&F> {
		match self.file {
			Some(ref file) if !file.is_closed() => Ok(file),
			_ => Err(Error::closed(context))
		}
	}
}

impl<F: RandomAccessFile + ?Sized> Stream for BoundedStreamView<F> {
	fn is_closed(&self) -> bool {
		self.file
			.as_ref()
			.map_or(true, |file| file.is_closed())
	}

	fn close(&mut self) -> Result {
		if let Some(mut file) = self.file.take() {
			if let Some(file) = Arc::get_mut(&mut file) {
				debug!("closing the last view of a file");
				file.close()?;
			}
		}
		Ok(())
	}
}

impl<F: RandomAccessFile + ?Sized> InputStream for BoundedStreamView<F> {
	fn read(&mut self, count: usize) -> Result<Buffer> {
		let count = clamp_read(self.position, self.length, count);
		let buf = self.open_file(Context::Read)?
			.read_at(self.start + self.position, count)?;
		self.position += buf.len() as i64;
		Ok(buf)
	}

	fn read_into(&mut self, target: &mut [u8]) -> Result<usize> {
		let count = clamp_read(self.position, self.length, target.len());
		let count = self.open_file(Context::Read)?
			.read_at_into(self.start + self.position, &mut target[..count])?;
		self.position += count as i64;
		Ok(count)
	}

	fn tell(&self) -> Result<i64> {
		self.open_file(Context::Tell)?;
		Ok(self.position)
	}

	fn supports_zero_copy(&self) -> bool {
		self.file
			.as_ref()
			.is_some_and(|file| file.supports_zero_copy())
	}
}

impl<F: RandomAccessFile + ?Sized> Seekable for BoundedStreamView<F> {
	fn seek(&mut self, position: i64) -> Result {
		self.open_file(Context::Seek)?;
		check_position(Context::Seek, position, self.length)?;
		self.position = position;
		Ok(())
	}
}

impl<F: RandomAccessFile + ?Sized> RandomAccessFile for BoundedStreamView<F> {
	fn size(&self) -> Result<i64> {
		self.open_file(Context::Size)?;
		Ok(self.length)
	}

	fn read_at(&self, position: i64, count: usize) -> Result<Buffer> {
		let file = self.open_file(Context::Read)?;
		check_position(Context::Read, position, self.length)?;
		file.read_at(self.start + position, clamp_read(position, self.length, count))
	}

	fn read_at_into(&self, position: i64, target: &mut [u8]) -> Result<usize> {
		let file = self.open_file(Context::Read)?;
		check_position(Context::Read, position, self.length)?;
		let count = clamp_read(position, self.length, target.len());
		file.read_at_into(self.start + position, &mut target[..count])
	}
}

#[cfg(test)]
mod test {
	use std::sync::Arc;
	use crate::BufferReader;
	use crate::streams::{InputStream, RandomAccessFile, Seekable, Stream};
	use super::get_stream;

	#[test]
	fn negative_window() {
		let file = Arc::new(BufferReader::from("data"));
		assert!(get_stream(file.clone(), -1, 2).err().unwrap().is_invalid());
		assert!(get_stream(file, 0, -2).err().unwrap().is_invalid());
	}

	#[test]
	fn window_end_overflow() {
		let file = Arc::new(BufferReader::from("data123456"));
		assert!(get_stream(file.clone(), i64::MAX - 2, 10).err().unwrap().is_invalid());

		let mut view = get_stream(file, i64::MAX - 10, 10).unwrap();
		view.seek(5).unwrap();
		assert!(view.read(1).unwrap_err().is_io());
		assert!(view.read_at(10, 1).unwrap_err().is_io());
		assert_eq!(view.tell().unwrap(), 5);
	}

	#[test]
	fn window_past_file_end() {
		let file = Arc::new(BufferReader::from("data123456"));
		let mut view = get_stream(file, 8, 10).unwrap();
		assert_eq!(view.read(5).unwrap(), "56");
		assert!(view.read(5).unwrap().is_empty());
		assert_eq!(view.tell().unwrap(), 2);
	}

	#[test]
	fn seek_within_window() {
		let file = Arc::new(BufferReader::from("data1data2data3"));
		let mut view = get_stream(file, 5, 5).unwrap();
		view.seek(4).unwrap();
		assert_eq!(view.read(3).unwrap(), "2");
		assert!(view.seek(6).unwrap_err().is_io());
		assert_eq!(view.tell().unwrap(), 5);
	}

	#[test]
	fn nested_views() {
		let file = Arc::new(BufferReader::from("data1data2data3"));
		let outer = Arc::new(get_stream(file, 5, 10).unwrap());
		let mut inner = get_stream(outer, 2, 6).unwrap();
		assert_eq!(inner.read(10).unwrap(), "ta2dat");
	}

	#[test]
	fn shared_file_stays_open() {
		let file = Arc::new(BufferReader::from("data"));
		let mut first = get_stream(file.clone(), 0, 2).unwrap();
		let mut second = get_stream(file, 2, 2).unwrap();

		first.close().unwrap();
		assert!(first.is_closed());
		assert!(!second.is_closed());
		assert!(!second.file().unwrap().is_closed());

		let file = second.file().unwrap().clone();
		second.close().unwrap();
		assert!(!file.is_closed(), "a handle is still held here");
		drop(file);
	}

	#[test]
	fn sole_view_releases_file() {
		let file: Arc<dyn RandomAccessFile> = Arc::new(BufferReader::from("data"));
		let weak = Arc::downgrade(&file);
		let mut view = get_stream(file, 0, 4).unwrap();
		assert!(view.supports_zero_copy());
		view.close().unwrap();
		view.close().unwrap();
		assert!(view.is_closed());
		assert!(weak.upgrade().is_none());
	}
}
