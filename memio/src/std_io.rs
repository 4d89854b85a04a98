// SPDX-License-Identifier: Apache-2.0

//! [`std::io`] trait implementations, for passing memory streams to code written
//! against [`Read`], [`BufRead`], [`Seek`], and [`Write`].

use std::io;
use std::io::{BufRead, Read, Seek, SeekFrom, Write};
use crate::{BufferOutputStream, BufferReader, FixedSizeBufferWriter};
use crate::streams::{InputStream, OutputStream, Seekable};

impl Read for BufferReader {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		Ok(self.read_into(buf)?)
	}
}

impl BufRead for BufferReader {
	fn fill_buf(&mut self) -> io::Result<&[u8]> {
		Ok(self.peek(usize::MAX)?)
	}

	fn consume(&mut self, amt: usize) {
		let _ = self.advance(amt);
	}
}

impl Seek for BufferReader {
	fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
		let invalid = || io::Error::new(io::ErrorKind::InvalidInput, "seek position overflow");
		let position = match pos {
			SeekFrom::Start(pos) => i64::try_from(pos).map_err(|_| invalid())?,
			SeekFrom::End(off) => (self.buffer().len() as i64)
				.checked_add(off)
				.ok_or_else(invalid)?,
			SeekFrom::Current(off) => InputStream::tell(self)?
				.checked_add(off)
				.ok_or_else(invalid)?,
		};
		Seekable::seek(self, position)?;
		Ok(position as u64)
	}
}

impl Write for BufferOutputStream<'_> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		OutputStream::write(self, buf)?;
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(OutputStream::flush(self)?)
	}
}

impl<B: AsMut<[u8]>> Write for FixedSizeBufferWriter<B> {
	/// Writes all of `buf`, or nothing if it doesn't fit in the remaining
	/// capacity.
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		OutputStream::write(self, buf)?;
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(OutputStream::flush(self)?)
	}
}
