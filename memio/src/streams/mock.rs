// SPDX-License-Identifier: Apache-2.0

use crate::{Context, Result};
use super::{OutputStream, Stream};

/// An [`OutputStream`] that writes to nowhere, dropping any data written to it
/// while counting its length. Useful for measuring the size of some output
/// without materializing it.
#[derive(Copy, Clone, Debug, Default)]
pub struct MockOutputStream {
	written: usize,
	closed: bool,
}

impl MockOutputStream {
	pub fn new() -> Self { Self::default() }

	/// Returns the number of bytes written so far, even after closing.
	pub fn written(&self) -> usize { self.written }
}

impl Stream for MockOutputStream {
	fn is_closed(&self) -> bool { self.closed }

	fn close(&mut self) -> Result {
		self.closed = true;
		Ok(())
	}
}

impl OutputStream for MockOutputStream {
	/// Counts and drops `data`.
	fn write(&mut self, data: &[u8]) -> Result {
		self.check_open(Context::Write)?;
		self.written += data.len();
		Ok(())
	}

	fn tell(&self) -> Result<i64> {
		self.check_open(Context::Tell)?;
		Ok(self.written as i64)
	}
}

#[cfg(test)]
mod test {
	use crate::streams::{OutputStream, Stream};
	use super::MockOutputStream;

	#[test]
	fn counts() {
		let mut stream = MockOutputStream::new();
		stream.write(b"data123456").unwrap();
		stream.write(b"").unwrap();
		stream.write(b"abc").unwrap();
		assert_eq!(stream.tell().unwrap(), 13);

		stream.close().unwrap();
		stream.close().unwrap();
		assert!(stream.write(b"x").unwrap_err().is_io());
		assert_eq!(stream.written(), 13);
	}
}
