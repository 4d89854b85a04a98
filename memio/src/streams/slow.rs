// SPDX-License-Identifier: Apache-2.0

//! Stream decorators injecting latency into reads, for exercising timeout,
//! cancellation and buffering behavior in tests without real IO.

use std::sync::Arc;
use std::time::Duration;
use crate::{Buffer, Result};
use super::{InputStream, LatencyGenerator, NormalLatency, RandomAccessFile, Seekable, Stream};

/// An [`InputStream`] that sleeps before every read or peek, then forwards it to
/// the wrapped stream. Everything else is forwarded immediately. Closing the
/// decorator closes the wrapped stream.
pub struct SlowInputStream<S> {
	inner: S,
	latencies: Arc<dyn LatencyGenerator>,
}

impl<S: InputStream> SlowInputStream<S> {
	/// Wraps `inner` with delays normally distributed around `average_latency`.
	pub fn new(inner: S, average_latency: Duration) -> Self {
		Self::with_generator(inner, Arc::new(NormalLatency::new(average_latency)))
	}

	/// Wraps `inner` with delays drawn from `latencies`, which may be shared with
	/// other streams.
	pub fn with_generator(inner: S, latencies: Arc<dyn LatencyGenerator>) -> Self {
		Self { inner, latencies }
	}

	/// Returns a reference to the wrapped stream.
	pub fn get_ref(&self) -> &S { &self.inner }

	/// Returns a mutable reference to the wrapped stream.
	pub fn get_mut(&mut self) -> &mut S { &mut self.inner }

	/// Returns the wrapped stream, consuming the decorator.
	pub fn into_inner(self) -> S { self.inner }
}

impl<S: InputStream> Stream for SlowInputStream<S> {
	fn is_closed(&self) -> bool { self.inner.is_closed() }

	fn close(&mut self) -> Result { self.inner.close() }
}

impl<S: InputStream> InputStream for SlowInputStream<S> {
	fn read(&mut self, count: usize) -> Result<Buffer> {
		self.latencies.sleep();
		self.inner.read(count)
	}

	fn read_into(&mut self, target: &mut [u8]) -> Result<usize> {
		self.latencies.sleep();
		self.inner.read_into(target)
	}

	fn peek(&mut self, count: usize) -> Result<&[u8]> {
		self.latencies.sleep();
		self.inner.peek(count)
	}

	fn tell(&self) -> Result<i64> { self.inner.tell() }

	fn supports_zero_copy(&self) -> bool { self.inner.supports_zero_copy() }
}

impl<S: InputStream + Seekable> Seekable for SlowInputStream<S> {
	fn seek(&mut self, position: i64) -> Result { self.inner.seek(position) }
}

/// A [`RandomAccessFile`] that sleeps before every read or peek, including
/// addressed reads, then forwards it to the wrapped file. Everything else is
/// forwarded immediately. Closing the decorator closes the wrapped file.
pub struct SlowRandomAccessFile<F> {
	stream: SlowInputStream<F>,
}

impl<F: RandomAccessFile> SlowRandomAccessFile<F> {
	/// Wraps `inner` with delays normally distributed around `average_latency`.
	pub fn new(inner: F, average_latency: Duration) -> Self {
		Self { stream: SlowInputStream::new(inner, average_latency) }
	}

	/// Wraps `inner` with delays drawn from `latencies`, which may be shared with
	/// other streams.
	pub fn with_generator(inner: F, latencies: Arc<dyn LatencyGenerator>) -> Self {
		Self { stream: SlowInputStream::with_generator(inner, latencies) }
	}

	pub fn get_ref(&self) -> &F { self.stream.get_ref() }

	pub fn get_mut(&mut self) -> &mut F { self.stream.get_mut() }

	pub fn into_inner(self) -> F { self.stream.into_inner() }
}

impl<F: RandomAccessFile> Stream for SlowRandomAccessFile<F> {
	fn is_closed(&self) -> bool { self.stream.is_closed() }

	fn close(&mut self) -> Result { self.stream.close() }
}

impl<F: RandomAccessFile> InputStream for SlowRandomAccessFile<F> {
	fn read(&mut self, count: usize) -> Result<Buffer> { self.stream.read(count) }

	fn read_into(&mut self, target: &mut [u8]) -> Result<usize> { self.stream.read_into(target) }

	fn peek(&mut self, count: usize) -> Result<&[u8]> { self.stream.peek(count) }

	fn tell(&self) -> Result<i64> { self.stream.tell() }

	fn supports_zero_copy(&self) -> bool { self.stream.supports_zero_copy() }
}

impl<F: RandomAccessFile> Seekable for SlowRandomAccessFile<F> {
	fn seek(&mut self, position: i64) -> Result { self.stream.seek(position) }
}

impl<F: RandomAccessFile> RandomAccessFile for SlowRandomAccessFile<F> {
	fn size(&self) -> Result<i64> { self.get_ref().size() }

	fn read_at(&self, position: i64, count: usize) -> Result<Buffer> {
		self.stream.latencies.sleep();
		self.get_ref().read_at(position, count)
	}

	fn read_at_into(&self, position: i64, target: &mut [u8]) -> Result<usize> {
		self.stream.latencies.sleep();
		self.get_ref().read_at_into(position, target)
	}
}

#[cfg(test)]
mod test {
	use std::sync::Arc;
	use std::time::{Duration, Instant};
	use crate::BufferReader;
	use crate::streams::{InputStream, RandomAccessFile, Seekable, Stream};
	use super::{SlowInputStream, SlowRandomAccessFile};

	#[test]
	fn forwards_without_delay() {
		let mut slow = SlowRandomAccessFile::new(BufferReader::from("abcdefghijkl"), Duration::from_secs(60));
		let start = Instant::now();
		slow.seek(6).unwrap();
		assert_eq!(slow.tell().unwrap(), 6);
		assert_eq!(slow.size().unwrap(), 12);
		assert!(!slow.is_closed());
		assert!(start.elapsed() < Duration::from_secs(30));
	}

	#[test]
	fn read_at_delays() {
		let latency = Duration::from_millis(20);
		let slow = SlowRandomAccessFile::with_generator(BufferReader::from("abcdefghijkl"), Arc::new(latency));
		let start = Instant::now();
		assert_eq!(slow.read_at(3, 3).unwrap(), "def");
		assert!(start.elapsed() >= latency);
	}

	#[test]
	fn inner_close_visible() {
		let mut slow = SlowInputStream::new(BufferReader::from("abc"), Duration::ZERO);
		slow.get_mut().close().unwrap();
		assert!(slow.is_closed());
		assert!(slow.read(1).unwrap_err().is_io());
	}
}
