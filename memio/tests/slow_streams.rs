// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::{Duration, Instant};
use memio::{BufferReader, Result, SlowInputStream, SlowRandomAccessFile};
use memio::streams::{InputStream, NormalLatency, Stream};

const LATENCY: Duration = Duration::from_millis(60);

macro_rules! slow_stream_tests {
	($($name:ident: $ty:ident),+) => {
		$(
		mod $name {
			use super::*;
			use pretty_assertions::assert_eq;

			#[test]
			fn basics() -> Result {
				let mut reader = BufferReader::from("abcdefghijkl");
				{
					let mut slow = $ty::new(&mut reader, LATENCY);
					assert!(!slow.is_closed());

					let start = Instant::now();
					let buf = slow.read(6)?;
					let elapsed = start.elapsed();
					assert_eq!(buf, "abcdef");
					assert!(elapsed > LATENCY / 3, "read returned after {elapsed:?}");

					assert_eq!(slow.peek(4)?, b"ghij");

					slow.close()?;
					assert!(slow.is_closed());
					assert!(slow.get_ref().is_closed());
					slow.close()?;
					assert!(slow.is_closed());
				}
				assert!(reader.is_closed());
				Ok(())
			}

			#[test]
			fn shared_generator() -> Result {
				let latencies = Arc::new(NormalLatency::with_seed(Duration::from_millis(5), 1));
				let mut first = $ty::with_generator(BufferReader::from("abc"), latencies.clone());
				let mut second = $ty::with_generator(BufferReader::from("def"), latencies);
				assert_eq!(first.read(3)?, "abc");
				assert_eq!(second.read(3)?, "def");
				assert_eq!(first.tell()?, 3);
				Ok(())
			}

			#[test]
			fn inner_close_visible() -> Result {
				let mut slow = $ty::new(BufferReader::from("abc"), Duration::ZERO);
				slow.get_mut().close()?;
				assert!(slow.is_closed());
				assert!(slow.read(1).unwrap_err().is_io());
				assert!(slow.into_inner().is_closed());
				Ok(())
			}
		}
		)+
	};
}

slow_stream_tests! {
	slow_input_stream: SlowInputStream,
	slow_random_access_file: SlowRandomAccessFile
}
