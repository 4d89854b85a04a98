// SPDX-License-Identifier: Apache-2.0

use pretty_assertions::assert_eq;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use rand::{Rng, RngCore, SeedableRng};
use rand::rngs::StdRng;
use memio::{FixedSizeBufferWriter, ResizableBuffer, Result, WriterOptions};
use memio::streams::{OutputStream, Seekable, Stream};

const DATA: &str = "data123456";

#[test]
fn basics() -> Result {
	let mut writer = FixedSizeBufferWriter::new(ResizableBuffer::allocate(1024)?);
	assert_eq!(writer.tell()?, 0);

	writer.write(DATA.as_bytes())?;
	assert_eq!(writer.tell()?, DATA.len() as i64);

	writer.seek(4)?;
	assert_eq!(writer.tell()?, 4);

	writer.seek(1024)?;
	assert_eq!(writer.tell()?, 1024);

	// Write out of bounds
	assert!(writer.write(&DATA.as_bytes()[..1]).unwrap_err().is_io());

	// Seek out of bounds
	assert!(writer.seek(-1).unwrap_err().is_io());
	assert!(writer.seek(1025).unwrap_err().is_io());
	assert_eq!(writer.tell()?, 1024);

	writer.close()?;
	writer.close()?;
	assert_eq!(&writer.into_inner()[..DATA.len()], DATA.as_bytes());
	Ok(())
}

#[test]
fn rejected_write_leaves_contents() -> Result {
	let mut writer = FixedSizeBufferWriter::new(vec![b'.'; 12]);
	writer.write(DATA.as_bytes())?;
	assert!(writer.write(b"abc").unwrap_err().is_io());
	assert_eq!(writer.tell()?, 10);
	assert_eq!(writer.into_inner(), b"data123456..");
	Ok(())
}

#[test]
fn parallel_memcopy() -> Result {
	const THRESHOLD: usize = 32 * 1024;
	let mut rng = StdRng::seed_from_u64(0x5eed);

	for _ in 0..5 {
		// randomize size so chunk alignment is exercised
		let total_size = 3 * THRESHOLD + rng.gen_range(0..100);
		let mut source = vec![0; total_size];
		rng.fill_bytes(&mut source);

		let mut writer = FixedSizeBufferWriter::new(ResizableBuffer::allocate(total_size)?);
		writer.set_memcopy_threads(4);
		writer.set_memcopy_threshold(THRESHOLD);
		writer.write(&source)?;
		assert_eq!(writer.tell()?, total_size as i64);
		assert!(writer.into_inner().as_slice() == source, "parallel copy should match its source");
	}
	Ok(())
}

#[quickcheck]
fn parallel_matches_sequential(data: Vec<u8>, offset: u8, threads: u8, threshold: u8) -> TestResult {
	let offset = offset as usize;
	let len = offset + data.len();
	let options = WriterOptions::new()
		.with_memcopy_threads(threads as usize % 8)
		.with_memcopy_threshold(threshold as usize)
		.with_memcopy_block_size(8);

	let mut parallel = FixedSizeBufferWriter::with_options(vec![0; len], options);
	let mut sequential = FixedSizeBufferWriter::new(vec![0; len]);
	for writer in [&mut parallel, &mut sequential] {
		if writer.write_at(offset as i64, &data).is_err() {
			return TestResult::failed()
		}
	}
	TestResult::from_bool(parallel.into_inner() == sequential.into_inner())
}
