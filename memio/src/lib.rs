// Copyright 2023 Strixpyrr
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! ## How it works
//!
//! Data lives in [`Buffer`]s: immutable, reference-counted blocks of memory.
//! Slicing a buffer doesn't copy anything; the slice points into the same memory
//! and keeps a link to the buffer it was cut from. Memory is freed once the last
//! buffer referencing it is dropped, so slices are free to outlive their source.
//!
//! ### Streams
//!
//! Streams are split by capability into traits: [`OutputStream`] writes,
//! [`InputStream`] reads sequentially, [`Seekable`] moves a cursor, and
//! [`RandomAccessFile`] combines reading and seeking with addressed reads at
//! any position. All streams can be closed; closing is idempotent, and any
//! operation on a closed stream but [`is_closed`] and [`close`] fails.
//!
//! - [`BufferOutputStream`] appends to a growable buffer, trimming it to size
//!   once closed, finished, or dropped.
//! - [`FixedSizeBufferWriter`] writes into pre-allocated memory, copying large
//!   writes with several threads.
//! - [`BufferReader`] reads from a buffer without copying, handing out slices.
//! - [`get_stream`] creates a [`BoundedStreamView`], a window into a shared
//!   file with its own cursor.
//! - [`SlowInputStream`] and [`SlowRandomAccessFile`] add latency to reads.
//! - [`make_input_stream_iterator`] reads any stream in fixed-size chunks.
//!
//! Reading past the end of data is never an error, it just returns fewer bytes.
//! Out-of-bounds seeks, writes past a fixed capacity, and operations on closed
//! streams fail without changing the stream.
//!
//! [`OutputStream`]: streams::OutputStream
//! [`InputStream`]: streams::InputStream
//! [`Seekable`]: streams::Seekable
//! [`RandomAccessFile`]: streams::RandomAccessFile
//! [`is_closed`]: streams::Stream::is_closed
//! [`close`]: streams::Stream::close

mod buffer;
mod error;
mod memcopy;
mod std_io;
pub mod streams;

pub use buffer::*;
pub use error::*;
pub use memcopy::parallel_copy;
pub use streams::{
	BoundedStreamView,
	BufferOutputStream,
	BufferReader,
	FixedSizeBufferWriter,
	get_stream,
	InputStreamIterator,
	make_input_stream_iterator,
	MockOutputStream,
	SlowInputStream,
	SlowRandomAccessFile,
	WriterOptions,
};
