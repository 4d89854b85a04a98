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

use std::{fmt, io, result};
use std::collections::TryReserveError;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use amplify_derive::Display;
use ErrorKind::{Alloc, Capacity, Closed, Invalid, OutOfBounds, Unsupported};

pub type ErrorBox = Box<dyn StdError + Send + Sync>;
pub type Result<T = ()> = result::Result<T, Error>;

/// The operation an error was raised from.
#[derive(Copy, Clone, Debug, Default, Display, Eq, PartialEq)]
pub enum Context {
	#[default]
	#[display("unknown operation")]
	Unknown,
	#[display("write to stream")]
	Write,
	#[display("read from stream")]
	Read,
	#[display("peek into stream")]
	Peek,
	#[display("seek")]
	Seek,
	#[display("tell position")]
	Tell,
	#[display("get stream size")]
	Size,
	#[display("finish buffer")]
	Finish,
	#[display("reset stream")]
	Reset,
	#[display("allocate buffer")]
	Allocate,
	#[display("iterate stream")]
	Iterate,
	#[display("{0}")]
	Other(&'static str)
}

#[derive(Copy, Clone, Debug, Display, Eq, PartialEq)]
pub enum ErrorKind {
	#[display("stream closed")]
	Closed,
	#[display("position out of bounds")]
	OutOfBounds,
	#[display("insufficient capacity")]
	Capacity,
	#[display("invalid state")]
	Invalid,
	#[display("operation not supported")]
	Unsupported,
	#[display("allocation failed")]
	Alloc,
	#[display("{0}")]
	Other(&'static str),
}

impl ErrorKind {
	/// Returns `true` if the kind is an IO error: a closed stream, an out-of-bounds
	/// position, exceeded capacity, or a failed allocation.
	pub fn is_io(&self) -> bool {
		matches!(self, Closed | OutOfBounds | Capacity | Alloc)
	}

	/// Returns `true` if the kind is [`Invalid`](Self::Invalid).
	pub fn is_invalid(&self) -> bool {
		matches!(self, Invalid)
	}
}

/// A memory allocation error.
#[derive(Clone, Debug, thiserror::Error)]
#[error("failed to reserve {requested} bytes")]
pub struct AllocError {
	pub requested: usize,
	#[source]
	source: TryReserveError,
}

impl AllocError {
	pub(crate) fn new(requested: usize, source: TryReserveError) -> Self {
		Self { requested, source }
	}
}

#[derive(Debug)]
pub struct Error {
	context: Context,
	kind: ErrorKind,
	source: Option<ErrorBox>,
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let Self { context, kind, source } = self;
		if let Some(source) = source {
			write!(f, "{context} failed; {kind} ({source})")
		} else {
			write!(f, "{context} failed; {kind}")
		}
	}
}

impl StdError for Error {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		if let Some(ref source) = self.source {
			Some(source.as_ref())
		} else {
			None
		}
	}
}

impl Error {
	pub(crate) fn new(context: Context, kind: ErrorKind, source: Option<ErrorBox>) -> Self {
		Self { context, kind, source }
	}

	/// Creates a new "closed" error.
	pub fn closed(context: Context) -> Self {
		Self::new(context, Closed, None)
	}

	/// Creates a new "out of bounds" error for `position`.
	pub fn out_of_bounds(context: Context, position: i64, len: i64) -> Self {
		Self::new(
			context,
			OutOfBounds,
			Some(format!("position {position} is outside 0..={len}").into())
		)
	}

	/// Creates a new "insufficient capacity" error, raised when `count` bytes
	/// don't fit in the `remaining` space.
	pub fn capacity(context: Context, count: usize, remaining: usize) -> Self {
		Self::new(
			context,
			Capacity,
			Some(format!("{count} bytes requested, {remaining} bytes remaining").into())
		)
	}

	/// Creates a new "invalid state" error with a message.
	pub fn invalid(context: Context, message: &'static str) -> Self {
		Self::new(context, Invalid, Some(message.into()))
	}

	/// Creates a new "not supported" error.
	pub fn unsupported(context: Context) -> Self {
		Self::new(context, Unsupported, None)
	}

	/// Creates a new allocation error.
	pub fn alloc(context: Context, error: AllocError) -> Self {
		Self::new(context, Alloc, Some(error.into()))
	}

	/// Creates a new error with a custom message.
	pub fn other(context: Context, message: &'static str, source: Option<ErrorBox>) -> Self {
		Self::new(context, ErrorKind::Other(message), source)
	}

	/// Returns the operation context.
	pub fn context(&self) -> Context { self.context }

	/// Sets the operation context.
	pub fn with_context(mut self, context: Context) -> Self {
		self.context = context;
		self
	}

	/// Returns the error kind.
	pub fn kind(&self) -> ErrorKind { self.kind }

	/// Shorthand for `kind().is_io()`.
	pub fn is_io(&self) -> bool { self.kind.is_io() }

	/// Shorthand for `kind().is_invalid()`.
	pub fn is_invalid(&self) -> bool { self.kind.is_invalid() }
}

impl From<Error> for io::Error {
	fn from(value: Error) -> Self {
		let kind = match value.kind {
			Closed       => io::ErrorKind::BrokenPipe,
			OutOfBounds  => io::ErrorKind::InvalidInput,
			Capacity     => io::ErrorKind::WriteZero,
			Invalid      => io::ErrorKind::InvalidData,
			Unsupported  => io::ErrorKind::Unsupported,
			Alloc        => io::ErrorKind::OutOfMemory,
			ErrorKind::Other(_) => io::ErrorKind::Other,
		};
		Self::new(kind, value)
	}
}

/// Adds a [`Context`] to errors in a result.
pub(crate) trait ResultContext<T> {
	fn context(self, context: Context) -> Result<T>;
}

impl<T> ResultContext<T> for Result<T> {
	fn context(self, context: Context) -> Result<T> {
		self.map_err(|err| err.with_context(context))
	}
}
