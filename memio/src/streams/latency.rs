// SPDX-License-Identifier: Apache-2.0

use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rand_distr::StandardNormal;
use tracing::trace;

/// A source of per-operation delays for the slow stream decorators.
pub trait LatencyGenerator: Send + Sync {
	/// Returns the delay for the next operation.
	fn next_latency(&self) -> Duration;

	/// Blocks the calling thread for the next delay.
	fn sleep(&self) {
		let latency = self.next_latency();
		if !latency.is_zero() {
			trace!(?latency, "injecting latency");
			thread::sleep(latency);
		}
	}
}

/// A fixed delay.
impl LatencyGenerator for Duration {
	fn next_latency(&self) -> Duration { *self }
}

/// Delays drawn from a normal distribution around an average, with a standard
/// deviation of a tenth of the average. Negative draws are clamped to zero.
///
/// Draws are reproducible when created with a seed. The generator may be
/// shared between streams; draws are serialized.
#[derive(Debug)]
pub struct NormalLatency {
	mean: f64,
	std_dev: f64,
	rng: Mutex<StdRng>,
}

impl NormalLatency {
	/// Creates a generator with a random seed.
	pub fn new(average: Duration) -> Self {
		Self::from_rng(average, StdRng::from_entropy())
	}

	/// Creates a generator with a fixed seed.
	pub fn with_seed(average: Duration, seed: u64) -> Self {
		Self::from_rng(average, StdRng::seed_from_u64(seed))
	}

	fn from_rng(average: Duration, rng: StdRng) -> Self {
		let mean = average.as_secs_f64();
		Self {
			mean,
			std_dev: mean / 10.0,
			rng: Mutex::new(rng),
		}
	}

	/// Returns the average delay.
	pub fn average(&self) -> Duration { Duration::from_secs_f64(self.mean) }
}

impl LatencyGenerator for NormalLatency {
	fn next_latency(&self) -> Duration {
		let z: f64 = self.rng
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.sample(StandardNormal);
		Duration::from_secs_f64((self.mean + self.std_dev * z).max(0.0))
	}
}

#[cfg(test)]
mod test {
	use std::time::Duration;
	use super::{LatencyGenerator, NormalLatency};

	#[test]
	fn seeded_draws_repeat() {
		let average = Duration::from_millis(100);
		let a = NormalLatency::with_seed(average, 42);
		let b = NormalLatency::with_seed(average, 42);
		for _ in 0..16 {
			assert_eq!(a.next_latency(), b.next_latency());
		}
	}

	#[test]
	fn draws_near_average() {
		let average = Duration::from_millis(100);
		let generator = NormalLatency::with_seed(average, 7);
		for _ in 0..256 {
			let latency = generator.next_latency();
			assert!(latency > Duration::from_millis(40), "{latency:?}");
			assert!(latency < Duration::from_millis(160), "{latency:?}");
		}
	}

	#[test]
	fn zero_average() {
		let generator = NormalLatency::new(Duration::ZERO);
		assert_eq!(generator.next_latency(), Duration::ZERO);
		assert_eq!(Duration::from_millis(5).next_latency(), Duration::from_millis(5));
	}
}
