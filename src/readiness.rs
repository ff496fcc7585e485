//! Bounded wait-for-predicate polling
//!
//! The daemon supervisor needs "poll until healthy or give up"; the loop is
//! kept generic over the probe so any readiness check can reuse it.

use std::thread;
use std::time::Duration;

/// Polls `probe` up to `max_attempts` times, sleeping `interval` after each
/// failed attempt. Returns true on the first successful probe, false once
/// the attempt budget is exhausted. Worst-case wall time is therefore
/// `max_attempts * interval` plus probe cost.
pub fn wait_for<F>(mut probe: F, interval: Duration, max_attempts: u32) -> bool
where
	F: FnMut() -> bool,
{
	for _ in 0..max_attempts {
		if probe() {
			return true;
		}
		thread::sleep(interval);
	}
	false
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn returns_on_first_success() {
		let mut calls = 0;
		let ok = wait_for(
			|| {
				calls += 1;
				true
			},
			Duration::ZERO,
			300,
		);
		assert!(ok);
		assert_eq!(calls, 1);
	}

	#[test]
	fn exhausts_exactly_max_attempts() {
		let mut calls = 0;
		let ok = wait_for(
			|| {
				calls += 1;
				false
			},
			Duration::ZERO,
			7,
		);
		assert!(!ok);
		assert_eq!(calls, 7);
	}

	#[test]
	fn succeeds_partway_through() {
		let mut calls = 0;
		let ok = wait_for(
			|| {
				calls += 1;
				calls == 3
			},
			Duration::ZERO,
			10,
		);
		assert!(ok);
		assert_eq!(calls, 3);
	}
}
