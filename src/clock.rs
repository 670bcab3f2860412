// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Time sources. All timestamps are durations since the clock's origin.

use std::time::Duration;

use parking_lot::Mutex;

pub trait Clock: Send + Sync {
    /// Monotonic time since the clock was created.
    fn now(&self) -> Duration;
}

/// Wall clock time.
pub struct SystemClock {
    #[cfg(not(feature = "quanta"))]
    origin: std::time::Instant,
    #[cfg(feature = "quanta")]
    clock: quanta::Clock,
    #[cfg(feature = "quanta")]
    origin: quanta::Instant,
}

impl SystemClock {
    #[cfg(not(feature = "quanta"))]
    pub fn new() -> SystemClock {
        SystemClock {
            origin: std::time::Instant::now(),
        }
    }

    #[cfg(feature = "quanta")]
    pub fn new() -> SystemClock {
        let clock = quanta::Clock::new();
        let origin = clock.now();
        SystemClock { clock, origin }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[cfg(not(feature = "quanta"))]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    #[cfg(feature = "quanta")]
    fn now(&self) -> Duration {
        self.clock.now().duration_since(self.origin)
    }
}

/// A clock that only moves when told to. Lets simulations and tests step through time
/// deterministically.
#[derive(Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> ManualClock {
        ManualClock::default()
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }

    /// Jumps the clock to an absolute time. Going backwards is ignored.
    pub fn set(&self, to: Duration) {
        let mut now = self.now.lock();
        if to > *now {
            *now = to;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);

        clock.advance(Duration::from_millis(150));
        assert_eq!(clock.now(), Duration::from_millis(150));

        clock.set(Duration::from_millis(100));
        assert_eq!(clock.now(), Duration::from_millis(150));

        clock.set(Duration::from_secs(2));
        assert_eq!(clock.now(), Duration::from_secs(2));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        std::thread::sleep(Duration::from_millis(2));
        assert!(clock.now() > first);
    }
}
