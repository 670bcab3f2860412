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

//! Running a sound manager on a multi-threaded host.
//!
//! All calls are serialized through one lock so that callers on any thread observe the same
//! ordering as the single-threaded manager. A ticker task stands in for the host's frame loop.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::clip::Clip;
use crate::error::SoundError;
use crate::manager::{PlayOptions, SoundControl, SoundManager};

/// A sound manager behind a single lock.
#[derive(Clone)]
pub struct SharedSoundManager {
    inner: Arc<Mutex<SoundManager>>,
}

impl SharedSoundManager {
    pub fn new(manager: SoundManager) -> SharedSoundManager {
        SharedSoundManager {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    /// Locks the manager for direct access.
    pub fn lock(&self) -> MutexGuard<'_, SoundManager> {
        self.inner.lock()
    }

    pub fn tick(&self) {
        self.inner.lock().tick();
    }
}

impl SoundControl for SharedSoundManager {
    fn play(&mut self, clip: &Clip, options: PlayOptions) -> Result<(), SoundError> {
        self.inner.lock().play(clip, options)
    }

    fn stop(&mut self, clip: &Clip) {
        self.inner.lock().stop(clip)
    }

    fn stop_all(&mut self) {
        self.inner.lock().stop_all()
    }

    fn pause_all(&mut self, paused: bool) {
        self.inner.lock().pause_all(paused)
    }
}

/// Ticks a shared manager at a fixed rate until stopped or dropped.
pub struct Ticker {
    join: JoinHandle<()>,
}

impl Ticker {
    /// Spawns the ticker on the current tokio runtime.
    pub fn spawn(manager: SharedSoundManager, period: Duration) -> Ticker {
        info!(period = format!("{:?}", period), "Starting ticker");
        let join = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                manager.tick();
            }
        });
        Ticker { join }
    }

    pub fn stop(self) {
        self.join.abort();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        debug!("Stopping ticker");
        self.join.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::audio::mock;
    use crate::clock::ManualClock;
    use crate::manager::Settings;
    use crate::testutil::eventually_async;

    fn shared() -> (Arc<ManualClock>, SharedSoundManager) {
        let clock = Arc::new(ManualClock::new());
        let manager = SoundManager::new(
            Box::new(mock::Backend::new(clock.clone())),
            clock.clone(),
            Settings::default(),
        );
        (clock, SharedSoundManager::new(manager))
    }

    #[tokio::test]
    async fn test_ticker_completes_watches() {
        let (clock, mut shared) = shared();
        let events = shared.lock().subscribe();
        let clip = Clip::new("blip", Duration::from_millis(100));

        shared.play(&clip, PlayOptions::new()).unwrap();
        let ticker = Ticker::spawn(shared.clone(), Duration::from_millis(1));

        clock.advance(Duration::from_millis(100));
        eventually_async(
            || {
                let shared = shared.clone();
                async move { shared.lock().pending_watches() == 0 }
            },
            "End watch never completed",
        )
        .await;
        ticker.stop();

        let events: Vec<_> = events.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(events[1].is_ended());
    }

    #[tokio::test]
    async fn test_stopped_ticker_no_longer_ticks() {
        let (clock, mut shared) = shared();
        let clip = Clip::new("blip", Duration::from_millis(100));

        let ticker = Ticker::spawn(shared.clone(), Duration::from_millis(1));
        ticker.stop();

        shared.play(&clip, PlayOptions::new()).unwrap();
        clock.advance(Duration::from_millis(100));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(shared.lock().pending_watches(), 1);

        shared.tick();
        assert_eq!(shared.lock().pending_watches(), 0);
    }

    #[test]
    fn test_shared_control_from_threads() {
        let (_clock, shared) = shared();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let mut shared = shared.clone();
                std::thread::spawn(move || {
                    let clip = Clip::new(&format!("clip-{}", i), Duration::from_secs(1));
                    shared.play(&clip, PlayOptions::new()).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let manager = shared.lock();
        assert_eq!(manager.channel_count(), 4);
        assert_eq!(manager.active_count(), 4);
    }
}
