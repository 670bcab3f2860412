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
use std::collections::HashMap;
use std::time::Duration;

use crate::clip::Clip;

/// Remembers when each clip was last played so that a clip can't be retriggered within the
/// cooldown interval.
#[derive(Debug)]
pub struct ReplayGuard {
    interval: Duration,
    last_played: HashMap<Clip, Duration>,
}

impl ReplayGuard {
    pub fn new(interval: Duration) -> ReplayGuard {
        ReplayGuard {
            interval,
            last_played: HashMap::new(),
        }
    }

    /// True if the clip has never been played or its cooldown has elapsed.
    pub fn permits(&self, clip: &Clip, now: Duration) -> bool {
        match self.last_played.get(clip) {
            Some(last) => now.saturating_sub(*last) >= self.interval,
            None => true,
        }
    }

    pub fn record(&mut self, clip: &Clip, now: Duration) {
        self.last_played.insert(clip.clone(), now);
    }

    /// Forgets clips that haven't been played in `max_age`. Returns how many were dropped.
    ///
    /// A clip still inside its cooldown is always kept, even if `max_age` is shorter than the
    /// interval.
    pub fn prune(&mut self, now: Duration, max_age: Duration) -> usize {
        let max_age = max_age.max(self.interval);
        let before = self.last_played.len();
        self.last_played
            .retain(|_, last| now.saturating_sub(*last) < max_age);
        before - self.last_played.len()
    }

    /// The number of clips being remembered.
    pub fn len(&self) -> usize {
        self.last_played.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_played.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(200);

    #[test]
    fn test_first_play_always_permitted() {
        let guard = ReplayGuard::new(INTERVAL);
        let clip = Clip::new("blip", Duration::from_millis(50));

        // Time zero is a real timestamp, not a "never played" marker.
        assert!(guard.permits(&clip, Duration::ZERO));
        assert!(guard.is_empty());
    }

    #[test]
    fn test_cooldown() {
        let mut guard = ReplayGuard::new(INTERVAL);
        let clip = Clip::new("blip", Duration::from_millis(50));
        let other = Clip::new("blip", Duration::from_millis(50));

        guard.record(&clip, Duration::ZERO);
        assert!(!guard.permits(&clip, Duration::ZERO));
        assert!(!guard.permits(&clip, Duration::from_millis(199)));
        assert!(guard.permits(&clip, Duration::from_millis(200)));
        assert!(guard.permits(&other, Duration::from_millis(1)));

        guard.record(&clip, Duration::from_millis(300));
        assert!(!guard.permits(&clip, Duration::from_millis(400)));
        assert_eq!(guard.len(), 1);
    }

    #[test]
    fn test_prune() {
        let mut guard = ReplayGuard::new(INTERVAL);
        let old = Clip::new("old", Duration::from_millis(50));
        let recent = Clip::new("recent", Duration::from_millis(50));

        guard.record(&old, Duration::ZERO);
        guard.record(&recent, Duration::from_secs(9));

        assert_eq!(guard.prune(Duration::from_secs(10), Duration::from_secs(5)), 1);
        assert_eq!(guard.len(), 1);
        assert!(guard.permits(&old, Duration::from_secs(10)));
        assert!(guard.permits(&recent, Duration::from_secs(10)));
    }

    #[test]
    fn test_prune_keeps_clips_in_cooldown() {
        let mut guard = ReplayGuard::new(INTERVAL);
        let clip = Clip::new("blip", Duration::from_millis(50));

        guard.record(&clip, Duration::ZERO);
        assert_eq!(
            guard.prune(Duration::from_millis(60), Duration::from_millis(50)),
            0
        );
        assert!(!guard.permits(&clip, Duration::from_millis(60)));

        assert_eq!(
            guard.prune(Duration::from_millis(200), Duration::from_millis(50)),
            1
        );
        assert!(guard.is_empty());
    }
}
