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

//! Priority ducking.
//!
//! Whenever a higher priority sound is playing, every lower priority sound is turned down to
//! its own priority's percentage of its base volume. Sounds at the highest active priority
//! play at their base volume.

use tracing::debug;

use crate::channel::Channel;
use crate::priority::Priority;

/// The volume a sound should play at given the highest priority currently playing.
pub fn ducked_volume(base_volume: f32, priority: Priority, highest: Priority) -> f32 {
    if priority < highest {
        base_volume * priority.volume_scale()
    } else {
        base_volume
    }
}

/// The highest priority among active channels, or low if nothing is playing.
pub fn highest_active(channels: &[Channel]) -> Priority {
    channels
        .iter()
        .filter(|channel| channel.is_active())
        .map(Channel::priority)
        .max()
        .unwrap_or_default()
}

/// Recomputes the volume of every active channel and returns the new highest priority.
pub fn rebalance(channels: &mut [Channel]) -> Priority {
    let highest = highest_active(channels);

    let mut ducked = 0;
    for channel in channels.iter_mut().filter(|channel| channel.is_active()) {
        let volume = ducked_volume(channel.base_volume(), channel.priority(), highest);
        if channel.priority() < highest {
            ducked += 1;
        }
        channel.apply_volume(volume);
    }

    debug!(highest = %highest, ducked, "Rebalanced channel volumes");
    highest
}
