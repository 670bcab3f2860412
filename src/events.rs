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

//! Sound lifecycle notifications.
//!
//! Every subscriber gets its own unbounded channel. Events are queued on every subscriber
//! before `publish` returns, so the order subscribers see matches the order the manager
//! fired them in.

use std::fmt;

use crossbeam_channel::{Receiver, Sender};

use crate::clip::Clip;

#[derive(Clone, Debug, PartialEq)]
pub enum SoundEvent {
    /// A clip started playing on a channel.
    Started { clip: Clip, channel: String },
    /// A clip finished or was stopped.
    Ended { clip: Clip, channel: String },
}

impl SoundEvent {
    pub fn clip(&self) -> &Clip {
        match self {
            SoundEvent::Started { clip, .. } | SoundEvent::Ended { clip, .. } => clip,
        }
    }

    pub fn channel(&self) -> &str {
        match self {
            SoundEvent::Started { channel, .. } | SoundEvent::Ended { channel, .. } => channel,
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self, SoundEvent::Started { .. })
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, SoundEvent::Ended { .. })
    }
}

impl fmt::Display for SoundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoundEvent::Started { clip, channel } => write!(f, "started {} on {}", clip, channel),
            SoundEvent::Ended { clip, channel } => write!(f, "ended {} on {}", clip, channel),
        }
    }
}

/// Fans events out to any number of subscribers.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Sender<SoundEvent>>,
}

impl EventBus {
    pub fn new() -> EventBus {
        EventBus::default()
    }

    /// Adds a subscriber. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<SoundEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Sends the event to every live subscriber, forgetting any whose receiver is gone.
    pub fn publish(&mut self, event: SoundEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// The number of subscribers as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
