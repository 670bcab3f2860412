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

//! Playback channels and the pool that owns them.
//!
//! Channels are created on demand and never destroyed. A channel is free whenever its
//! playback resource reports that it is not playing, and free channels are always reused
//! before a new one is created.

use std::fmt;

use tracing::info;

use crate::audio::{Backend, PlaybackResource};
use crate::clip::Clip;
use crate::playsync::CancelHandle;
use crate::priority::Priority;

/// One playback slot and the state of whatever it is currently playing.
pub struct Channel {
    /// Position in the pool, which is also creation order.
    index: usize,
    /// Stable name, e.g. "channel-1".
    name: String,
    resource: Box<dyn PlaybackResource>,
    /// The clip this channel was last asked to play.
    clip: Option<Clip>,
    priority: Priority,
    /// The volume this sound plays at when nothing more important is playing.
    base_volume: f32,
    /// The volume last applied to the resource.
    volume: f32,
    looping: bool,
    paused: bool,
    /// Cancels the end watch for the current clip.
    watch: Option<CancelHandle>,
}

impl Channel {
    fn new(
        index: usize,
        name: String,
        resource: Box<dyn PlaybackResource>,
        default_volume: f32,
    ) -> Channel {
        let mut channel = Channel {
            index,
            name,
            resource,
            clip: None,
            priority: Priority::Low,
            base_volume: default_volume,
            volume: default_volume,
            looping: false,
            paused: false,
            watch: None,
        };
        channel.resource.set_loop(false);
        channel.resource.set_volume(default_volume);
        channel
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clip(&self) -> Option<&Clip> {
        self.clip.as_ref()
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn base_volume(&self) -> f32 {
        self.base_volume
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// True if the channel has an end watch that hasn't completed or been cancelled.
    pub fn has_watch(&self) -> bool {
        self.watch.is_some()
    }

    /// True if the playback resource reports that it is playing.
    pub fn is_playing(&self) -> bool {
        self.resource.is_playing()
    }

    /// True if the channel has a clip and is playing it. Only active channels take part in
    /// priority ducking or can be stopped.
    pub fn is_active(&self) -> bool {
        self.clip.is_some() && self.resource.is_playing()
    }

    /// True if the channel can be handed out for a new sound.
    pub fn is_free(&self) -> bool {
        !self.resource.is_playing()
    }

    /// Loads the clip and starts playback. Volume is left to the caller.
    pub(crate) fn start(&mut self, clip: Clip, looping: bool, priority: Priority, volume: f32) {
        self.looping = looping;
        self.priority = priority;
        self.base_volume = volume;
        self.resource.set_loop(looping);
        self.resource.set_clip(Some(clip.clone()));
        self.clip = Some(clip);
        self.resource.play();
    }

    pub(crate) fn apply_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.resource.set_volume(volume);
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if paused {
            self.resource.pause();
        } else {
            self.resource.unpause();
        }
    }

    pub(crate) fn attach_watch(&mut self, watch: CancelHandle) {
        self.watch = Some(watch);
    }

    /// Detaches the end watch, cancelling it.
    pub(crate) fn cancel_watch(&mut self) -> bool {
        match self.watch.take() {
            Some(watch) => {
                watch.cancel();
                true
            }
            None => false,
        }
    }

    /// Stops playback and drops the clip reference. Priority, volume and loop settings stay
    /// until the next reset.
    pub(crate) fn halt(&mut self) -> Option<Clip> {
        self.resource.stop();
        self.cancel_watch();
        self.resource.set_clip(None);
        self.clip.take()
    }

    /// Returns the channel to its freshly created state.
    pub(crate) fn reset(&mut self, default_volume: f32) {
        self.cancel_watch();
        self.priority = Priority::Low;
        self.base_volume = default_volume;
        self.apply_volume(default_volume);
        self.resource.set_clip(None);
        self.clip = None;
        self.looping = false;
        self.resource.set_loop(false);
        if self.paused {
            self.paused = false;
            self.resource.unpause();
        }
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("clip", &self.clip)
            .field("priority", &self.priority)
            .field("volume", &self.volume)
            .field("looping", &self.looping)
            .field("paused", &self.paused)
            .field("watching", &self.watch.is_some())
            .finish()
    }
}

/// Owns every channel ever created, in creation order.
pub struct ChannelPool {
    backend: Box<dyn Backend>,
    channels: Vec<Channel>,
    default_volume: f32,
}

impl ChannelPool {
    pub fn new(backend: Box<dyn Backend>, default_volume: f32) -> ChannelPool {
        ChannelPool {
            backend,
            channels: Vec::new(),
            default_volume,
        }
    }

    /// Returns the index of the first free channel, creating a new one if every channel is
    /// busy. The returned channel still carries whatever state its last sound left behind.
    pub fn acquire(&mut self) -> usize {
        if let Some(channel) = self.channels.iter().find(|channel| channel.is_free()) {
            return channel.index;
        }

        let index = self.channels.len();
        let name = format!("channel-{}", index + 1);
        let resource = self.backend.create_resource(&name);
        info!(channel = name, pool_size = index + 1, "Created channel");
        self.channels
            .push(Channel::new(index, name, resource, self.default_volume));
        index
    }

    pub fn get(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Channel> {
        self.channels.get_mut(index)
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channels_mut(&mut self) -> &mut [Channel] {
        &mut self.channels
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl fmt::Debug for ChannelPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelPool")
            .field("channels", &self.channels.len())
            .field("default_volume", &self.default_volume)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::audio::mock;
    use crate::clock::ManualClock;

    fn pool() -> (Arc<ManualClock>, ChannelPool) {
        let clock = Arc::new(ManualClock::new());
        let backend = mock::Backend::new(clock.clone());
        (clock, ChannelPool::new(Box::new(backend), 1.0))
    }

    #[test]
    fn test_acquire_creates_on_demand() {
        let (_clock, mut pool) = pool();
        assert!(pool.is_empty());

        let first = pool.acquire();
        assert_eq!(first, 0);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.channels()[0].name(), "channel-1");

        // Nothing is playing yet, so the same channel comes back.
        assert_eq!(pool.acquire(), 0);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_acquire_skips_busy_channels() {
        let (clock, mut pool) = pool();
        let clip = Clip::new("blip", Duration::from_millis(100));

        let first = pool.acquire();
        pool.get_mut(first)
            .unwrap()
            .start(clip.clone(), false, Priority::Low, 1.0);

        let second = pool.acquire();
        assert_eq!(second, 1);
        pool.get_mut(second)
            .unwrap()
            .start(clip.clone(), false, Priority::Low, 1.0);
        assert_eq!(pool.channels()[1].name(), "channel-2");

        // Both finish; the first free channel in creation order wins.
        clock.advance(Duration::from_millis(100));
        assert_eq!(pool.acquire(), 0);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_paused_channel_is_not_free() {
        let (clock, mut pool) = pool();
        let index = pool.acquire();
        let channel = pool.get_mut(index).unwrap();
        channel.start(
            Clip::new("blip", Duration::from_millis(100)),
            false,
            Priority::Low,
            1.0,
        );
        channel.set_paused(true);

        clock.advance(Duration::from_secs(1));
        assert!(!pool.channels()[0].is_free());
        assert_eq!(pool.acquire(), 1);
    }

    #[test]
    fn test_halt_keeps_settings_reset_clears_them() {
        let (_clock, mut pool) = pool();
        let index = pool.acquire();
        let clip = Clip::new("alarm", Duration::from_secs(1));
        let watch = CancelHandle::new();

        let channel = pool.get_mut(index).unwrap();
        channel.start(clip.clone(), true, Priority::High, 0.8);
        channel.apply_volume(0.8);
        channel.attach_watch(watch.clone());
        assert!(channel.is_active());

        assert_eq!(channel.halt(), Some(clip));
        assert!(watch.is_cancelled());
        assert!(!channel.is_active());
        assert!(!channel.has_watch());
        assert_eq!(channel.priority(), Priority::High);
        assert_eq!(channel.volume(), 0.8);
        assert!(channel.is_looping());

        channel.set_paused(true);
        channel.reset(1.0);
        assert_eq!(channel.priority(), Priority::Low);
        assert_eq!(channel.volume(), 1.0);
        assert_eq!(channel.base_volume(), 1.0);
        assert!(!channel.is_looping());
        assert!(!channel.is_paused());
        assert!(channel.clip().is_none());
    }
}
