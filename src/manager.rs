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

//! The sound manager multiplexes play requests onto the channel pool.
//!
//! Everything here runs on one logical thread. `play`, `stop`, `stop_all` and `pause_all`
//! complete immediately; the only work that spans time is the end watch attached to every
//! playing channel, which is resumed once per `tick`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use tracing::{debug, info};

use crate::audio::Backend;
use crate::channel::{Channel, ChannelPool};
use crate::clip::{Clip, ClipLibrary};
use crate::clock::Clock;
use crate::error::SoundError;
use crate::events::{EventBus, SoundEvent};
use crate::guard::ReplayGuard;
use crate::mixer;
use crate::priority::Priority;
use crate::scheduler::Scheduler;


/// Tunables for a sound manager.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Volume of sounds that are not being ducked, in (0, 1].
    pub default_volume: f32,
    /// Minimum time between two plays of the same clip.
    pub play_interval: Duration,
    /// Replay history older than this is dropped on tick. None keeps it forever.
    pub history_max_age: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            default_volume: 1.0,
            play_interval: Duration::from_millis(200),
            history_max_age: None,
        }
    }
}

/// How a clip should be played.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayOptions {
    looping: bool,
    priority: Priority,
    volume: Option<f32>,
}

impl PlayOptions {
    pub fn new() -> PlayOptions {
        PlayOptions::default()
    }

    /// Loop the clip until it is stopped.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Plays at this volume instead of the default. Must be in (0, 1].
    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume);
        self
    }
}

/// The operations callers use to drive sound playback.
pub trait SoundControl {
    /// Plays a clip unless it was played within the replay interval.
    fn play(&mut self, clip: &Clip, options: PlayOptions) -> Result<(), SoundError>;

    /// Stops every channel playing the clip.
    fn stop(&mut self, clip: &Clip);

    /// Stops every playing channel.
    fn stop_all(&mut self);

    /// Pauses or resumes every channel.
    fn pause_all(&mut self, paused: bool);
}

/// State carried by a channel's end watch.
#[derive(Debug)]
struct EndWatch {
    channel: usize,
    started_at: Duration,
    clip_duration: Duration,
}

impl EndWatch {
    /// A watch keeps waiting while its channel is paused, while the resource says it is
    /// playing, or until at least the clip's duration has passed.
    fn pending(&self, channel: &Channel, now: Duration) -> bool {
        channel.is_paused()
            || channel.is_playing()
            || now.saturating_sub(self.started_at) < self.clip_duration
    }
}

pub struct SoundManager {
    clock: Arc<dyn Clock>,
    settings: Settings,
    pool: ChannelPool,
    guard: ReplayGuard,
    watches: Scheduler<EndWatch>,
    events: EventBus,
    highest: Priority,
}

impl SoundManager {
    pub fn new(backend: Box<dyn Backend>, clock: Arc<dyn Clock>, settings: Settings) -> Self {
        info!(
            default_volume = settings.default_volume,
            play_interval = format!("{:?}", settings.play_interval),
            "Creating sound manager"
        );
        SoundManager {
            clock,
            pool: ChannelPool::new(backend, settings.default_volume),
            guard: ReplayGuard::new(settings.play_interval),
            watches: Scheduler::new(),
            events: EventBus::new(),
            highest: Priority::Low,
            settings,
        }
    }

    /// Subscribes to started and ended notifications.
    pub fn subscribe(&mut self) -> Receiver<SoundEvent> {
        self.events.subscribe()
    }

    /// Plays a clip from the library by name.
    pub fn play_named(
        &mut self,
        library: &ClipLibrary,
        name: &str,
        options: PlayOptions,
    ) -> Result<(), SoundError> {
        let clip = library
            .get(name)
            .ok_or_else(|| SoundError::InvalidClip(name.to_string()))?
            .clone();
        self.play(&clip, options)
    }

    /// Plays a clip. A clip played again within the replay interval is silently ignored.
    pub fn play(&mut self, clip: &Clip, options: PlayOptions) -> Result<(), SoundError> {
        let volume = match options.volume {
            Some(volume) if volume > 0.0 && volume <= 1.0 => volume,
            Some(volume) => return Err(SoundError::InvalidVolume(volume)),
            None => self.settings.default_volume,
        };

        let now = self.clock.now();
        if !self.guard.permits(clip, now) {
            debug!(clip = clip.name(), "Clip played too recently, ignoring");
            return Ok(());
        }

        let index = self.acquire_channel();
        let Some(channel) = self.pool.get_mut(index) else {
            return Ok(());
        };
        channel.start(clip.clone(), options.looping, options.priority, volume);
        let channel_name = channel.name().to_string();

        // Only a change in the highest priority can change anyone else's volume.
        match options.priority.cmp(&self.highest) {
            Ordering::Greater | Ordering::Less => self.rebalance(),
            Ordering::Equal => {
                if let Some(channel) = self.pool.get_mut(index) {
                    channel.apply_volume(volume);
                }
            }
        }

        debug!(
            clip = clip.name(),
            channel = channel_name,
            priority = %options.priority,
            looping = options.looping,
            "Playing clip"
        );
        self.events.publish(SoundEvent::Started {
            clip: clip.clone(),
            channel: channel_name,
        });

        let watch = self.watches.spawn(EndWatch {
            channel: index,
            started_at: now,
            clip_duration: clip.duration(),
        });
        if let Some(channel) = self.pool.get_mut(index) {
            channel.attach_watch(watch);
        }

        self.guard.record(clip, now);
        Ok(())
    }

    /// Stops every active channel playing the clip. Each fires its ended notification before
    /// this returns.
    pub fn stop(&mut self, clip: &Clip) {
        let indices: Vec<usize> = self
            .pool
            .channels()
            .iter()
            .filter(|channel| channel.is_active() && channel.clip() == Some(clip))
            .map(Channel::index)
            .collect();
        self.stop_channels(&indices);
    }

    /// Stops every active channel.
    pub fn stop_all(&mut self) {
        let indices: Vec<usize> = self
            .pool
            .channels()
            .iter()
            .filter(|channel| channel.is_active())
            .map(Channel::index)
            .collect();
        self.stop_channels(&indices);
    }

    /// Pauses or resumes every channel. A paused channel never finishes.
    pub fn pause_all(&mut self, paused: bool) {
        debug!(paused, channels = self.pool.len(), "Pausing all channels");
        for channel in self.pool.channels_mut() {
            channel.set_paused(paused);
        }
    }

    /// Resumes every end watch once. Call once per frame.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        let pool = &self.pool;
        let finished = self.watches.poll(|watch| {
            pool.get(watch.channel)
                .is_some_and(|channel| watch.pending(channel, now))
        });

        for watch in finished {
            self.finish_channel(watch.channel);
        }

        if let Some(max_age) = self.settings.history_max_age {
            let pruned = self.guard.prune(now, max_age);
            if pruned > 0 {
                debug!(pruned, "Pruned replay history");
            }
        }
    }

    /// The highest priority among playing channels, or low if nothing is playing.
    pub fn current_highest_priority(&self) -> Priority {
        self.highest
    }

    /// Every channel created so far, in creation order.
    pub fn channels(&self) -> &[Channel] {
        self.pool.channels()
    }

    pub fn channel_count(&self) -> usize {
        self.pool.len()
    }

    /// The number of channels currently playing a clip.
    pub fn active_count(&self) -> usize {
        self.pool
            .channels()
            .iter()
            .filter(|channel| channel.is_active())
            .count()
    }

    /// The number of end watches still waiting.
    pub fn pending_watches(&self) -> usize {
        self.watches.len()
    }

    /// The number of clips in the replay history.
    pub fn history_len(&self) -> usize {
        self.guard.len()
    }

    /// Finds a free channel and resets it for reuse. If the channel's previous clip ran out
    /// but its end watch hasn't been resumed yet, the watch is completed first so the previous
    /// clip still gets exactly one ended notification.
    fn acquire_channel(&mut self) -> usize {
        let index = self.pool.acquire();
        let Some(channel) = self.pool.get_mut(index) else {
            return index;
        };

        if channel.cancel_watch() {
            if let Some(clip) = channel.clip().cloned() {
                debug!(
                    clip = clip.name(),
                    channel = channel.name(),
                    "Completing stale end watch"
                );
                let channel_name = channel.name().to_string();
                self.events.publish(SoundEvent::Ended {
                    clip,
                    channel: channel_name,
                });
            }
        }

        if let Some(channel) = self.pool.get_mut(index) {
            channel.reset(self.settings.default_volume);
        }
        index
    }

    fn stop_channels(&mut self, indices: &[usize]) {
        if indices.is_empty() {
            return;
        }

        for &index in indices {
            let Some(channel) = self.pool.get_mut(index) else {
                continue;
            };
            let channel_name = channel.name().to_string();
            if let Some(clip) = channel.halt() {
                debug!(clip = clip.name(), channel = channel_name, "Stopped clip");
                self.events.publish(SoundEvent::Ended {
                    clip,
                    channel: channel_name,
                });
            }
        }

        self.rebalance();
    }

    /// Completes a channel whose end watch has finished.
    fn finish_channel(&mut self, index: usize) {
        let default_volume = self.settings.default_volume;
        let Some(channel) = self.pool.get_mut(index) else {
            return;
        };

        if let Some(clip) = channel.clip().cloned() {
            debug!(clip = clip.name(), channel = channel.name(), "Clip ended");
            let channel_name = channel.name().to_string();
            self.events.publish(SoundEvent::Ended {
                clip,
                channel: channel_name,
            });
        }

        if let Some(channel) = self.pool.get_mut(index) {
            channel.reset(default_volume);
        }
        self.rebalance();
    }

    fn rebalance(&mut self) {
        self.highest = mixer::rebalance(self.pool.channels_mut());
    }
}

impl SoundControl for SoundManager {
    fn play(&mut self, clip: &Clip, options: PlayOptions) -> Result<(), SoundError> {
        SoundManager::play(self, clip, options)
    }

    fn stop(&mut self, clip: &Clip) {
        SoundManager::stop(self, clip)
    }

    fn stop_all(&mut self) {
        SoundManager::stop_all(self)
    }

    fn pause_all(&mut self, paused: bool) {
        SoundManager::pause_all(self, paused)
    }
}

impl fmt::Debug for SoundManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoundManager")
            .field("channels", &self.pool.len())
            .field("active", &self.active_count())
            .field("pending_watches", &self.watches.len())
            .field("highest", &self.highest)
            .finish()
    }
}
