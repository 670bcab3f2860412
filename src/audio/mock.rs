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
use std::{fmt, sync::Arc, time::Duration};

use tracing::{span, trace, Level};

use crate::{clip::Clip, clock::Clock};

/// A mock backend. Doesn't actually play anything, it tracks playback position against a clock.
#[derive(Clone)]
pub struct Backend {
    clock: Arc<dyn Clock>,
}

impl Backend {
    pub fn new(clock: Arc<dyn Clock>) -> Backend {
        Backend { clock }
    }
}

impl crate::audio::Backend for Backend {
    fn create_resource(&self, channel_name: &str) -> Box<dyn crate::audio::PlaybackResource> {
        Box::new(Resource::new(channel_name, self.clock.clone()))
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mock")
    }
}

/// A simulated playback resource.
pub struct Resource {
    name: String,
    clock: Arc<dyn Clock>,
    clip: Option<Clip>,
    volume: f32,
    looping: bool,
    /// When playback was last started, if it hasn't been stopped since.
    started_at: Option<Duration>,
    /// When the current pause began.
    paused_at: Option<Duration>,
    /// Total time spent paused since the last start.
    paused_for: Duration,
}

impl Resource {
    pub fn new(name: &str, clock: Arc<dyn Clock>) -> Resource {
        Resource {
            name: name.to_string(),
            clock,
            clip: None,
            volume: 1.0,
            looping: false,
            started_at: None,
            paused_at: None,
            paused_for: Duration::ZERO,
        }
    }

    /// The last volume set on this resource.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// How much of the clip has actually been heard since it was started.
    pub fn position(&self) -> Duration {
        let Some(started_at) = self.started_at else {
            return Duration::ZERO;
        };
        let now = self.clock.now();
        let paused = self.paused_for
            + self
                .paused_at
                .map_or(Duration::ZERO, |paused_at| now.saturating_sub(paused_at));
        now.saturating_sub(started_at).saturating_sub(paused)
    }
}

impl crate::audio::PlaybackResource for Resource {
    fn set_clip(&mut self, clip: Option<Clip>) {
        // Swapping the clip out from under a playing resource stops it.
        self.started_at = None;
        self.paused_at = None;
        self.clip = clip;
    }

    fn play(&mut self) {
        let Some(clip) = &self.clip else {
            return;
        };

        let span = span!(Level::TRACE, "play clip (mock)");
        let _enter = span.enter();
        trace!(
            resource = self.name,
            clip = clip.name(),
            duration = format!("{:?}", clip.duration()),
            looping = self.looping,
            "Playing clip."
        );

        self.started_at = Some(self.clock.now());
        self.paused_at = None;
        self.paused_for = Duration::ZERO;
    }

    fn stop(&mut self) {
        self.started_at = None;
        self.paused_at = None;
    }

    fn pause(&mut self) {
        if self.started_at.is_some() && self.paused_at.is_none() {
            self.paused_at = Some(self.clock.now());
        }
    }

    fn unpause(&mut self) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_for += self.clock.now().saturating_sub(paused_at);
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn is_playing(&self) -> bool {
        match (&self.clip, self.started_at) {
            (Some(clip), Some(_)) => self.looping || self.position() < clip.duration(),
            _ => false,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}
