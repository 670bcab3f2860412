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
use crate::clip::Clip;

pub mod mock;

/// One hardware playback slot. Each channel owns exactly one resource for its whole lifetime.
pub trait PlaybackResource: Send {
    /// Loads the clip to play next, or unloads the current one.
    fn set_clip(&mut self, clip: Option<Clip>);

    /// Starts the loaded clip from the beginning.
    fn play(&mut self);

    fn stop(&mut self);

    fn pause(&mut self);

    fn unpause(&mut self);

    fn set_volume(&mut self, volume: f32);

    fn set_loop(&mut self, looping: bool);

    /// True while a loaded clip has been started and has neither finished nor been stopped.
    /// A paused resource still counts as playing.
    fn is_playing(&self) -> bool;
}

/// Creates playback resources for new channels.
pub trait Backend: Send {
    fn create_resource(&self, channel_name: &str) -> Box<dyn PlaybackResource>;
}
