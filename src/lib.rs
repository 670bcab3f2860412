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

//! A fixed-pool sound channel manager.
//!
//! Any number of play requests are multiplexed onto a small, growing set of playback
//! channels. Louder, more important sounds duck quieter ones, rapid retriggers of the same
//! clip are suppressed, and subscribers are told when each sound starts and ends.

pub mod audio;
pub mod channel;
pub mod clip;
pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod guard;
pub mod manager;
pub mod mixer;
pub mod playsync;
pub mod priority;
pub mod scheduler;
#[cfg(test)]
mod testutil;

pub use clip::{Clip, ClipLibrary};
pub use error::SoundError;
pub use events::SoundEvent;
pub use manager::{PlayOptions, Settings, SoundControl, SoundManager};
pub use priority::Priority;
