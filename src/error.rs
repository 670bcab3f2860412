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

/// Errors raised at the boundary of the sound manager. Nothing past the boundary fails: the
/// channel pool grows instead of running out, and redundant stop/pause calls are no-ops.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SoundError {
    #[error("no clip named {0:?}")]
    InvalidClip(String),

    #[error("invalid priority value {0}")]
    InvalidPriority(u8),

    #[error("invalid priority name {0:?}")]
    InvalidPriorityName(String),

    #[error("volume must be in (0, 1], got {0}")]
    InvalidVolume(f32),
}
