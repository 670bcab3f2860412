// Copyright (C) 2024 Michael Wilson <mike@mdwn.dev>
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
use std::time::Duration;

use duration_string::DurationString;

mod error;
mod sound;

pub use error::ConfigError;
pub use sound::{ClipConfig, SoundConfig};

/// Parses a human readable duration such as "200ms" or "1m30s".
pub(crate) fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    DurationString::from_string(value.to_string())
        .map(|duration| duration.into())
        .map_err(|e| ConfigError::Duration {
            value: value.to_string(),
            reason: e.to_string(),
        })
}
