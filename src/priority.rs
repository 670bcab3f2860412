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
use std::fmt;
use std::str::FromStr;

use crate::error::SoundError;

/// Sound priority. The discriminant is also the volume percentage a sound of this priority is
/// ducked to while something more important is playing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Priority {
    #[default]
    Low = 25,
    Med = 50,
    High = 100,
}

impl Priority {
    /// The volume percentage for this priority.
    pub fn percent(self) -> u8 {
        self as u8
    }

    /// The volume multiplier applied when this priority is ducked.
    pub fn volume_scale(self) -> f32 {
        f32::from(self.percent()) / 100.0
    }
}

impl TryFrom<u8> for Priority {
    type Error = SoundError;

    /// Accepts the percentages (25, 50, 100) or the ordinal index (0, 1, 2) used by UI wiring.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 | 25 => Ok(Priority::Low),
            1 | 50 => Ok(Priority::Med),
            2 | 100 => Ok(Priority::High),
            other => Err(SoundError::InvalidPriority(other)),
        }
    }
}

impl FromStr for Priority {
    type Err = SoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "med" | "medium" => Ok(Priority::Med),
            "high" => Ok(Priority::High),
            _ => Err(SoundError::InvalidPriorityName(s.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::Low => "low",
            Priority::Med => "med",
            Priority::High => "high",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Priority::High > Priority::Med);
        assert!(Priority::Med > Priority::Low);
        assert_eq!(Priority::default(), Priority::Low);
        assert_eq!(
            [Priority::Med, Priority::High, Priority::Low]
                .into_iter()
                .max(),
            Some(Priority::High)
        );
    }

    #[test]
    fn test_volume_scale() {
        assert_eq!(Priority::Low.volume_scale(), 0.25);
        assert_eq!(Priority::Med.volume_scale(), 0.5);
        assert_eq!(Priority::High.volume_scale(), 1.0);
    }

    #[test]
    fn test_try_from() {
        assert_eq!(Priority::try_from(0u8), Ok(Priority::Low));
        assert_eq!(Priority::try_from(1u8), Ok(Priority::Med));
        assert_eq!(Priority::try_from(2u8), Ok(Priority::High));
        assert_eq!(Priority::try_from(50u8), Ok(Priority::Med));
        assert_eq!(Priority::try_from(100u8), Ok(Priority::High));
        assert_eq!(
            Priority::try_from(3u8),
            Err(SoundError::InvalidPriority(3))
        );
        assert_eq!(
            Priority::try_from(75u8),
            Err(SoundError::InvalidPriority(75))
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert_eq!("medium".parse::<Priority>(), Ok(Priority::Med));
        assert_eq!("low".parse::<Priority>(), Ok(Priority::Low));
        assert!("urgent".parse::<Priority>().is_err());
    }
}
