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
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use config::{Config, File, FileFormat};
use serde::Deserialize;

use super::error::ConfigError;
use super::parse_duration;
use crate::manager::Settings;

const DEFAULT_VOLUME: f32 = 1.0;
const DEFAULT_PLAY_INTERVAL: Duration = Duration::from_millis(200);
const DEFAULT_REFRESH_RATE: u32 = 60;

/// A YAML representation of the sound manager configuration.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct SoundConfig {
    /// Volume of a sound that isn't being ducked (default: 1.0).
    default_volume: Option<f32>,

    /// Minimum time between two plays of the same clip (default: 200ms).
    play_interval: Option<String>,

    /// How many times per second end watches are checked (default: 60).
    refresh_rate: Option<u32>,

    /// Forget replay history for clips not played within this long. Unset keeps history forever.
    history_max_age: Option<String>,

    /// Clips to register in the library, by name.
    #[serde(default)]
    clips: HashMap<String, ClipConfig>,
}

/// A YAML representation of a clip.
#[derive(Deserialize, Clone, Debug)]
pub struct ClipConfig {
    duration: String,
}

impl ClipConfig {
    pub fn duration(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.duration)
    }
}

impl SoundConfig {
    /// Parse the configuration from a YAML file.
    pub fn deserialize(path: &Path) -> Result<SoundConfig, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<SoundConfig>()?)
    }

    /// Parse the configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<SoundConfig, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize::<SoundConfig>()?)
    }

    /// Returns the default volume, which must be in (0, 1].
    pub fn default_volume(&self) -> Result<f32, ConfigError> {
        let volume = self.default_volume.unwrap_or(DEFAULT_VOLUME);
        if volume > 0.0 && volume <= 1.0 {
            Ok(volume)
        } else {
            Err(ConfigError::DefaultVolume(volume))
        }
    }

    pub fn play_interval(&self) -> Result<Duration, ConfigError> {
        match &self.play_interval {
            Some(interval) => parse_duration(interval),
            None => Ok(DEFAULT_PLAY_INTERVAL),
        }
    }

    /// Returns the refresh rate in Hz. Always at least 1.
    pub fn refresh_rate(&self) -> u32 {
        self.refresh_rate.unwrap_or(DEFAULT_REFRESH_RATE).max(1)
    }

    /// The time between two ticks at the configured refresh rate.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(1) / self.refresh_rate()
    }

    pub fn history_max_age(&self) -> Result<Option<Duration>, ConfigError> {
        self.history_max_age
            .as_deref()
            .map(parse_duration)
            .transpose()
    }

    pub fn clips(&self) -> &HashMap<String, ClipConfig> {
        &self.clips
    }

    /// Returns the manager settings described by this configuration.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        Ok(Settings {
            default_volume: self.default_volume()?,
            play_interval: self.play_interval()?,
            history_max_age: self.history_max_age()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::clip::ClipLibrary;

    #[test]
    fn test_defaults() {
        let config = SoundConfig::from_yaml("clips: {}").unwrap();

        assert_eq!(config.default_volume().unwrap(), 1.0);
        assert_eq!(config.play_interval().unwrap(), Duration::from_millis(200));
        assert_eq!(config.refresh_rate(), 60);
        assert_eq!(config.history_max_age().unwrap(), None);
        assert!(config.clips().is_empty());
        assert_eq!(config.settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
            default_volume: 0.8
            play_interval: 500ms
            refresh_rate: 30
            history_max_age: 5m
            clips:
              sfx:
                duration: 250ms
              music:
                duration: 2m
        "#;
        let config = SoundConfig::from_yaml(yaml).unwrap();

        let settings = config.settings().unwrap();
        assert_eq!(settings.default_volume, 0.8);
        assert_eq!(settings.play_interval, Duration::from_millis(500));
        assert_eq!(settings.history_max_age, Some(Duration::from_secs(300)));
        assert_eq!(config.refresh_rate(), 30);
        assert_eq!(config.tick_period(), Duration::from_secs(1) / 30);

        let library = ClipLibrary::from_config(&config).unwrap();
        assert_eq!(library.names(), vec!["music", "sfx"]);
        assert_eq!(
            library.get("sfx").unwrap().duration(),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_invalid_values() {
        let config = SoundConfig::from_yaml("default_volume: 1.5").unwrap();
        assert!(matches!(
            config.default_volume(),
            Err(ConfigError::DefaultVolume(_))
        ));

        let config = SoundConfig::from_yaml("default_volume: 0.0").unwrap();
        assert!(config.settings().is_err());

        let config = SoundConfig::from_yaml("play_interval: whenever").unwrap();
        assert!(matches!(
            config.play_interval(),
            Err(ConfigError::Duration { .. })
        ));

        let config = SoundConfig::from_yaml("clips:\n  bad:\n    duration: long").unwrap();
        assert!(ClipLibrary::from_config(&config).is_err());

        let config = SoundConfig::from_yaml("refresh_rate: 0").unwrap();
        assert_eq!(config.refresh_rate(), 1);
    }

    #[test]
    fn test_deserialize_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "play_interval: 1s").unwrap();
        writeln!(file, "clips:").unwrap();
        writeln!(file, "  beep:").unwrap();
        writeln!(file, "    duration: 100ms").unwrap();

        let config = SoundConfig::deserialize(file.path()).unwrap();
        assert_eq!(config.play_interval().unwrap(), Duration::from_secs(1));
        assert_eq!(config.clips().len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let result = SoundConfig::deserialize(Path::new("/nonexistent/sounds.yaml"));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
