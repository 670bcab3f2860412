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

//! Clip handles and the named clip library.
//!
//! A clip is an opaque, pre-decoded asset. The manager only ever needs its identity and its
//! duration, so a clip is a shared handle compared by pointer.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ConfigError, SoundConfig};

struct ClipData {
    name: String,
    duration: Duration,
}

/// A handle to an immutable sound asset.
///
/// Two handles are equal only if they were cloned from the same `Clip::new` call. Clips that
/// happen to share a name are still distinct.
#[derive(Clone)]
pub struct Clip {
    inner: Arc<ClipData>,
}

impl Clip {
    /// Creates a new clip.
    pub fn new(name: &str, duration: Duration) -> Clip {
        Clip {
            inner: Arc::new(ClipData {
                name: name.to_string(),
                duration,
            }),
        }
    }

    /// The clip name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The length of a single pass through the clip.
    pub fn duration(&self) -> Duration {
        self.inner.duration
    }
}

impl PartialEq for Clip {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Clip {}

impl Hash for Clip {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.inner) as usize).hash(state);
    }
}

impl fmt::Debug for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clip")
            .field("name", &self.inner.name)
            .field("duration", &self.inner.duration)
            .finish()
    }
}

impl fmt::Display for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.name)
    }
}

/// Named clips registered by the host.
#[derive(Default, Debug)]
pub struct ClipLibrary {
    clips: HashMap<String, Clip>,
}

impl ClipLibrary {
    /// Creates an empty library.
    pub fn new() -> ClipLibrary {
        ClipLibrary::default()
    }

    /// Builds a library from the clips listed in the configuration.
    pub fn from_config(config: &SoundConfig) -> Result<ClipLibrary, ConfigError> {
        let mut library = ClipLibrary::new();
        for (name, clip) in config.clips() {
            library.insert(Clip::new(name, clip.duration()?));
        }
        Ok(library)
    }

    /// Registers a clip under its own name, replacing any clip with the same name.
    pub fn insert(&mut self, clip: Clip) -> Option<Clip> {
        self.clips.insert(clip.name().to_string(), clip)
    }

    /// Looks up a clip by name.
    pub fn get(&self, name: &str) -> Option<&Clip> {
        self.clips.get(name)
    }

    /// All clip names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.clips.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_clip_identity() {
        let a = Clip::new("blip", Duration::from_millis(100));
        let b = Clip::new("blip", Duration::from_millis(100));

        assert_eq!(a, a.clone());
        assert_ne!(a, b);

        let set: HashSet<Clip> = [a.clone(), a.clone(), b.clone()].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_library_lookup() {
        let mut library = ClipLibrary::new();
        assert!(library.is_empty());

        let music = Clip::new("music", Duration::from_secs(30));
        library.insert(music.clone());
        library.insert(Clip::new("sfx", Duration::from_millis(250)));

        assert_eq!(library.len(), 2);
        assert_eq!(library.get("music"), Some(&music));
        assert!(library.get("missing").is_none());
        assert_eq!(library.names(), vec!["music", "sfx"]);
    }

    #[test]
    fn test_library_replaces_same_name() {
        let mut library = ClipLibrary::new();
        let first = Clip::new("sfx", Duration::from_millis(100));
        let second = Clip::new("sfx", Duration::from_millis(200));

        assert!(library.insert(first.clone()).is_none());
        assert_eq!(library.insert(second.clone()), Some(first));
        assert_eq!(library.get("sfx"), Some(&second));
    }
}
