// Copyright (C) 2025 Michael Wilson <mike@mdwn.dev>
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
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{crate_version, Parser, Subcommand};
use crossbeam_channel::Receiver;
use soundpool::audio::mock;
use soundpool::clock::SystemClock;
use soundpool::config::SoundConfig;
use soundpool::driver::{SharedSoundManager, Ticker};
use soundpool::{
    Clip, ClipLibrary, PlayOptions, Priority, SoundControl, SoundEvent, SoundManager,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A priority-ducking sound channel manager."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the clips defined in a sound configuration.
    Clips {
        /// The path to the sound config.
        config_path: PathBuf,
    },
    /// Plays a short ducking demonstration through the mock backend.
    Demo {
        /// The path to the sound config. Clips named music, sfx and alert override the
        /// built-in ones.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clips { config_path } => {
            let config = SoundConfig::deserialize(&config_path)?;
            let library = ClipLibrary::from_config(&config)?;

            if library.is_empty() {
                println!("No clips found in {}.", config_path.display());
                return Ok(());
            }

            println!("Clips (count: {}):", library.len());
            for name in library.names() {
                if let Some(clip) = library.get(name) {
                    println!("- {} ({:?})", name, clip.duration());
                }
            }
        }
        Commands::Demo { config } => {
            let config = match config {
                Some(path) => SoundConfig::deserialize(&path)?,
                None => SoundConfig::default(),
            };
            demo(&config).await?;
        }
    }

    Ok(())
}

/// Builds the clip library for the demo, filling in anything the config doesn't define.
fn demo_library(config: &SoundConfig) -> Result<ClipLibrary, Box<dyn Error>> {
    let mut library = ClipLibrary::from_config(config)?;
    for (name, millis) in [("music", 3000), ("sfx", 250), ("alert", 800)] {
        if library.get(name).is_none() {
            library.insert(Clip::new(name, Duration::from_millis(millis)));
        }
    }
    Ok(library)
}

fn log_events(events: &Receiver<SoundEvent>) {
    for event in events.try_iter() {
        info!(event = %event, "Sound event");
    }
}

fn log_channels(shared: &SharedSoundManager) {
    let manager = shared.lock();
    for channel in manager.channels() {
        info!(
            channel = channel.name(),
            clip = channel.clip().map(Clip::name).unwrap_or("-"),
            priority = %channel.priority(),
            volume = channel.volume(),
            paused = channel.is_paused(),
            "Channel state"
        );
    }
}

async fn demo(config: &SoundConfig) -> Result<(), Box<dyn Error>> {
    let library = demo_library(config)?;
    let clip = |name: &str| {
        library
            .get(name)
            .cloned()
            .ok_or_else(|| format!("no clip named {}", name))
    };
    let (music, sfx, alert) = (clip("music")?, clip("sfx")?, clip("alert")?);

    let clock = Arc::new(SystemClock::new());
    let manager = SoundManager::new(
        Box::new(mock::Backend::new(clock.clone())),
        clock,
        config.settings()?,
    );
    let mut shared = SharedSoundManager::new(manager);
    let events = shared.lock().subscribe();
    let ticker = Ticker::spawn(shared.clone(), config.tick_period());

    shared.play(&music, PlayOptions::new().looping(true))?;
    shared.play(&sfx, PlayOptions::new().priority(Priority::Med))?;
    // Ignored: played again inside the replay interval.
    shared.play(&sfx, PlayOptions::new().priority(Priority::Med))?;
    log_events(&events);
    log_channels(&shared);

    tokio::time::sleep(Duration::from_millis(300)).await;
    shared.play(&alert, PlayOptions::new().priority(Priority::High))?;
    log_events(&events);
    log_channels(&shared);

    tokio::time::sleep(Duration::from_millis(200)).await;
    info!("Pausing everything");
    shared.pause_all(true);
    tokio::time::sleep(Duration::from_millis(500)).await;
    shared.pause_all(false);
    info!("Resumed");

    tokio::time::sleep(alert.duration()).await;
    log_events(&events);
    log_channels(&shared);

    shared.stop_all();
    log_events(&events);
    ticker.stop();

    Ok(())
}
