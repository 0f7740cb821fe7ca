//! Sonos Deck - Entry Point
//!
//! Opens the deck, probes the zone once, then serves key events until the
//! session is exited or restarted from the deck.

use anyhow::{Context, Result};
use sonos_deck::{
    controller::{run_session, SessionOptions, SessionOutcome, ViewController, ZoneOptions},
    core::{
        config::{Config, RestartStrategy, SessionConfig, ZoneConfig},
        state::ItemList,
    },
    hid::{shared, DeckSession, StreamDeckSession},
    keys::KeyTable,
    render::{AssetStore, GlyphRenderer},
    zone::{AudioZone, SonosZone},
};
use std::process::Command;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sonos Deck");

    let config = Config::load()?;
    info!("Configuration loaded");

    match run(&config)? {
        SessionOutcome::Exit => {
            info!("Exit confirmed on deck");
            Ok(())
        }
        SessionOutcome::Restart => restart(&config.session),
    }
}

fn run(config: &Config) -> Result<SessionOutcome> {
    // Probed once; a zone that is down now stays disabled for this run
    let zone = probe_zone(&config.zone);

    let session = StreamDeckSession::open(config.deck.serial.as_deref())
        .context("Failed to open Stream Deck")?;
    let table = KeyTable::new(&config.layout, session.key_count(), &config.assets.font)
        .context("Invalid key layout")?;
    let items = ItemList::new(config.layout.items.iter().cloned()).context("Item list is empty")?;

    let assets = AssetStore::new(config.assets.resolve_root());
    info!("Loading assets from {:?}", assets.root());
    let renderer = GlyphRenderer::new(assets, config.assets.font_size);

    let controller = ViewController::new(
        shared(session),
        table,
        items,
        Box::new(renderer),
        zone,
        ZoneOptions::from_config(&config.zone),
    );
    run_session(
        controller,
        SessionOptions {
            brightness: config.deck.brightness,
            poll_interval: Duration::from_millis(config.deck.poll_interval_ms),
        },
    )
}

fn probe_zone(config: &ZoneConfig) -> Option<Box<dyn AudioZone>> {
    if !config.enabled {
        info!("Zone control disabled");
        return None;
    }
    let zone = SonosZone::new(config);
    match zone.player_name() {
        Ok(name) => {
            info!("Connected to zone {} at {}", name, zone.base_url());
            Some(Box::new(zone))
        }
        Err(e) => {
            warn!(
                "Zone at {} unreachable, transport keys disabled: {}",
                zone.base_url(),
                e
            );
            None
        }
    }
}

fn restart(session: &SessionConfig) -> Result<()> {
    match session.on_restart {
        RestartStrategy::ExitCode => {
            info!("Restart confirmed, exiting with code {}", session.restart_exit_code);
            std::process::exit(session.restart_exit_code);
        }
        RestartStrategy::Reexec => {
            let exe = std::env::current_exe().context("Failed to locate current executable")?;
            Command::new(&exe)
                .args(std::env::args_os().skip(1))
                .spawn()
                .with_context(|| format!("Failed to relaunch {:?}", exe))?;
            info!("Relaunched {:?}", exe);
            Ok(())
        }
    }
}
