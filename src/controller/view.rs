//! View controller: owns the panel state and turns key events into repaints and commands

use anyhow::{Context, Result};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::core::config::ZoneConfig;
use crate::core::state::{ItemList, UiMode, ViewState};
use crate::hid::SharedDeck;
use crate::keys::{Action, KeyTable, ZoneProbe};
use crate::render::{KeyShape, TileRenderer};
use crate::zone::{AudioZone, TransportState, ZoneError};

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Exit was confirmed on the deck
    Exit,
    /// Restart was confirmed on the deck
    Restart,
}

/// What the dispatcher should do after a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The deck has been torn down
    Shutdown(SessionOutcome),
}

/// Zone command tuning
#[derive(Debug, Clone, Copy)]
pub struct ZoneOptions {
    pub volume_step: i16,
    /// Wait between transport polls after Play
    pub poll_interval: Duration,
    /// Stop polling for PLAYING after this long
    pub poll_timeout: Duration,
}

impl ZoneOptions {
    pub fn from_config(config: &ZoneConfig) -> Self {
        Self {
            volume_step: config.volume_step,
            poll_interval: Duration::from_millis(config.play_poll_interval_ms),
            poll_timeout: Duration::from_millis(config.play_poll_timeout_ms),
        }
    }
}

impl Default for ZoneOptions {
    fn default() -> Self {
        Self::from_config(&ZoneConfig::default())
    }
}

/// Panel state machine for one deck
pub struct ViewController {
    deck: SharedDeck,
    table: KeyTable,
    state: ViewState,
    renderer: Box<dyn TileRenderer>,
    /// Present only when the startup probe reached the zone
    zone: Option<Box<dyn AudioZone>>,
    options: ZoneOptions,
    serial: String,
    shape: KeyShape,
}

impl ViewController {
    pub fn new(
        deck: SharedDeck,
        table: KeyTable,
        items: ItemList,
        renderer: Box<dyn TileRenderer>,
        zone: Option<Box<dyn AudioZone>>,
        options: ZoneOptions,
    ) -> Self {
        let (serial, shape) = {
            let guard = deck.lock();
            (guard.serial().to_string(), guard.key_shape())
        };
        Self {
            deck,
            table,
            state: ViewState::new(items),
            renderer,
            zone,
            options,
            serial,
            shape,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn deck(&self) -> SharedDeck {
        SharedDeck::clone(&self.deck)
    }

    /// Reset the deck, apply brightness and paint every key
    pub fn start(&mut self, brightness: u8) -> Result<()> {
        {
            let mut deck = self.deck.lock();
            deck.reset().context("Failed to reset deck")?;
            deck.set_brightness(brightness)
                .context("Failed to set deck brightness")?;
        }
        info!(
            "Deck {} ready: {} keys, zone {}",
            self.serial,
            self.table.key_count(),
            if self.zone.is_some() { "connected" } else { "unavailable" }
        );
        self.repaint_all()
    }

    /// Handle one press or release
    pub fn handle_key(&mut self, key: u8, pressed: bool) -> Result<Flow> {
        if key >= self.table.key_count() {
            debug!("Deck {} ignoring key {}", self.serial, key);
            return Ok(Flow::Continue);
        }

        self.repaint_key(key, pressed)?;
        if !pressed {
            return Ok(Flow::Continue);
        }

        let action = self.table.lookup(&self.state.mode, key, self.zone.is_some());
        debug!("Deck {} key {} -> {} on {}", self.serial, key, action, self.state.mode);

        match action {
            Action::Exit => self.enter(UiMode::ExitConfirm)?,
            Action::CancelExit => self.enter(UiMode::Home)?,
            Action::ConfirmExit => {
                self.teardown()?;
                return Ok(Flow::Shutdown(SessionOutcome::Exit));
            }
            Action::ConfirmRestart => {
                self.teardown()?;
                return Ok(Flow::Shutdown(SessionOutcome::Restart));
            }
            Action::NavigateNext => {
                self.state.items.select_next();
                self.repaint_all()?;
            }
            Action::NavigatePrev => {
                self.state.items.select_prev();
                self.repaint_all()?;
            }
            Action::ConfirmSelection => {
                let item = self.state.items.current().to_string();
                self.enter(UiMode::ItemSelect(item))?;
            }
            Action::ToggleRunning => {
                let running = self.state.flags.toggle_running();
                debug!("Running flag now {}", running);
                self.repaint_key(key, running)?;
            }
            Action::PlayPause => self.play_pause(key)?,
            Action::Previous => self.zone_command("previous", |zone| zone.previous()),
            Action::Next => self.zone_command("next", |zone| zone.next()),
            Action::VolumeUp => {
                let step = self.options.volume_step;
                self.zone_command("volume up", |zone| zone.adjust_volume(step).map(drop));
            }
            Action::VolumeDown => {
                let step = self.options.volume_step;
                self.zone_command("volume down", |zone| zone.adjust_volume(-step).map(drop));
            }
            Action::Decorative | Action::Empty => {}
        }
        Ok(Flow::Continue)
    }

    /// Release the handle without resetting, after a device failure
    pub fn abandon(&mut self) {
        self.deck.lock().close();
    }

    fn enter(&mut self, mode: UiMode) -> Result<()> {
        info!("Deck {} mode {} -> {}", self.serial, self.state.mode, mode);
        self.state.mode = mode;
        self.repaint_all()
    }

    /// Resolve, render and upload every key in ascending order
    fn repaint_all(&mut self) -> Result<()> {
        for key in 0..self.table.key_count() {
            self.repaint_key(key, false)?;
        }
        Ok(())
    }

    fn repaint_key(&mut self, key: u8, pressed: bool) -> Result<()> {
        let style = self.table.resolve(&self.state, key, pressed, &*self);
        let image = self
            .renderer
            .render(self.shape, &style, &self.state.items)
            .with_context(|| format!("Failed to render key {} ({})", key, style.name()))?;

        let mut deck = self.deck.lock();
        deck.set_key_image(key, &image)
            .with_context(|| format!("Failed to upload image for key {}", key))?;
        debug!("Deck {} key {} painted as {}", self.serial, key, style.name());
        Ok(())
    }

    /// Pause when playing; otherwise play and wait for the zone to report it
    fn play_pause(&mut self, key: u8) -> Result<()> {
        let Some(zone) = self.zone.as_deref() else {
            return Ok(());
        };
        match zone.transport_state() {
            Ok(TransportState::Playing) => {
                if let Err(e) = zone.pause() {
                    warn!("Zone pause failed: {}", e);
                }
                Ok(())
            }
            Ok(_) => {
                if let Err(e) = zone.play() {
                    warn!("Zone play failed: {}", e);
                    return Ok(());
                }
                wait_for_playing(zone, &self.options);
                self.repaint_key(key, false)
            }
            Err(e) => {
                warn!("Zone transport state unavailable: {}", e);
                Ok(())
            }
        }
    }

    /// Fire a zone command; failures are logged and otherwise ignored
    fn zone_command<T>(&self, what: &str, command: impl FnOnce(&dyn AudioZone) -> Result<T, ZoneError>) {
        if let Some(zone) = self.zone.as_deref() {
            if let Err(e) = command(zone) {
                warn!("Zone {} failed: {}", what, e);
            }
        }
    }

    /// Reset and close the deck under its lock
    fn teardown(&mut self) -> Result<()> {
        let mut deck = self.deck.lock();
        let reset = deck.reset();
        deck.close();
        reset.context("Failed to reset deck during teardown")?;
        info!("Deck {} torn down", self.serial);
        Ok(())
    }
}

impl ZoneProbe for ViewController {
    fn connected(&self) -> bool {
        self.zone.is_some()
    }

    fn transport_state(&self) -> TransportState {
        match self.zone.as_deref() {
            Some(zone) => zone.transport_state().unwrap_or_else(|e| {
                warn!("Zone transport state unavailable: {}", e);
                TransportState::Unknown
            }),
            None => TransportState::Unknown,
        }
    }
}

/// Poll until the zone reports PLAYING or the timeout passes
fn wait_for_playing(zone: &dyn AudioZone, options: &ZoneOptions) -> bool {
    let deadline = Instant::now() + options.poll_timeout;
    loop {
        match zone.transport_state() {
            Ok(TransportState::Playing) => return true,
            Ok(state) => debug!("Waiting for playback, zone is {:?}", state),
            Err(e) => debug!("Transport poll failed: {}", e),
        }
        if Instant::now() >= deadline {
            warn!("Zone did not start playing within {:?}", options.poll_timeout);
            return false;
        }
        thread::sleep(options.poll_interval);
    }
}
