//! Fake deck, renderer and zone for driving the view controller without hardware

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use sonos_deck::controller::{ViewController, ZoneOptions};
use sonos_deck::core::state::ItemList;
use sonos_deck::hid::{shared, DeckError, DeckSession};
use sonos_deck::keys::{KeyLayout, KeyStyle, KeyTable};
use sonos_deck::render::{KeyImage, KeyShape, RenderError, TileRenderer};
use sonos_deck::zone::{AudioZone, TransportState, ZoneError};

pub const FONT: &str = "Arial.ttf";

/// Everything the fake deck saw
#[derive(Debug, Default)]
pub struct DeckLog {
    pub uploads: Vec<u8>,
    pub resets: usize,
    pub brightness: Option<u8>,
    pub closed: bool,
}

pub type Script = VecDeque<Result<Option<Vec<bool>>, DeckError>>;

pub struct FakeDeck {
    pub key_count: u8,
    pub log: Arc<Mutex<DeckLog>>,
    pub script: Script,
    pub fail_uploads: bool,
}

impl FakeDeck {
    pub fn new(key_count: u8) -> Self {
        Self {
            key_count,
            log: Arc::default(),
            script: VecDeque::new(),
            fail_uploads: false,
        }
    }
}

impl DeckSession for FakeDeck {
    fn serial(&self) -> &str {
        "FAKE0001"
    }

    fn key_count(&self) -> u8 {
        self.key_count
    }

    fn key_shape(&self) -> KeyShape {
        KeyShape::new(72, 72)
    }

    fn reset(&mut self) -> Result<(), DeckError> {
        let mut log = self.log.lock();
        if log.closed {
            return Err(DeckError::Closed);
        }
        log.resets += 1;
        Ok(())
    }

    fn set_brightness(&mut self, percent: u8) -> Result<(), DeckError> {
        self.log.lock().brightness = Some(percent);
        Ok(())
    }

    fn set_key_image(&mut self, key: u8, image: &KeyImage) -> Result<(), DeckError> {
        assert_eq!(image.dimensions(), (72, 72));
        let mut log = self.log.lock();
        if log.closed {
            return Err(DeckError::Closed);
        }
        if self.fail_uploads {
            return Err(DeckError::Io("write failed".into()));
        }
        log.uploads.push(key);
        Ok(())
    }

    fn poll_buttons(&mut self, timeout: Duration) -> Result<Option<Vec<bool>>, DeckError> {
        if self.log.lock().closed {
            return Err(DeckError::Closed);
        }
        match self.script.pop_front() {
            Some(step) => step,
            None => {
                std::thread::sleep(timeout);
                Ok(None)
            }
        }
    }

    fn close(&mut self) {
        self.log.lock().closed = true;
    }
}

/// Records each style it is asked to draw and returns a blank tile
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    pub styles: Arc<Mutex<Vec<KeyStyle>>>,
}

impl TileRenderer for RecordingRenderer {
    fn render(
        &mut self,
        shape: KeyShape,
        style: &KeyStyle,
        items: &ItemList,
    ) -> Result<KeyImage, RenderError> {
        assert!(!items.is_empty());
        self.styles.lock().push(style.clone());
        Ok(KeyImage::new(shape.width, shape.height))
    }
}

/// Zone that starts playing as soon as it is told to
pub struct FakeZone {
    pub state: Arc<Mutex<TransportState>>,
    pub volume: Arc<Mutex<u8>>,
    pub calls: Arc<Mutex<Vec<&'static str>>>,
}

impl FakeZone {
    pub fn new(state: TransportState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            volume: Arc::new(Mutex::new(50)),
            calls: Arc::default(),
        }
    }

    fn record(&self, call: &'static str) -> Result<(), ZoneError> {
        self.calls.lock().push(call);
        Ok(())
    }
}

impl AudioZone for FakeZone {
    fn player_name(&self) -> Result<String, ZoneError> {
        Ok("Kitchen".into())
    }

    fn transport_state(&self) -> Result<TransportState, ZoneError> {
        Ok(*self.state.lock())
    }

    fn play(&self) -> Result<(), ZoneError> {
        *self.state.lock() = TransportState::Playing;
        self.record("play")
    }

    fn pause(&self) -> Result<(), ZoneError> {
        *self.state.lock() = TransportState::Paused;
        self.record("pause")
    }

    fn next(&self) -> Result<(), ZoneError> {
        self.record("next")
    }

    fn previous(&self) -> Result<(), ZoneError> {
        self.record("previous")
    }

    fn volume(&self) -> Result<u8, ZoneError> {
        Ok(*self.volume.lock())
    }

    fn set_volume(&self, volume: u8) -> Result<(), ZoneError> {
        *self.volume.lock() = volume;
        self.record("set_volume")
    }
}

/// A controller wired to fakes, plus handles on what they record
pub struct Rig {
    pub controller: ViewController,
    pub deck: Arc<Mutex<DeckLog>>,
    pub styles: Arc<Mutex<Vec<KeyStyle>>>,
}

impl Rig {
    /// Drop everything recorded so far
    pub fn clear(&self) {
        self.deck.lock().uploads.clear();
        self.styles.lock().clear();
    }

    pub fn uploads(&self) -> Vec<u8> {
        self.deck.lock().uploads.clone()
    }

    /// Style most recently drawn for `key`
    pub fn last_style(&self, key: u8) -> KeyStyle {
        let uploads = self.deck.lock().uploads.clone();
        let styles = self.styles.lock();
        let index = uploads
            .iter()
            .rposition(|&k| k == key)
            .expect("key was never painted");
        styles[index].clone()
    }

    pub fn press(&mut self, key: u8) {
        self.controller.handle_key(key, true).unwrap();
        self.controller.handle_key(key, false).unwrap();
    }
}

pub fn table(key_count: u8) -> KeyTable {
    KeyTable::new(&KeyLayout::default(), key_count, FONT).unwrap()
}

pub fn items() -> ItemList {
    ItemList::new(KeyLayout::default().items).unwrap()
}

pub fn fast_options() -> ZoneOptions {
    ZoneOptions {
        volume_step: 2,
        poll_interval: Duration::from_millis(1),
        poll_timeout: Duration::from_millis(500),
    }
}

pub fn rig_with(deck: FakeDeck, zone: Option<FakeZone>) -> Rig {
    let log = Arc::clone(&deck.log);
    let key_count = deck.key_count;
    let renderer = RecordingRenderer::default();
    let styles = Arc::clone(&renderer.styles);
    let controller = ViewController::new(
        shared(deck),
        table(key_count),
        items(),
        Box::new(renderer),
        zone.map(|z| Box::new(z) as Box<dyn AudioZone>),
        fast_options(),
    );
    Rig {
        controller,
        deck: log,
        styles,
    }
}

pub fn rig(key_count: u8, zone: Option<FakeZone>) -> Rig {
    rig_with(FakeDeck::new(key_count), zone)
}
