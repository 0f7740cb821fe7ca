//! Stream Deck discovery and the hardware-backed session

use elgato_streamdeck::info::Kind;
use elgato_streamdeck::{list_devices, new_hidapi, StreamDeck, StreamDeckError, StreamDeckInput};
use image::DynamicImage;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::session::{DeckError, DeckSession};
use crate::render::{KeyImage, KeyShape};

impl From<StreamDeckError> for DeckError {
    fn from(err: StreamDeckError) -> Self {
        DeckError::Io(err.to_string())
    }
}

/// Stream Deck reached through `elgato-streamdeck`
pub struct StreamDeckSession {
    device: Option<StreamDeck>,
    kind: Kind,
    serial: String,
}

impl StreamDeckSession {
    /// Open the first visual deck, or the one with the given serial
    pub fn open(serial: Option<&str>) -> Result<Self, DeckError> {
        let hid = new_hidapi()?;
        let devices = list_devices(&hid);
        for (kind, found) in &devices {
            debug!("Found {:?} ({}), visual={}", kind, found, kind.is_visual());
        }

        let (kind, serial) = select_device(&devices, serial)?;
        let device = StreamDeck::connect(&hid, kind, &serial)?;

        let firmware = device.firmware_version().unwrap_or_else(|e| {
            warn!("Could not read firmware version: {}", e);
            String::from("unknown")
        });
        info!(
            "Opened {:?} {} ({} keys, firmware {})",
            kind,
            serial,
            kind.key_count(),
            firmware
        );

        Ok(Self {
            device: Some(device),
            kind,
            serial,
        })
    }

    fn device(&self) -> Result<&StreamDeck, DeckError> {
        self.device.as_ref().ok_or(DeckError::Closed)
    }
}

/// Pick the device to open from an enumeration result
fn select_device(
    devices: &[(Kind, String)],
    serial: Option<&str>,
) -> Result<(Kind, String), DeckError> {
    let mut visual = devices.iter().filter(|(kind, _)| kind.is_visual());
    let found = match serial {
        Some(wanted) => visual
            .find(|(_, s)| s == wanted)
            .ok_or_else(|| DeckError::SerialNotFound(wanted.to_string()))?,
        None => visual.next().ok_or(DeckError::NotFound)?,
    };
    if devices.iter().filter(|(kind, _)| kind.is_visual()).count() > 1 {
        info!("Several decks connected, using {}", found.1);
    }
    Ok(found.clone())
}

impl DeckSession for StreamDeckSession {
    fn serial(&self) -> &str {
        &self.serial
    }

    fn key_count(&self) -> u8 {
        self.kind.key_count()
    }

    fn key_shape(&self) -> KeyShape {
        let (width, height) = self.kind.key_image_format().size;
        KeyShape::new(width as u32, height as u32)
    }

    fn reset(&mut self) -> Result<(), DeckError> {
        self.device()?.reset()?;
        Ok(())
    }

    fn set_brightness(&mut self, percent: u8) -> Result<(), DeckError> {
        self.device()?.set_brightness(percent.min(100))?;
        Ok(())
    }

    fn set_key_image(&mut self, key: u8, image: &KeyImage) -> Result<(), DeckError> {
        let device = self.device()?;
        device.set_button_image(key, DynamicImage::ImageRgba8(image.clone()))?;
        device.flush()?;
        Ok(())
    }

    fn poll_buttons(&mut self, timeout: Duration) -> Result<Option<Vec<bool>>, DeckError> {
        match self.device()?.read_input(Some(timeout))? {
            StreamDeckInput::ButtonStateChange(states) => Ok(Some(states)),
            StreamDeckInput::NoData => Ok(None),
            other => {
                debug!("Ignoring input {:?}", other);
                Ok(None)
            }
        }
    }

    fn close(&mut self) {
        if self.device.take().is_some() {
            info!("Closed deck {}", self.serial);
        }
    }
}
