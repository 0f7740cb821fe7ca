//! Zone module - playback control of a single audio zone

mod soap;
mod sonos;

pub use sonos::SonosZone;

use thiserror::Error;

/// Errors from talking to the zone player
#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("HTTP request to zone failed: {0}")]
    Http(String),
    #[error("zone returned SOAP fault {code} for {action}")]
    Fault { action: &'static str, code: String },
    #[error("missing <{0}> in zone response")]
    MissingField(&'static str),
    #[error("unexpected value {value:?} for <{field}>")]
    BadValue { field: &'static str, value: String },
}

impl From<ureq::Error> for ZoneError {
    fn from(err: ureq::Error) -> Self {
        ZoneError::Http(err.to_string())
    }
}

impl From<std::io::Error> for ZoneError {
    fn from(err: std::io::Error) -> Self {
        ZoneError::Http(err.to_string())
    }
}

/// Playback status of the zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    Playing,
    Paused,
    Stopped,
    Transitioning,
    #[default]
    Unknown,
}

impl TransportState {
    /// Parse the UPnP `CurrentTransportState` value
    pub fn from_upnp(value: &str) -> Self {
        match value.trim() {
            "PLAYING" => TransportState::Playing,
            "PAUSED_PLAYBACK" => TransportState::Paused,
            "STOPPED" => TransportState::Stopped,
            "TRANSITIONING" => TransportState::Transitioning,
            _ => TransportState::Unknown,
        }
    }
}

/// Maximum zone volume
pub const MAX_VOLUME: u8 = 100;

/// Control surface of one audio zone
pub trait AudioZone: Send + Sync {
    /// Zone display name; also serves as the connectivity probe
    fn player_name(&self) -> Result<String, ZoneError>;

    fn transport_state(&self) -> Result<TransportState, ZoneError>;

    fn play(&self) -> Result<(), ZoneError>;
    fn pause(&self) -> Result<(), ZoneError>;
    fn next(&self) -> Result<(), ZoneError>;
    fn previous(&self) -> Result<(), ZoneError>;

    fn volume(&self) -> Result<u8, ZoneError>;
    fn set_volume(&self, volume: u8) -> Result<(), ZoneError>;

    /// Change the volume by `delta`, clamped to `0..=MAX_VOLUME`. Returns the new volume.
    fn adjust_volume(&self, delta: i16) -> Result<u8, ZoneError> {
        let current = i16::from(self.volume()?);
        let target = (current + delta).clamp(0, i16::from(MAX_VOLUME)) as u8;
        self.set_volume(target)?;
        Ok(target)
    }
}
