//! Sonos zone player control over UPnP/SOAP

use std::time::Duration;

use tracing::debug;
use ureq::{Agent, AgentBuilder};

use super::soap::{self, Service, AV_TRANSPORT, RENDERING_CONTROL};
use super::{AudioZone, TransportState, ZoneError};
use crate::core::config::ZoneConfig;

/// Device description document, used for the room name
const DEVICE_DESCRIPTION_PATH: &str = "/xml/device_description.xml";

/// One Sonos zone player reached over HTTP
pub struct SonosZone {
    agent: Agent,
    base_url: String,
}

impl SonosZone {
    pub fn new(config: &ZoneConfig) -> Self {
        Self::with_base_url(config.base_url(), Duration::from_millis(config.timeout_ms))
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Invoke a SOAP action and return the response body
    fn call(
        &self,
        service: &Service,
        action: &'static str,
        args: &[(&str, &str)],
    ) -> Result<String, ZoneError> {
        let url = format!("{}{}", self.base_url, service.control_path);
        let body = soap::envelope(service, action, args);
        debug!("SOAP {} -> {}", action, url);

        let response = self
            .agent
            .post(&url)
            .set("Content-Type", "text/xml; charset=\"utf-8\"")
            .set("SOAPACTION", &soap::soap_action(service, action))
            .send_string(&body);

        match response {
            Ok(response) => Ok(response.into_string()?),
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                let code = soap::fault_code(&body).unwrap_or_else(|| status.to_string());
                Err(ZoneError::Fault { action, code })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn transport_command(&self, action: &'static str) -> Result<(), ZoneError> {
        self.call(&AV_TRANSPORT, action, &[("InstanceID", "0")])
            .map(|_| ())
    }
}

impl AudioZone for SonosZone {
    fn player_name(&self) -> Result<String, ZoneError> {
        let url = format!("{}{}", self.base_url, DEVICE_DESCRIPTION_PATH);
        let body = self.agent.get(&url).call()?.into_string()?;
        soap::extract_tag(&body, "roomName").ok_or(ZoneError::MissingField("roomName"))
    }

    fn transport_state(&self) -> Result<TransportState, ZoneError> {
        let body = self.call(&AV_TRANSPORT, "GetTransportInfo", &[("InstanceID", "0")])?;
        let state = soap::extract_tag(&body, "CurrentTransportState")
            .ok_or(ZoneError::MissingField("CurrentTransportState"))?;
        Ok(TransportState::from_upnp(&state))
    }

    fn play(&self) -> Result<(), ZoneError> {
        self.call(&AV_TRANSPORT, "Play", &[("InstanceID", "0"), ("Speed", "1")])
            .map(|_| ())
    }

    fn pause(&self) -> Result<(), ZoneError> {
        self.transport_command("Pause")
    }

    fn next(&self) -> Result<(), ZoneError> {
        self.transport_command("Next")
    }

    fn previous(&self) -> Result<(), ZoneError> {
        self.transport_command("Previous")
    }

    fn volume(&self) -> Result<u8, ZoneError> {
        let body = self.call(
            &RENDERING_CONTROL,
            "GetVolume",
            &[("InstanceID", "0"), ("Channel", "Master")],
        )?;
        let value = soap::extract_tag(&body, "CurrentVolume")
            .ok_or(ZoneError::MissingField("CurrentVolume"))?;
        value.trim().parse().map_err(|_| ZoneError::BadValue {
            field: "CurrentVolume",
            value,
        })
    }

    fn set_volume(&self, volume: u8) -> Result<(), ZoneError> {
        let desired = volume.to_string();
        self.call(
            &RENDERING_CONTROL,
            "SetVolume",
            &[
                ("InstanceID", "0"),
                ("Channel", "Master"),
                ("DesiredVolume", desired.as_str()),
            ],
        )
        .map(|_| ())
    }
}
