//! Declarative key table: (mode, key index) -> action -> style
//!
//! Three layers:
//! - base: navigation, toggle, decorative and exit keys on every screen but the exit screen
//! - zone: transport keys, only on the zone item's selection screen and only
//!   while the zone is reachable
//! - exit: confirm/cancel/restart, replacing everything else on the exit screen
//!
//! Keys no active layer claims resolve to [`Action::Empty`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

use super::style::{Action, IconRef, KeyStyle};
use crate::core::state::{UiMode, ViewState};
use crate::zone::TransportState;

/// Layout errors found when building the key table
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("deck reports no keys")]
    NoKeys,
    #[error("key {key} is bound to both {first} and {second} on the {screen} screen")]
    DuplicateKey {
        screen: &'static str,
        key: u8,
        first: Action,
        second: Action,
    },
    #[error("{action} is bound to more than one key on the {screen} screen")]
    DuplicateAction { screen: &'static str, action: Action },
    #[error("item list is empty")]
    NoItems,
    #[error("zone item {0:?} is not in the item list")]
    UnknownZoneItem(String),
}

/// Key indices and item list, as read from the `[layout]` config section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyLayout {
    /// Labels cycled by the navigation keys
    #[serde(default = "default_items")]
    pub items: Vec<String>,
    /// Item whose selection screen shows the transport keys
    #[serde(default = "default_zone_item")]
    pub zone_item: String,

    #[serde(default = "default_prev")]
    pub prev: u8,
    #[serde(default = "default_next")]
    pub next: u8,
    #[serde(default = "default_select")]
    pub select: u8,
    #[serde(default = "default_toggle")]
    pub toggle: u8,
    #[serde(default = "default_secondary")]
    pub secondary: u8,

    #[serde(default = "default_volume_up")]
    pub volume_up: u8,
    #[serde(default = "default_previous")]
    pub previous: u8,
    #[serde(default = "default_play_pause")]
    pub play_pause: u8,
    #[serde(default = "default_next_track")]
    pub next_track: u8,
    #[serde(default = "default_volume_down")]
    pub volume_down: u8,

    #[serde(default = "default_confirm_restart")]
    pub confirm_restart: u8,
    #[serde(default = "default_confirm_exit")]
    pub confirm_exit: u8,
    #[serde(default = "default_cancel_exit")]
    pub cancel_exit: u8,
}

fn default_items() -> Vec<String> {
    vec!["home".to_string(), "sonos".to_string()]
}
fn default_zone_item() -> String {
    "sonos".to_string()
}
fn default_prev() -> u8 {
    0
}
fn default_next() -> u8 {
    5
}
fn default_select() -> u8 {
    10
}
fn default_toggle() -> u8 {
    4
}
fn default_secondary() -> u8 {
    9
}
fn default_volume_up() -> u8 {
    2
}
fn default_previous() -> u8 {
    6
}
fn default_play_pause() -> u8 {
    7
}
fn default_next_track() -> u8 {
    8
}
fn default_volume_down() -> u8 {
    12
}
fn default_confirm_restart() -> u8 {
    2
}
fn default_confirm_exit() -> u8 {
    6
}
fn default_cancel_exit() -> u8 {
    8
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self {
            items: default_items(),
            zone_item: default_zone_item(),
            prev: default_prev(),
            next: default_next(),
            select: default_select(),
            toggle: default_toggle(),
            secondary: default_secondary(),
            volume_up: default_volume_up(),
            previous: default_previous(),
            play_pause: default_play_pause(),
            next_track: default_next_track(),
            volume_down: default_volume_down(),
            confirm_restart: default_confirm_restart(),
            confirm_exit: default_confirm_exit(),
            cancel_exit: default_cancel_exit(),
        }
    }
}

/// External state the resolver may look at
pub trait ZoneProbe {
    /// Result of the startup connectivity probe
    fn connected(&self) -> bool;
    /// Live transport state; only asked for keys whose icon depends on it
    fn transport_state(&self) -> TransportState;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Binding {
    key: u8,
    action: Action,
}

fn find(layer: &[Binding], key: u8) -> Option<Action> {
    layer.iter().find(|b| b.key == key).map(|b| b.action)
}

/// Ways off the exit screen that did not fit on the deck
fn missing_exit_keys(exit: &[Binding]) -> Vec<Action> {
    [Action::ConfirmExit, Action::CancelExit]
        .into_iter()
        .filter(|action| exit.iter().all(|b| b.action != *action))
        .collect()
}

/// Validated key table for one deck
#[derive(Debug, Clone)]
pub struct KeyTable {
    base: Vec<Binding>,
    zone: Vec<Binding>,
    exit: Vec<Binding>,
    zone_item: String,
    font: String,
    key_count: u8,
}

impl KeyTable {
    /// Build the table for a deck with `key_count` keys.
    ///
    /// Bindings past the last key are dropped. The exit key always takes the
    /// last index and hides anything else configured there.
    pub fn new(layout: &KeyLayout, key_count: u8, font: &str) -> Result<Self, LayoutError> {
        if key_count == 0 {
            return Err(LayoutError::NoKeys);
        }
        if layout.items.is_empty() {
            return Err(LayoutError::NoItems);
        }
        if !layout.items.contains(&layout.zone_item) {
            return Err(LayoutError::UnknownZoneItem(layout.zone_item.clone()));
        }
        let last = key_count - 1;

        // exit_shadows: whether the exit key hides other bindings on its index
        let keep = |bindings: &[(u8, Action)], exit_shadows: bool| -> Vec<Binding> {
            bindings
                .iter()
                .filter(|(key, action)| {
                    if *key >= key_count {
                        debug!("Dropping {} on key {} (deck has {} keys)", action, key, key_count);
                        return false;
                    }
                    if exit_shadows && *key == last && *action != Action::Exit {
                        warn!("{} on key {} is hidden by the exit key", action, key);
                        return false;
                    }
                    true
                })
                .map(|&(key, action)| Binding { key, action })
                .collect()
        };

        let base = keep(&[
            (last, Action::Exit),
            (layout.prev, Action::NavigatePrev),
            (layout.next, Action::NavigateNext),
            (layout.select, Action::ConfirmSelection),
            (layout.toggle, Action::ToggleRunning),
            (layout.secondary, Action::Decorative),
        ], true);
        let zone = keep(&[
            (layout.play_pause, Action::PlayPause),
            (layout.previous, Action::Previous),
            (layout.next_track, Action::Next),
            (layout.volume_up, Action::VolumeUp),
            (layout.volume_down, Action::VolumeDown),
        ], true);
        let exit = keep(&[
            (layout.confirm_exit, Action::ConfirmExit),
            (layout.cancel_exit, Action::CancelExit),
            (layout.confirm_restart, Action::ConfirmRestart),
        ], false);

        check_screen("home", base.iter())?;
        check_screen("zone", base.iter().chain(zone.iter()))?;
        check_screen("exit", exit.iter())?;
        for action in missing_exit_keys(&exit) {
            warn!(
                "{} has no key on a {}-key deck, configure [layout] to reach it",
                action, key_count
            );
        }

        Ok(Self {
            base,
            zone,
            exit,
            zone_item: layout.zone_item.clone(),
            font: font.to_string(),
            key_count,
        })
    }

    pub fn key_count(&self) -> u8 {
        self.key_count
    }

    pub fn zone_item(&self) -> &str {
        &self.zone_item
    }

    /// Action bound to `key` on the given screen
    pub fn lookup(&self, mode: &UiMode, key: u8, zone_connected: bool) -> Action {
        if let UiMode::ExitConfirm = mode {
            return find(&self.exit, key).unwrap_or(Action::Empty);
        }
        if zone_connected && mode.is_item(&self.zone_item) {
            if let Some(action) = find(&self.zone, key) {
                return action;
            }
        }
        find(&self.base, key).unwrap_or(Action::Empty)
    }

    /// Resolve the full style for `key` given the current view state.
    pub fn resolve(
        &self,
        state: &ViewState,
        key: u8,
        pressed: bool,
        probe: &dyn ZoneProbe,
    ) -> KeyStyle {
        let action = self.lookup(&state.mode, key, probe.connected());
        let icon = match action {
            Action::Exit | Action::ConfirmExit => Some(IconRef::deck("vehicle-exit")),
            Action::NavigatePrev => Some(if pressed {
                IconRef::deck("vehicle-arrow-up")
            } else {
                IconRef::deck("settings-arrow-up")
            }),
            Action::NavigateNext => Some(if pressed {
                IconRef::deck("vehicle-arrow-down")
            } else {
                IconRef::deck("settings-arrow-down")
            }),
            Action::ConfirmSelection => None,
            Action::ToggleRunning => Some(play_or_pause(state.flags.running)),
            Action::Decorative => Some(IconRef::deck("music-music-repeat-all")),
            Action::PlayPause => Some(play_or_pause(
                probe.transport_state() == TransportState::Playing,
            )),
            Action::Previous => Some(IconRef::deck("music-music-prev")),
            Action::Next => Some(IconRef::deck("music-music-next")),
            Action::VolumeUp => Some(IconRef::deck("music-music-volume-up")),
            Action::VolumeDown => Some(IconRef::deck("music-music-volume-down")),
            Action::CancelExit => Some(IconRef::deck("settings-cancel")),
            Action::ConfirmRestart => Some(IconRef::deck("settings-restart")),
            Action::Empty => return KeyStyle::empty(&self.font),
        };
        let label = match action {
            Action::ConfirmSelection => state.items.current().to_string(),
            _ => String::new(),
        };
        KeyStyle {
            action,
            icon,
            font: self.font.clone(),
            label,
        }
    }
}

/// Pause icon while something is running, play icon otherwise
fn play_or_pause(active: bool) -> IconRef {
    if active {
        IconRef::deck("music-music-pause")
    } else {
        IconRef::deck("music-music-play")
    }
}

fn check_screen<'a>(
    screen: &'static str,
    bindings: impl Iterator<Item = &'a Binding>,
) -> Result<(), LayoutError> {
    let mut keys: Vec<Binding> = Vec::new();
    let mut actions = HashSet::new();
    for binding in bindings {
        if let Some(existing) = keys.iter().find(|b| b.key == binding.key) {
            return Err(LayoutError::DuplicateKey {
                screen,
                key: binding.key,
                first: existing.action,
                second: binding.action,
            });
        }
        if !actions.insert(binding.action) {
            return Err(LayoutError::DuplicateAction {
                screen,
                action: binding.action,
            });
        }
        keys.push(*binding);
    }
    Ok(())
}
