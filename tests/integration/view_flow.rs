//! View controller flows driven through fake hardware

use std::sync::Arc;

use sonos_deck::controller::{Flow, SessionOutcome};
use sonos_deck::core::state::UiMode;
use sonos_deck::keys::{Action, IconRef, PLACEHOLDER_ICON};
use sonos_deck::render::{AssetStore, GlyphRenderer};
use sonos_deck::zone::TransportState;

use crate::common::*;

const PREV: u8 = 0;
const NEXT: u8 = 5;
const SELECT: u8 = 10;
const TOGGLE: u8 = 4;
const EXIT: u8 = 14;

/// Navigate to the zone item and open it
fn open_zone_item(rig: &mut Rig) {
    rig.press(NEXT);
    rig.press(SELECT);
    assert_eq!(rig.controller.state().mode, UiMode::ItemSelect("sonos".into()));
}

#[test]
fn test_start_paints_every_key_in_order() {
    let mut rig = rig(15, None);
    rig.controller.start(30).unwrap();

    let log = rig.deck.lock();
    assert_eq!(log.uploads, (0..15).collect::<Vec<u8>>());
    assert_eq!(log.brightness, Some(30));
    assert_eq!(log.resets, 1);
}

#[test]
fn test_navigate_next_repaints_full_panel() {
    let mut rig = rig(15, None);
    rig.controller.start(30).unwrap();
    rig.clear();

    let flow = rig.controller.handle_key(NEXT, true).unwrap();
    assert_eq!(flow, Flow::Continue);
    assert_eq!(rig.controller.state().items.selected(), 1);

    // pressed key first, then every key in ascending order
    let mut expected = vec![NEXT];
    expected.extend(0..15);
    assert_eq!(rig.uploads(), expected);

    rig.clear();
    rig.controller.handle_key(NEXT, false).unwrap();
    assert_eq!(rig.uploads(), vec![NEXT]);

    rig.clear();
    rig.controller.handle_key(NEXT, true).unwrap();
    assert_eq!(rig.controller.state().items.selected(), 0);
    assert_eq!(rig.uploads().len(), 16);
}

#[test]
fn test_navigate_prev_wraps_to_last() {
    let mut rig = rig(15, None);
    rig.press(PREV);
    assert_eq!(rig.controller.state().items.selected(), 1);
    assert_eq!(rig.controller.state().items.current(), "sonos");
}

#[test]
fn test_arrow_icon_follows_press_state() {
    let mut rig = rig(15, None);
    rig.controller.handle_key(NEXT, true).unwrap();
    // the full repaint draws the released arrow last
    let uploads = rig.uploads();
    let styles = rig.styles.lock().clone();
    assert_eq!(uploads[0], NEXT);
    assert_eq!(styles[0].icon, Some(IconRef::deck("vehicle-arrow-down")));
    assert_eq!(
        rig.last_style(NEXT).icon,
        Some(IconRef::deck("settings-arrow-down"))
    );
}

#[test]
fn test_release_has_no_side_effect() {
    let mut rig = rig(15, None);
    rig.controller.handle_key(EXIT, false).unwrap();
    assert_eq!(rig.controller.state().mode, UiMode::Home);
    assert_eq!(rig.uploads(), vec![EXIT]);
}

#[test]
fn test_select_shows_current_item() {
    let mut rig = rig(15, None);
    rig.controller.start(30).unwrap();
    let select = rig.last_style(SELECT);
    assert_eq!(select.action, Action::ConfirmSelection);
    assert_eq!(select.icon, None);
    assert_eq!(select.label, "home");

    rig.press(SELECT);
    assert_eq!(rig.controller.state().mode, UiMode::ItemSelect("home".into()));
}

#[test]
fn test_exit_screen_and_cancel() {
    let mut rig = rig(15, None);
    rig.controller.handle_key(EXIT, true).unwrap();
    assert_eq!(rig.controller.state().mode, UiMode::ExitConfirm);

    assert_eq!(rig.last_style(6).action, Action::ConfirmExit);
    assert_eq!(rig.last_style(8).action, Action::CancelExit);
    assert_eq!(rig.last_style(2).action, Action::ConfirmRestart);
    for key in [0, 1, 3, 4, 5, 7, 9, 10, 11, 12, 13, 14] {
        let style = rig.last_style(key);
        assert_eq!(style.action, Action::Empty, "key {key}");
        assert_eq!(style.icon, Some(PLACEHOLDER_ICON));
    }

    rig.controller.handle_key(EXIT, false).unwrap();
    rig.press(8);
    assert_eq!(rig.controller.state().mode, UiMode::Home);
    assert_eq!(rig.last_style(EXIT).action, Action::Exit);
}

#[test]
fn test_confirm_exit_tears_down() {
    let mut rig = rig(15, None);
    rig.controller.start(30).unwrap();
    rig.press(EXIT);

    let flow = rig.controller.handle_key(6, true).unwrap();
    assert_eq!(flow, Flow::Shutdown(SessionOutcome::Exit));

    let log = rig.deck.lock();
    assert!(log.closed);
    assert_eq!(log.resets, 2);
}

#[test]
fn test_confirm_restart_tears_down() {
    let mut rig = rig(15, None);
    rig.press(EXIT);
    let flow = rig.controller.handle_key(2, true).unwrap();
    assert_eq!(flow, Flow::Shutdown(SessionOutcome::Restart));
    assert!(rig.deck.lock().closed);
}

#[test]
fn test_toggle_repaints_only_its_key() {
    let mut rig = rig(15, None);
    rig.controller.start(30).unwrap();
    let before = rig.last_style(TOGGLE).icon;
    assert_eq!(before, Some(IconRef::deck("music-music-play")));
    rig.clear();

    rig.controller.handle_key(TOGGLE, true).unwrap();
    assert_eq!(rig.uploads(), vec![TOGGLE, TOGGLE]);
    assert!(rig.controller.state().flags.running);
    assert_eq!(
        rig.last_style(TOGGLE).icon,
        Some(IconRef::deck("music-music-pause"))
    );

    rig.controller.handle_key(TOGGLE, false).unwrap();
    rig.press(TOGGLE);
    assert!(!rig.controller.state().flags.running);
    assert_eq!(rig.last_style(TOGGLE).icon, before);
}

#[test]
fn test_transport_keys_drive_zone() {
    let zone = FakeZone::new(TransportState::Paused);
    let calls = Arc::clone(&zone.calls);
    let volume = Arc::clone(&zone.volume);
    let mut rig = rig(15, Some(zone));
    open_zone_item(&mut rig);

    rig.press(8);
    rig.press(6);
    rig.press(2);
    assert_eq!(*volume.lock(), 52);
    rig.press(12);
    rig.press(12);
    assert_eq!(*volume.lock(), 48);

    assert_eq!(
        *calls.lock(),
        vec!["next", "previous", "set_volume", "set_volume", "set_volume"]
    );
}

#[test]
fn test_transport_keys_hidden_on_other_items() {
    let zone = FakeZone::new(TransportState::Paused);
    let calls = Arc::clone(&zone.calls);
    let mut rig = rig(15, Some(zone));
    rig.press(SELECT);
    assert_eq!(rig.controller.state().mode, UiMode::ItemSelect("home".into()));

    rig.press(7);
    rig.press(8);
    assert!(calls.lock().is_empty());
    assert_eq!(rig.last_style(7).action, Action::Empty);
}

#[test]
fn test_play_waits_for_playing_then_repaints() {
    let zone = FakeZone::new(TransportState::Stopped);
    let calls = Arc::clone(&zone.calls);
    let state = Arc::clone(&zone.state);
    let mut rig = rig(15, Some(zone));
    open_zone_item(&mut rig);
    assert_eq!(rig.last_style(7).icon, Some(IconRef::deck("music-music-play")));
    rig.clear();

    rig.controller.handle_key(7, true).unwrap();
    assert_eq!(*calls.lock(), vec!["play"]);
    assert_eq!(*state.lock(), TransportState::Playing);
    assert_eq!(rig.uploads(), vec![7, 7]);
    assert_eq!(rig.last_style(7).icon, Some(IconRef::deck("music-music-pause")));

    // the post-play tile is the released one
    rig.controller.handle_key(7, false).unwrap();
    let styles = rig.styles.lock();
    assert_eq!(styles.len(), 3);
    assert_eq!(styles[1], styles[2]);
}

#[test]
fn test_play_pause_pauses_when_playing() {
    let zone = FakeZone::new(TransportState::Playing);
    let calls = Arc::clone(&zone.calls);
    let mut rig = rig(15, Some(zone));
    open_zone_item(&mut rig);
    rig.clear();

    rig.controller.handle_key(7, true).unwrap();
    assert_eq!(*calls.lock(), vec!["pause"]);
    assert_eq!(rig.uploads(), vec![7]);

    rig.controller.handle_key(7, false).unwrap();
    assert_eq!(rig.last_style(7).icon, Some(IconRef::deck("music-music-play")));
}

#[test]
fn test_unreachable_zone_keeps_transport_keys_empty() {
    let mut rig = rig(15, None);
    open_zone_item(&mut rig);
    for key in [2, 6, 7, 8, 12] {
        rig.press(key);
        assert_eq!(rig.last_style(key).action, Action::Empty, "key {key}");
    }
    assert_eq!(rig.controller.state().mode, UiMode::ItemSelect("sonos".into()));
}

#[test]
fn test_out_of_range_key_ignored() {
    let mut rig = rig(6, None);
    let flow = rig.controller.handle_key(9, true).unwrap();
    assert_eq!(flow, Flow::Continue);
    assert!(rig.uploads().is_empty());
}

#[test]
fn test_small_deck_exit_on_last_key() {
    let mut rig = rig(6, None);
    rig.controller.start(30).unwrap();
    assert_eq!(rig.uploads(), (0..6).collect::<Vec<u8>>());
    assert_eq!(rig.last_style(5).action, Action::Exit);

    rig.press(5);
    assert_eq!(rig.controller.state().mode, UiMode::ExitConfirm);
}

#[test]
fn test_upload_failure_is_error() {
    let mut deck = FakeDeck::new(15);
    deck.fail_uploads = true;
    let mut rig = rig_with(deck, None);
    assert!(rig.controller.handle_key(NEXT, true).is_err());
    assert_eq!(rig.controller.state().items.selected(), 0);
}

#[test]
fn test_missing_assets_fail_start() {
    let dir = tempfile::tempdir().unwrap();
    let deck = FakeDeck::new(15);
    let log = Arc::clone(&deck.log);
    let mut controller = sonos_deck::ViewController::new(
        sonos_deck::hid::shared(deck),
        table(15),
        items(),
        Box::new(GlyphRenderer::new(AssetStore::new(dir.path()), 18.0)),
        None,
        fast_options(),
    );

    let err = controller.start(30).unwrap_err();
    assert!(format!("{:#}", err).contains("Arial.ttf"));
    assert!(log.lock().uploads.is_empty());
}
