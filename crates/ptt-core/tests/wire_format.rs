//! Integration tests for the ptt-core public API.
//!
//! These drive the parser, the state machine, and the status frames together
//! the way the control service does, without any sockets.

use ptt_core::{
    parse_client_message, HidKeyCode, Inbound, KeyIdentifier, PttCommand, PttConfig, PttState,
    RejectReason, ServerStatus,
};

/// Feeds `frames` through the parser and the transition rule, returning the
/// final state and every status frame a connected browser would have seen.
fn replay(frames: &[&str]) -> (PttState, Vec<String>) {
    let mut state = PttState::default();
    let mut broadcasts = Vec::new();
    for frame in frames {
        if let Inbound::Valid(command) = parse_client_message(frame) {
            if let Some(next) = state.transition(command) {
                state = next;
                broadcasts.push(ServerStatus::for_state(state.is_pressed()).to_json());
            }
        }
    }
    (state, broadcasts)
}

#[test]
fn test_press_release_cycle_emits_one_frame_per_transition() {
    // Arrange
    let frames = [
        r#"{"action":"ptt","state":"on"}"#,
        r#"{"action":"ptt","state":"off"}"#,
    ];

    // Act
    let (state, broadcasts) = replay(&frames);

    // Assert
    assert_eq!(state, PttState::Released);
    assert_eq!(broadcasts, vec![r#"{"status":"ptt_on"}"#, r#"{"status":"ptt_off"}"#]);
}

#[test]
fn test_redundant_commands_do_not_emit_frames() {
    let frames = [
        r#"{"action":"ptt","state":"off"}"#,
        r#"{"action":"ptt","state":"on"}"#,
        r#"{"action":"ptt","state":"on"}"#,
        r#"{"action":"ptt","state":"on"}"#,
    ];

    let (state, broadcasts) = replay(&frames);

    assert_eq!(state, PttState::Pressed);
    assert_eq!(broadcasts, vec![r#"{"status":"ptt_on"}"#]);
}

#[test]
fn test_garbage_between_commands_is_ignored() {
    let frames = [
        r#"{"action":"ptt","state":"on"}"#,
        r#"{"action":"ptt","state":"sideways"}"#,
        r#"{"foo":"bar"}"#,
        "not even json",
    ];

    let (state, broadcasts) = replay(&frames);

    assert_eq!(state, PttState::Pressed);
    assert_eq!(broadcasts.len(), 1);
}

#[test]
fn test_rejections_are_classified() {
    assert_eq!(
        parse_client_message("{"),
        Inbound::Rejected(RejectReason::MalformedJson)
    );
    assert_eq!(
        parse_client_message(r#"{"action":"ptt","state":"sideways"}"#),
        Inbound::Rejected(RejectReason::Unrecognized)
    );
}

#[test]
fn test_last_command_wins_across_interleaved_senders() {
    // Two browsers racing: whichever frame is evaluated last decides.
    let (state, broadcasts) = replay(&[
        r#"{"action":"ptt","state":"on"}"#,
        r#"{"action":"ptt","state":"off"}"#,
        r#"{"action":"ptt","state":"on"}"#,
    ]);

    assert_eq!(state, PttState::Pressed);
    assert_eq!(broadcasts.last().map(String::as_str), Some(r#"{"status":"ptt_on"}"#));
    assert_eq!(broadcasts.len(), 3);
}

#[test]
fn test_config_from_wizard_output_resolves_to_key() {
    // Arrange
    let text = r#"{
  "ptt_key": "F13",
  "http_port": 8080,
  "ws_port": 8765
}"#;

    // Act
    let cfg = PttConfig::from_json(text).unwrap();
    let key = cfg.validate().unwrap();

    // Assert
    assert_eq!(key, KeyIdentifier::from_hid(HidKeyCode::F13));
    assert_eq!(key.to_string(), "f13");
}

#[test]
fn test_ptt_command_from_state_is_consistent() {
    assert_eq!(PttState::from(PttCommand::On), PttState::Pressed);
    assert_eq!(PttState::from(PttCommand::Off), PttState::Released);
}
