//! JSON message types for the control channel.
//!
//! Browsers and the server exchange small JSON objects as WebSocket text
//! frames.  The two directions use different shapes, so they are modelled as
//! two distinct types: [`ClientCommand`] (browser → server) and
//! [`ServerStatus`] (server → browser).
//!
//! # Wire format
//!
//! | Direction       | Payload                           | Meaning                  |
//! |-----------------|-----------------------------------|--------------------------|
//! | browser→server  | `{"action":"ptt","state":"on"}`   | request key press        |
//! | browser→server  | `{"action":"ptt","state":"off"}`  | request key release      |
//! | server→browser  | `{"status":"connected"}`          | sent once on connect     |
//! | server→browser  | `{"status":"ptt_on"}`             | key is now down          |
//! | server→browser  | `{"status":"ptt_off"}`            | key is now up            |
//!
//! # Fail-soft parsing
//!
//! A single bad frame from one browser must never disturb the others, so
//! [`parse_client_message`] never returns an error.  It classifies the text
//! as [`Inbound::Valid`] or [`Inbound::Rejected`]; callers drop rejected
//! frames without replying.

use serde::{Deserialize, Serialize};

use crate::domain::ptt::PttCommand;

// ── Browser → Server ──────────────────────────────────────────────────────────

/// All commands a browser can send over the control channel.
///
/// # Serde representation
///
/// ```json
/// {"action":"ptt","state":"on"}
/// ```
///
/// Extra fields are ignored; an unknown `action` or `state` value fails to
/// deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Press or release the shared push-to-talk key.
    Ptt {
        /// Requested key state.
        state: PttRequest,
    },
}

/// The `state` field of a `ptt` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PttRequest {
    On,
    Off,
}

impl From<PttRequest> for PttCommand {
    fn from(request: PttRequest) -> Self {
        match request {
            PttRequest::On => PttCommand::On,
            PttRequest::Off => PttCommand::Off,
        }
    }
}

impl From<PttCommand> for ClientCommand {
    fn from(command: PttCommand) -> Self {
        let state = match command {
            PttCommand::On => PttRequest::On,
            PttCommand::Off => PttRequest::Off,
        };
        ClientCommand::Ptt { state }
    }
}

impl ClientCommand {
    /// Returns the PTT command this frame requests.
    pub fn ptt_command(self) -> PttCommand {
        match self {
            ClientCommand::Ptt { state } => state.into(),
        }
    }
}

// ── Server → Browser ──────────────────────────────────────────────────────────

/// All status frames the server sends to browsers.
///
/// # Serde representation
///
/// ```json
/// {"status":"connected"}
/// {"status":"ptt_on"}
/// {"status":"ptt_off"}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ServerStatus {
    /// Greeting sent once to a browser right after its connection opens.
    Connected,
    /// The shared key is now held down.
    PttOn,
    /// The shared key is now up.
    PttOff,
}

impl ServerStatus {
    /// Serializes the status to its JSON text frame.
    ///
    /// Serialization of these unit variants cannot fail; the fallback only
    /// exists so this never panics.
    pub fn to_json(self) -> String {
        serde_json::to_string(&self).unwrap_or_else(|_| match self {
            ServerStatus::Connected => r#"{"status":"connected"}"#.to_string(),
            ServerStatus::PttOn => r#"{"status":"ptt_on"}"#.to_string(),
            ServerStatus::PttOff => r#"{"status":"ptt_off"}"#.to_string(),
        })
    }

    /// Returns the broadcast that announces a move to `pressed`/released.
    pub fn for_state(pressed: bool) -> Self {
        if pressed {
            ServerStatus::PttOn
        } else {
            ServerStatus::PttOff
        }
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Why an inbound frame was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The text was not valid JSON at all.
    MalformedJson,
    /// Valid JSON, but not a recognised command shape (unknown `action`,
    /// unknown `state`, missing fields, or not an object).
    Unrecognized,
}

/// Outcome of parsing one inbound text frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A well-formed command.
    Valid(PttCommand),
    /// A frame that must be ignored.
    Rejected(RejectReason),
}

/// Classifies one text frame received from a browser.
///
/// Never fails: malformed or unrecognised payloads come back as
/// [`Inbound::Rejected`] so the caller can drop them and keep the connection.
///
/// # Example
///
/// ```rust
/// use ptt_core::{parse_client_message, Inbound, PttCommand, RejectReason};
///
/// assert_eq!(
///     parse_client_message(r#"{"action":"ptt","state":"on"}"#),
///     Inbound::Valid(PttCommand::On)
/// );
/// assert_eq!(
///     parse_client_message(r#"{"foo":"bar"}"#),
///     Inbound::Rejected(RejectReason::Unrecognized)
/// );
/// ```
pub fn parse_client_message(text: &str) -> Inbound {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => return Inbound::Rejected(RejectReason::MalformedJson),
    };
    match serde_json::from_value::<ClientCommand>(value) {
        Ok(command) => Inbound::Valid(command.ptt_command()),
        Err(_) => Inbound::Rejected(RejectReason::Unrecognized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ptt_on_parses_to_on_command() {
        // Arrange
        let text = r#"{"action":"ptt","state":"on"}"#;

        // Act
        let result = parse_client_message(text);

        // Assert
        assert_eq!(result, Inbound::Valid(PttCommand::On));
    }

    #[test]
    fn test_ptt_off_parses_to_off_command() {
        let result = parse_client_message(r#"{"action":"ptt","state":"off"}"#);
        assert_eq!(result, Inbound::Valid(PttCommand::Off));
    }

    #[test]
    fn test_field_order_does_not_matter() {
        let result = parse_client_message(r#"{"state":"on","action":"ptt"}"#);
        assert_eq!(result, Inbound::Valid(PttCommand::On));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let result = parse_client_message(r#"{"action":"ptt","state":"off","client":"ipad"}"#);
        assert_eq!(result, Inbound::Valid(PttCommand::Off));
    }

    #[test]
    fn test_unknown_state_value_is_rejected() {
        let result = parse_client_message(r#"{"action":"ptt","state":"sideways"}"#);
        assert_eq!(result, Inbound::Rejected(RejectReason::Unrecognized));
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let result = parse_client_message(r#"{"action":"mute","state":"on"}"#);
        assert_eq!(result, Inbound::Rejected(RejectReason::Unrecognized));
    }

    #[test]
    fn test_object_without_action_is_rejected() {
        let result = parse_client_message(r#"{"foo":"bar"}"#);
        assert_eq!(result, Inbound::Rejected(RejectReason::Unrecognized));
    }

    #[test]
    fn test_missing_state_is_rejected() {
        let result = parse_client_message(r#"{"action":"ptt"}"#);
        assert_eq!(result, Inbound::Rejected(RejectReason::Unrecognized));
    }

    #[test]
    fn test_state_is_case_sensitive() {
        let result = parse_client_message(r#"{"action":"ptt","state":"ON"}"#);
        assert_eq!(result, Inbound::Rejected(RejectReason::Unrecognized));
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        for text in ["[]", "42", "\"ptt\"", "null"] {
            assert_eq!(
                parse_client_message(text),
                Inbound::Rejected(RejectReason::Unrecognized),
                "{text} should be rejected as unrecognized"
            );
        }
    }

    #[test]
    fn test_invalid_json_is_rejected_as_malformed() {
        for text in ["", "{", "not json", r#"{"action":"ptt","state":}"#] {
            assert_eq!(
                parse_client_message(text),
                Inbound::Rejected(RejectReason::MalformedJson),
                "{text:?} should be rejected as malformed"
            );
        }
    }

    #[test]
    fn test_status_frames_serialize_to_wire_format() {
        assert_eq!(ServerStatus::Connected.to_json(), r#"{"status":"connected"}"#);
        assert_eq!(ServerStatus::PttOn.to_json(), r#"{"status":"ptt_on"}"#);
        assert_eq!(ServerStatus::PttOff.to_json(), r#"{"status":"ptt_off"}"#);
    }

    #[test]
    fn test_for_state_picks_matching_broadcast() {
        assert_eq!(ServerStatus::for_state(true), ServerStatus::PttOn);
        assert_eq!(ServerStatus::for_state(false), ServerStatus::PttOff);
    }

    #[test]
    fn test_client_command_serializes_to_wire_format() {
        // The browser script builds these frames by hand; keep the Rust side
        // in agreement with it.
        let json = serde_json::to_string(&ClientCommand::from(PttCommand::On)).unwrap();
        assert_eq!(json, r#"{"action":"ptt","state":"on"}"#);
    }
}
