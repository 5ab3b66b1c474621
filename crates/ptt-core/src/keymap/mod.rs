//! Key identifiers and cross-platform key code translation.
//!
//! A configured key name such as `"caps_lock"` is parsed once into a
//! [`KeyIdentifier`], which carries the canonical USB HID Usage ID.  The
//! emulator translates that ID to the host's native code through
//! [`KeyMapper::hid_to_native`] right before it touches the OS.

pub mod hid;
pub mod linux_x11;
pub mod macos_cg;
pub mod windows_vk;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use hid::HidKeyCode;

use hid::{DIGITS, FUNCTION_KEYS, LETTERS};

/// Raised when a key name cannot be resolved.
///
/// This is a startup-time condition: the server refuses to run with a key it
/// cannot press.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unknown key identifier '{0}'")]
    UnknownKey(String),

    #[error("key '{0}' has no native code on this platform")]
    UnsupportedOnPlatform(&'static str),
}

/// Named keys and the HID code each resolves to.  The first entry for a code
/// is its canonical name.
const NAMED_KEYS: &[(&str, HidKeyCode)] = &[
    ("caps_lock", HidKeyCode::CapsLock),
    ("scroll_lock", HidKeyCode::ScrollLock),
    ("pause", HidKeyCode::Pause),
    ("insert", HidKeyCode::Insert),
    ("home", HidKeyCode::Home),
    ("end", HidKeyCode::End),
    ("page_up", HidKeyCode::PageUp),
    ("page_down", HidKeyCode::PageDown),
    ("space", HidKeyCode::Space),
    ("ctrl_l", HidKeyCode::ControlLeft),
    ("ctrl_r", HidKeyCode::ControlRight),
    ("alt_l", HidKeyCode::AltLeft),
    ("alt_r", HidKeyCode::AltRight),
    ("shift_l", HidKeyCode::ShiftLeft),
    ("shift_r", HidKeyCode::ShiftRight),
    ("ctrl", HidKeyCode::ControlLeft),
    ("alt", HidKeyCode::AltLeft),
    ("shift", HidKeyCode::ShiftLeft),
];

const FUNCTION_KEY_NAMES: [&str; 20] = [
    "f1", "f2", "f3", "f4", "f5", "f6", "f7", "f8", "f9", "f10", "f11", "f12", "f13", "f14",
    "f15", "f16", "f17", "f18", "f19", "f20",
];

const LETTER_NAMES: [&str; 26] = [
    "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r",
    "s", "t", "u", "v", "w", "x", "y", "z",
];

const DIGIT_NAMES: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// The single key the server holds down while push-to-talk is on.
///
/// # Example
///
/// ```rust
/// use ptt_core::{HidKeyCode, KeyIdentifier};
///
/// let key: KeyIdentifier = " Caps Lock ".parse().unwrap();
/// assert_eq!(key.hid(), HidKeyCode::CapsLock);
/// assert_eq!(key.name(), "caps_lock");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyIdentifier {
    hid: HidKeyCode,
}

impl KeyIdentifier {
    /// Wraps a HID code directly.
    pub fn from_hid(hid: HidKeyCode) -> Self {
        Self { hid }
    }

    /// Resolves a configuration key name.
    ///
    /// Matching ignores case and surrounding whitespace, and treats spaces
    /// and hyphens as underscores.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownKey`] if the name is not recognised.
    pub fn parse(name: &str) -> Result<Self, ConfigurationError> {
        let normalized: String = name
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        if let Some(&(_, hid)) = NAMED_KEYS.iter().find(|(n, _)| *n == normalized) {
            return Ok(Self { hid });
        }
        if let Some(i) = FUNCTION_KEY_NAMES.iter().position(|n| *n == normalized) {
            return Ok(Self { hid: FUNCTION_KEYS[i] });
        }

        let mut chars = normalized.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_lowercase() {
                return Ok(Self { hid: LETTERS[(c as u8 - b'a') as usize] });
            }
            if c.is_ascii_digit() {
                return Ok(Self { hid: DIGITS[(c as u8 - b'0') as usize] });
            }
        }

        Err(ConfigurationError::UnknownKey(name.to_string()))
    }

    /// The canonical HID code for this key.
    pub fn hid(self) -> HidKeyCode {
        self.hid
    }

    /// The canonical configuration name, e.g. `"caps_lock"` or `"f13"`.
    pub fn name(self) -> &'static str {
        if let Some(&(name, _)) = NAMED_KEYS.iter().find(|(_, h)| *h == self.hid) {
            return name;
        }
        if let Some(i) = FUNCTION_KEYS.iter().position(|h| *h == self.hid) {
            return FUNCTION_KEY_NAMES[i];
        }
        if let Some(i) = LETTERS.iter().position(|h| *h == self.hid) {
            return LETTER_NAMES[i];
        }
        if let Some(i) = DIGITS.iter().position(|h| *h == self.hid) {
            return DIGIT_NAMES[i];
        }
        // Every HidKeyCode variant appears in one of the tables above.
        "unknown"
    }

    /// Resolves the native code for the host platform.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnsupportedOnPlatform`] when the host has
    /// no equivalent key.
    pub fn native_code(self) -> Result<u32, ConfigurationError> {
        KeyMapper::hid_to_native(self.hid)
            .ok_or(ConfigurationError::UnsupportedOnPlatform(self.name()))
    }

    /// Every name [`KeyIdentifier::parse`] accepts as a canonical spelling,
    /// for help text and the setup wizard.
    pub fn supported_names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = NAMED_KEYS
            .iter()
            .map(|(n, _)| *n)
            .filter(|n| !matches!(*n, "ctrl" | "alt" | "shift"))
            .collect();
        names.extend(FUNCTION_KEY_NAMES);
        names.push("a-z");
        names.push("0-9");
        names
    }
}

impl Default for KeyIdentifier {
    fn default() -> Self {
        Self { hid: HidKeyCode::CapsLock }
    }
}

impl FromStr for KeyIdentifier {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unified key mapper over the per-platform tables.
pub struct KeyMapper;

impl KeyMapper {
    /// Translates a [`HidKeyCode`] to a Windows Virtual Key code.
    pub fn hid_to_windows_vk(hid: HidKeyCode) -> Option<u8> {
        windows_vk::hid_to_vk(hid)
    }

    /// Translates a [`HidKeyCode`] to an X11 KeySym value.
    pub fn hid_to_x11_keysym(hid: HidKeyCode) -> Option<u32> {
        linux_x11::hid_to_keysym(hid)
    }

    /// Translates a [`HidKeyCode`] to a macOS `CGKeyCode` value.
    pub fn hid_to_macos_cgkeycode(hid: HidKeyCode) -> Option<u16> {
        macos_cg::hid_to_cgkeycode(hid)
    }

    /// Translates a [`HidKeyCode`] to the native code of the platform this
    /// binary was compiled for.
    ///
    /// Returns `None` on platforms without a table.
    pub fn hid_to_native(hid: HidKeyCode) -> Option<u32> {
        #[cfg(target_os = "windows")]
        {
            Self::hid_to_windows_vk(hid).map(u32::from)
        }
        #[cfg(target_os = "macos")]
        {
            Self::hid_to_macos_cgkeycode(hid).map(u32::from)
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            Self::hid_to_x11_keysym(hid)
        }
        #[cfg(not(any(unix, target_os = "windows")))]
        {
            let _ = hid;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        let cases: &[(&str, HidKeyCode)] = &[
            ("caps_lock", HidKeyCode::CapsLock),
            ("scroll_lock", HidKeyCode::ScrollLock),
            ("pause", HidKeyCode::Pause),
            ("insert", HidKeyCode::Insert),
            ("page_down", HidKeyCode::PageDown),
            ("f1", HidKeyCode::F1),
            ("f12", HidKeyCode::F12),
            ("f13", HidKeyCode::F13),
            ("f20", HidKeyCode::F20),
            ("ctrl_r", HidKeyCode::ControlRight),
        ];
        for &(name, hid) in cases {
            assert_eq!(KeyIdentifier::parse(name).map(KeyIdentifier::hid), Ok(hid), "{name}");
        }
    }

    #[test]
    fn test_parse_is_case_and_whitespace_insensitive() {
        // Arrange
        let spellings = ["CAPS_LOCK", "  caps_lock\n", "Caps Lock", "caps-lock"];

        // Act / Assert
        for s in spellings {
            assert_eq!(
                KeyIdentifier::parse(s),
                Ok(KeyIdentifier::from_hid(HidKeyCode::CapsLock)),
                "{s:?}"
            );
        }
    }

    #[test]
    fn test_parse_single_letters_and_digits() {
        assert_eq!(KeyIdentifier::parse("a").map(|k| k.hid()), Ok(HidKeyCode::KeyA));
        assert_eq!(KeyIdentifier::parse("Z").map(|k| k.hid()), Ok(HidKeyCode::KeyZ));
        assert_eq!(KeyIdentifier::parse("0").map(|k| k.hid()), Ok(HidKeyCode::Digit0));
        assert_eq!(KeyIdentifier::parse("7").map(|k| k.hid()), Ok(HidKeyCode::Digit7));
    }

    #[test]
    fn test_modifier_aliases_resolve_to_left_side() {
        assert_eq!(KeyIdentifier::parse("ctrl").map(|k| k.hid()), Ok(HidKeyCode::ControlLeft));
        assert_eq!(KeyIdentifier::parse("alt").map(|k| k.hid()), Ok(HidKeyCode::AltLeft));
        assert_eq!(KeyIdentifier::parse("shift").map(|k| k.hid()), Ok(HidKeyCode::ShiftLeft));
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        for s in ["", "f0", "f21", "capslock_", "ab", "!", "num_lock"] {
            assert_eq!(
                KeyIdentifier::parse(s),
                Err(ConfigurationError::UnknownKey(s.to_string())),
                "{s:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_name_round_trips_through_parse() {
        for hid in LETTERS.iter().chain(DIGITS.iter()).chain(FUNCTION_KEYS.iter()) {
            let key = KeyIdentifier::from_hid(*hid);
            assert_eq!(KeyIdentifier::parse(key.name()), Ok(key));
        }
    }

    #[test]
    fn test_alias_displays_canonical_name() {
        let key: KeyIdentifier = "ctrl".parse().unwrap();
        assert_eq!(key.to_string(), "ctrl_l");
    }

    #[test]
    fn test_supported_names_parse() {
        for name in KeyIdentifier::supported_names() {
            if name.contains('-') {
                continue;
            }
            assert!(KeyIdentifier::parse(name).is_ok(), "{name} should parse");
        }
    }

    #[test]
    fn test_default_key_is_caps_lock() {
        assert_eq!(KeyIdentifier::default().name(), "caps_lock");
    }

    #[cfg(any(unix, target_os = "windows"))]
    #[test]
    fn test_native_code_available_for_caps_lock() {
        assert!(KeyIdentifier::default().native_code().is_ok());
    }
}
