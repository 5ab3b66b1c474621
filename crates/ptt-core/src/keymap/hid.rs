//! USB HID Usage IDs (page 0x07, Keyboard/Keypad page).
//!
//! This is the canonical cross-platform key representation.  A configured
//! key name is resolved to one of these codes once at startup, and the code
//! is translated to the native code of the host platform at the emulation
//! boundary.
//!
//! Reference: USB HID Usage Tables 1.3, Section 10 (Keyboard/Keypad page 0x07).
//!
//! Only keys that make sense as a push-to-talk key are listed: letters,
//! digits, the lock/navigation cluster, F1–F20 and the modifiers.

/// USB HID Usage ID for keyboard keys (page 0x07).
///
/// The numeric value of each variant is its HID Usage ID on the keyboard/keypad page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum HidKeyCode {
    // Letters (HID 0x04–0x1D)
    KeyA = 0x04,
    KeyB = 0x05,
    KeyC = 0x06,
    KeyD = 0x07,
    KeyE = 0x08,
    KeyF = 0x09,
    KeyG = 0x0A,
    KeyH = 0x0B,
    KeyI = 0x0C,
    KeyJ = 0x0D,
    KeyK = 0x0E,
    KeyL = 0x0F,
    KeyM = 0x10,
    KeyN = 0x11,
    KeyO = 0x12,
    KeyP = 0x13,
    KeyQ = 0x14,
    KeyR = 0x15,
    KeyS = 0x16,
    KeyT = 0x17,
    KeyU = 0x18,
    KeyV = 0x19,
    KeyW = 0x1A,
    KeyX = 0x1B,
    KeyY = 0x1C,
    KeyZ = 0x1D,

    // Digits (HID 0x1E–0x27)
    Digit1 = 0x1E,
    Digit2 = 0x1F,
    Digit3 = 0x20,
    Digit4 = 0x21,
    Digit5 = 0x22,
    Digit6 = 0x23,
    Digit7 = 0x24,
    Digit8 = 0x25,
    Digit9 = 0x26,
    Digit0 = 0x27,

    Space = 0x2C,

    // Lock keys
    CapsLock = 0x39,

    // Function keys (HID 0x3A–0x45)
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,

    // Navigation cluster (HID 0x47–0x4E)
    ScrollLock = 0x47,
    Pause = 0x48,
    Insert = 0x49,
    Home = 0x4A,
    PageUp = 0x4B,
    End = 0x4D,
    PageDown = 0x4E,

    // Extended function keys (HID 0x68–0x6F)
    F13 = 0x68,
    F14 = 0x69,
    F15 = 0x6A,
    F16 = 0x6B,
    F17 = 0x6C,
    F18 = 0x6D,
    F19 = 0x6E,
    F20 = 0x6F,

    // Modifier keys (HID 0xE0–0xE6)
    ControlLeft = 0xE0,
    ShiftLeft = 0xE1,
    AltLeft = 0xE2,
    ControlRight = 0xE4,
    ShiftRight = 0xE5,
    AltRight = 0xE6,
}

/// Letters in HID order, so `LETTERS[i]` has usage id `0x04 + i`.
pub(crate) const LETTERS: [HidKeyCode; 26] = {
    use HidKeyCode::*;
    [
        KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI, KeyJ, KeyK, KeyL, KeyM, KeyN,
        KeyO, KeyP, KeyQ, KeyR, KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,
    ]
};

/// Digits indexed by their numeric value (`DIGITS[0]` is the `0` key).
pub(crate) const DIGITS: [HidKeyCode; 10] = {
    use HidKeyCode::*;
    [
        Digit0, Digit1, Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8, Digit9,
    ]
};

/// Function keys indexed by number minus one (`FUNCTION_KEYS[0]` is F1).
pub(crate) const FUNCTION_KEYS: [HidKeyCode; 20] = {
    use HidKeyCode::*;
    [
        F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12, F13, F14, F15, F16, F17, F18, F19,
        F20,
    ]
};

impl HidKeyCode {
    /// Returns the raw USB HID Usage ID value for this key code.
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns `true` if this is a modifier key.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            HidKeyCode::ControlLeft
                | HidKeyCode::ControlRight
                | HidKeyCode::ShiftLeft
                | HidKeyCode::ShiftRight
                | HidKeyCode::AltLeft
                | HidKeyCode::AltRight
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_have_consecutive_usage_ids() {
        for (i, letter) in LETTERS.iter().enumerate() {
            let expected = 0x04u16 + i as u16;
            assert_eq!(
                letter.as_u16(),
                expected,
                "{letter:?} should have HID code 0x{expected:04X}"
            );
        }
    }

    #[test]
    fn test_digits_follow_keyboard_row_order() {
        // The HID digit row starts at 1 and ends at 0.
        assert_eq!(DIGITS[1].as_u16(), 0x1E);
        assert_eq!(DIGITS[9].as_u16(), 0x26);
        assert_eq!(DIGITS[0].as_u16(), 0x27);
    }

    #[test]
    fn test_function_keys_span_both_hid_ranges() {
        assert_eq!(FUNCTION_KEYS[0].as_u16(), 0x3A);
        assert_eq!(FUNCTION_KEYS[11].as_u16(), 0x45);
        assert_eq!(FUNCTION_KEYS[12].as_u16(), 0x68);
        assert_eq!(FUNCTION_KEYS[19].as_u16(), 0x6F);
    }

    #[test]
    fn test_lock_keys_have_standard_usage_ids() {
        assert_eq!(HidKeyCode::CapsLock.as_u16(), 0x39);
        assert_eq!(HidKeyCode::ScrollLock.as_u16(), 0x47);
        assert_eq!(HidKeyCode::Pause.as_u16(), 0x48);
    }

    #[test]
    fn test_modifier_keys_are_identified_correctly() {
        let modifiers = [
            HidKeyCode::ControlLeft,
            HidKeyCode::ControlRight,
            HidKeyCode::ShiftLeft,
            HidKeyCode::ShiftRight,
            HidKeyCode::AltLeft,
            HidKeyCode::AltRight,
        ];
        for m in modifiers {
            assert!(m.is_modifier(), "{m:?} should be a modifier key");
        }
    }

    #[test]
    fn test_non_modifier_keys_are_not_identified_as_modifiers() {
        for k in [HidKeyCode::KeyA, HidKeyCode::CapsLock, HidKeyCode::F13, HidKeyCode::Space] {
            assert!(!k.is_modifier(), "{k:?} should NOT be a modifier key");
        }
    }
}
