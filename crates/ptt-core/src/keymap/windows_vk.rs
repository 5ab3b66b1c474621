//! USB HID Usage ID to Windows Virtual Key (VK) code translation.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h) and USB HID Usage Tables 1.3.
//!
//! Windows assigns each keyboard key a number called a "Virtual Key code",
//! named `VK_*` in `<winuser.h>` (e.g. `VK_CAPITAL = 0x14`).  `SendInput`
//! accepts these codes directly, so this table is all the Windows emulator
//! needs to turn a configured key into a key-down/key-up event.

use super::hid::HidKeyCode;

/// Translates a HID Usage ID to a Windows Virtual Key code.
///
/// Returns `None` for HID codes with no VK equivalent.
///
/// # Panics
///
/// This function never panics.
pub fn hid_to_vk(hid: HidKeyCode) -> Option<u8> {
    use HidKeyCode::*;
    let vk = match hid {
        // Letters and digits share their ASCII upper-case values.
        KeyA => 0x41,
        KeyB => 0x42,
        KeyC => 0x43,
        KeyD => 0x44,
        KeyE => 0x45,
        KeyF => 0x46,
        KeyG => 0x47,
        KeyH => 0x48,
        KeyI => 0x49,
        KeyJ => 0x4A,
        KeyK => 0x4B,
        KeyL => 0x4C,
        KeyM => 0x4D,
        KeyN => 0x4E,
        KeyO => 0x4F,
        KeyP => 0x50,
        KeyQ => 0x51,
        KeyR => 0x52,
        KeyS => 0x53,
        KeyT => 0x54,
        KeyU => 0x55,
        KeyV => 0x56,
        KeyW => 0x57,
        KeyX => 0x58,
        KeyY => 0x59,
        KeyZ => 0x5A,
        Digit0 => 0x30,
        Digit1 => 0x31,
        Digit2 => 0x32,
        Digit3 => 0x33,
        Digit4 => 0x34,
        Digit5 => 0x35,
        Digit6 => 0x36,
        Digit7 => 0x37,
        Digit8 => 0x38,
        Digit9 => 0x39,

        // ── Control keys ─────────────────────────────────────────────────────
        Space => 0x20,      // VK_SPACE
        CapsLock => 0x14,   // VK_CAPITAL
        ScrollLock => 0x91, // VK_SCROLL
        Pause => 0x13,      // VK_PAUSE
        Insert => 0x2D,     // VK_INSERT
        Home => 0x24,       // VK_HOME
        PageUp => 0x21,     // VK_PRIOR
        End => 0x23,        // VK_END
        PageDown => 0x22,   // VK_NEXT

        // ── Function keys (VK_F1=0x70 … VK_F20=0x83) ──────────────────────────
        F1 => 0x70,
        F2 => 0x71,
        F3 => 0x72,
        F4 => 0x73,
        F5 => 0x74,
        F6 => 0x75,
        F7 => 0x76,
        F8 => 0x77,
        F9 => 0x78,
        F10 => 0x79,
        F11 => 0x7A,
        F12 => 0x7B,
        F13 => 0x7C,
        F14 => 0x7D,
        F15 => 0x7E,
        F16 => 0x7F,
        F17 => 0x80,
        F18 => 0x81,
        F19 => 0x82,
        F20 => 0x83,

        // ── Modifier keys ────────────────────────────────────────────────────
        ControlLeft => 0xA2,  // VK_LCONTROL
        ControlRight => 0xA3, // VK_RCONTROL
        ShiftLeft => 0xA0,    // VK_LSHIFT
        ShiftRight => 0xA1,   // VK_RSHIFT
        AltLeft => 0xA4,      // VK_LMENU
        AltRight => 0xA5,     // VK_RMENU
    };
    Some(vk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::hid::{DIGITS, FUNCTION_KEYS, LETTERS};
    use HidKeyCode::*;

    #[test]
    fn test_ptt_candidates_map_to_documented_vk_codes() {
        let expected: &[(HidKeyCode, u8)] = &[
            (CapsLock, 0x14),
            (ScrollLock, 0x91),
            (Pause, 0x13),
            (Insert, 0x2D),
            (F13, 0x7C),
            (Space, 0x20),
        ];
        for &(hid, vk) in expected {
            assert_eq!(hid_to_vk(hid), Some(vk), "hid_to_vk({hid:?})");
        }
    }

    #[test]
    fn test_letters_map_to_ascii_uppercase() {
        for (i, &letter) in LETTERS.iter().enumerate() {
            assert_eq!(hid_to_vk(letter), Some(b'A' + i as u8));
        }
    }

    #[test]
    fn test_digits_map_to_ascii_digits() {
        for (d, &digit) in DIGITS.iter().enumerate() {
            assert_eq!(hid_to_vk(digit), Some(b'0' + d as u8));
        }
    }

    #[test]
    fn test_function_keys_are_contiguous() {
        for (i, &f) in FUNCTION_KEYS.iter().enumerate() {
            assert_eq!(hid_to_vk(f), Some(0x70 + i as u8), "F{}", i + 1);
        }
    }
}
