//! HID Usage ID to macOS CGKeyCode translation table.
//!
//! CGKeyCode values are defined in Carbon Events.h (HIToolbox framework).
//! Reference: /System/Library/Frameworks/Carbon.framework/Versions/A/Frameworks/HIToolbox.framework/Headers/Events.h
//!
//! Apple keyboards have no Scroll Lock, Pause or Insert key.  The
//! conventional stand-ins are used instead (F14, F15 and Help), matching what
//! macOS itself reports when a PC keyboard is attached.

use super::hid::HidKeyCode;

/// Translates a [`HidKeyCode`] to a macOS `CGKeyCode` value.
///
/// Returns `None` if the HID code has no macOS CGKeyCode equivalent.
///
/// # Panics
///
/// This function never panics.
pub fn hid_to_cgkeycode(hid: HidKeyCode) -> Option<u16> {
    let code = match hid {
        // Letters (macOS uses ANSI key position codes, not ASCII)
        HidKeyCode::KeyA => 0x00, // kVK_ANSI_A
        HidKeyCode::KeyB => 0x0B, // kVK_ANSI_B
        HidKeyCode::KeyC => 0x08, // kVK_ANSI_C
        HidKeyCode::KeyD => 0x02, // kVK_ANSI_D
        HidKeyCode::KeyE => 0x0E, // kVK_ANSI_E
        HidKeyCode::KeyF => 0x03, // kVK_ANSI_F
        HidKeyCode::KeyG => 0x05, // kVK_ANSI_G
        HidKeyCode::KeyH => 0x04, // kVK_ANSI_H
        HidKeyCode::KeyI => 0x22, // kVK_ANSI_I
        HidKeyCode::KeyJ => 0x26, // kVK_ANSI_J
        HidKeyCode::KeyK => 0x28, // kVK_ANSI_K
        HidKeyCode::KeyL => 0x25, // kVK_ANSI_L
        HidKeyCode::KeyM => 0x2E, // kVK_ANSI_M
        HidKeyCode::KeyN => 0x2D, // kVK_ANSI_N
        HidKeyCode::KeyO => 0x1F, // kVK_ANSI_O
        HidKeyCode::KeyP => 0x23, // kVK_ANSI_P
        HidKeyCode::KeyQ => 0x0C, // kVK_ANSI_Q
        HidKeyCode::KeyR => 0x0F, // kVK_ANSI_R
        HidKeyCode::KeyS => 0x01, // kVK_ANSI_S
        HidKeyCode::KeyT => 0x11, // kVK_ANSI_T
        HidKeyCode::KeyU => 0x20, // kVK_ANSI_U
        HidKeyCode::KeyV => 0x09, // kVK_ANSI_V
        HidKeyCode::KeyW => 0x0D, // kVK_ANSI_W
        HidKeyCode::KeyX => 0x07, // kVK_ANSI_X
        HidKeyCode::KeyY => 0x10, // kVK_ANSI_Y
        HidKeyCode::KeyZ => 0x06, // kVK_ANSI_Z

        // Digits
        HidKeyCode::Digit0 => 0x1D, // kVK_ANSI_0
        HidKeyCode::Digit1 => 0x12, // kVK_ANSI_1
        HidKeyCode::Digit2 => 0x13, // kVK_ANSI_2
        HidKeyCode::Digit3 => 0x14, // kVK_ANSI_3
        HidKeyCode::Digit4 => 0x15, // kVK_ANSI_4
        HidKeyCode::Digit5 => 0x17, // kVK_ANSI_5
        HidKeyCode::Digit6 => 0x16, // kVK_ANSI_6
        HidKeyCode::Digit7 => 0x1A, // kVK_ANSI_7
        HidKeyCode::Digit8 => 0x1C, // kVK_ANSI_8
        HidKeyCode::Digit9 => 0x19, // kVK_ANSI_9

        HidKeyCode::Space => 0x31,      // kVK_Space
        HidKeyCode::CapsLock => 0x39,   // kVK_CapsLock
        HidKeyCode::ScrollLock => 0x6B, // kVK_F14
        HidKeyCode::Pause => 0x71,      // kVK_F15
        HidKeyCode::Insert => 0x72,     // kVK_Help
        HidKeyCode::Home => 0x73,       // kVK_Home
        HidKeyCode::PageUp => 0x74,     // kVK_PageUp
        HidKeyCode::End => 0x77,        // kVK_End
        HidKeyCode::PageDown => 0x79,   // kVK_PageDown

        // Function keys
        HidKeyCode::F1 => 0x7A,  // kVK_F1
        HidKeyCode::F2 => 0x78,  // kVK_F2
        HidKeyCode::F3 => 0x63,  // kVK_F3
        HidKeyCode::F4 => 0x76,  // kVK_F4
        HidKeyCode::F5 => 0x60,  // kVK_F5
        HidKeyCode::F6 => 0x61,  // kVK_F6
        HidKeyCode::F7 => 0x62,  // kVK_F7
        HidKeyCode::F8 => 0x64,  // kVK_F8
        HidKeyCode::F9 => 0x65,  // kVK_F9
        HidKeyCode::F10 => 0x6D, // kVK_F10
        HidKeyCode::F11 => 0x67, // kVK_F11
        HidKeyCode::F12 => 0x6F, // kVK_F12
        HidKeyCode::F13 => 0x69, // kVK_F13
        HidKeyCode::F14 => 0x6B, // kVK_F14
        HidKeyCode::F15 => 0x71, // kVK_F15
        HidKeyCode::F16 => 0x6A, // kVK_F16
        HidKeyCode::F17 => 0x40, // kVK_F17
        HidKeyCode::F18 => 0x4F, // kVK_F18
        HidKeyCode::F19 => 0x50, // kVK_F19
        HidKeyCode::F20 => 0x5A, // kVK_F20

        // Modifiers
        HidKeyCode::ControlLeft => 0x3B,  // kVK_Control
        HidKeyCode::ControlRight => 0x3E, // kVK_RightControl
        HidKeyCode::ShiftLeft => 0x38,    // kVK_Shift
        HidKeyCode::ShiftRight => 0x3C,   // kVK_RightShift
        HidKeyCode::AltLeft => 0x3A,      // kVK_Option
        HidKeyCode::AltRight => 0x3D,     // kVK_RightOption
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::hid::{DIGITS, FUNCTION_KEYS, LETTERS};

    #[test]
    fn test_all_ptt_keys_have_a_cgkeycode() {
        for &key in LETTERS.iter().chain(DIGITS.iter()).chain(FUNCTION_KEYS.iter()) {
            assert!(hid_to_cgkeycode(key).is_some(), "{key:?} should map");
        }
    }

    #[test]
    fn test_caps_lock_maps_to_kvk_caps_lock() {
        assert_eq!(hid_to_cgkeycode(HidKeyCode::CapsLock), Some(0x39));
    }

    #[test]
    fn test_scroll_lock_shares_code_with_f14() {
        assert_eq!(
            hid_to_cgkeycode(HidKeyCode::ScrollLock),
            hid_to_cgkeycode(HidKeyCode::F14)
        );
    }

    #[test]
    fn test_letter_a_is_zero() {
        assert_eq!(hid_to_cgkeycode(HidKeyCode::KeyA), Some(0x00));
    }
}
