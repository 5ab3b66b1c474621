//! HID Usage ID to X11 KeySym translation table for Linux hosts.
//!
//! X11 KeySym values are defined in X11/keysymdef.h.
//! Reference: https://gitlab.freedesktop.org/xorg/proto/xorgproto/-/blob/master/include/X11/keysymdef.h
//!
//! # What is an X11 KeySym?
//!
//! X11 identifies keys by *KeySym* (Key Symbol).  Printable keys use their
//! Latin-1 value (`XK_a` = 0x0061); everything else lives in the 0xFFxx
//! block (`XK_Caps_Lock` = 0xFFE5).  The emulator hands the KeySym to the X
//! server, which looks up the keycode currently bound to it.
//!
//! Letters map to their *lowercase* KeySym.  A push-to-talk key is held on
//! its own, so no Shift state is involved.

use super::hid::HidKeyCode;

/// Translates a [`HidKeyCode`] to an X11 KeySym value.
///
/// Returns `None` if the HID code has no X11 KeySym equivalent.
///
/// # Panics
///
/// This function never panics.
pub fn hid_to_keysym(hid: HidKeyCode) -> Option<u32> {
    let keysym = match hid {
        // Letters (X11 lowercase keysyms 0x61-0x7A)
        HidKeyCode::KeyA => 0x0061, // XK_a
        HidKeyCode::KeyB => 0x0062,
        HidKeyCode::KeyC => 0x0063,
        HidKeyCode::KeyD => 0x0064,
        HidKeyCode::KeyE => 0x0065,
        HidKeyCode::KeyF => 0x0066,
        HidKeyCode::KeyG => 0x0067,
        HidKeyCode::KeyH => 0x0068,
        HidKeyCode::KeyI => 0x0069,
        HidKeyCode::KeyJ => 0x006A,
        HidKeyCode::KeyK => 0x006B,
        HidKeyCode::KeyL => 0x006C,
        HidKeyCode::KeyM => 0x006D,
        HidKeyCode::KeyN => 0x006E,
        HidKeyCode::KeyO => 0x006F,
        HidKeyCode::KeyP => 0x0070,
        HidKeyCode::KeyQ => 0x0071,
        HidKeyCode::KeyR => 0x0072,
        HidKeyCode::KeyS => 0x0073,
        HidKeyCode::KeyT => 0x0074,
        HidKeyCode::KeyU => 0x0075,
        HidKeyCode::KeyV => 0x0076,
        HidKeyCode::KeyW => 0x0077,
        HidKeyCode::KeyX => 0x0078,
        HidKeyCode::KeyY => 0x0079,
        HidKeyCode::KeyZ => 0x007A, // XK_z

        // Digits (ASCII 0x30-0x39)
        HidKeyCode::Digit0 => 0x0030,
        HidKeyCode::Digit1 => 0x0031,
        HidKeyCode::Digit2 => 0x0032,
        HidKeyCode::Digit3 => 0x0033,
        HidKeyCode::Digit4 => 0x0034,
        HidKeyCode::Digit5 => 0x0035,
        HidKeyCode::Digit6 => 0x0036,
        HidKeyCode::Digit7 => 0x0037,
        HidKeyCode::Digit8 => 0x0038,
        HidKeyCode::Digit9 => 0x0039,

        HidKeyCode::Space => 0x0020,      // XK_space
        HidKeyCode::CapsLock => 0xFFE5,   // XK_Caps_Lock
        HidKeyCode::ScrollLock => 0xFF14, // XK_Scroll_Lock
        HidKeyCode::Pause => 0xFF13,      // XK_Pause
        HidKeyCode::Insert => 0xFF63,     // XK_Insert
        HidKeyCode::Home => 0xFF50,       // XK_Home
        HidKeyCode::PageUp => 0xFF55,     // XK_Page_Up
        HidKeyCode::End => 0xFF57,        // XK_End
        HidKeyCode::PageDown => 0xFF56,   // XK_Page_Down

        // Function keys (XK_F1 = 0xFFBE … XK_F20 = 0xFFD1)
        HidKeyCode::F1 => 0xFFBE,
        HidKeyCode::F2 => 0xFFBF,
        HidKeyCode::F3 => 0xFFC0,
        HidKeyCode::F4 => 0xFFC1,
        HidKeyCode::F5 => 0xFFC2,
        HidKeyCode::F6 => 0xFFC3,
        HidKeyCode::F7 => 0xFFC4,
        HidKeyCode::F8 => 0xFFC5,
        HidKeyCode::F9 => 0xFFC6,
        HidKeyCode::F10 => 0xFFC7,
        HidKeyCode::F11 => 0xFFC8,
        HidKeyCode::F12 => 0xFFC9,
        HidKeyCode::F13 => 0xFFCA,
        HidKeyCode::F14 => 0xFFCB,
        HidKeyCode::F15 => 0xFFCC,
        HidKeyCode::F16 => 0xFFCD,
        HidKeyCode::F17 => 0xFFCE,
        HidKeyCode::F18 => 0xFFCF,
        HidKeyCode::F19 => 0xFFD0,
        HidKeyCode::F20 => 0xFFD1,

        // Modifiers
        HidKeyCode::ShiftLeft => 0xFFE1,    // XK_Shift_L
        HidKeyCode::ShiftRight => 0xFFE2,   // XK_Shift_R
        HidKeyCode::ControlLeft => 0xFFE3,  // XK_Control_L
        HidKeyCode::ControlRight => 0xFFE4, // XK_Control_R
        HidKeyCode::AltLeft => 0xFFE9,      // XK_Alt_L
        HidKeyCode::AltRight => 0xFFEA,     // XK_Alt_R
    };
    Some(keysym)
}
