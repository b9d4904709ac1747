//! Virtual key codes and key-name parsing.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Virtual key codes for keyboard keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Letters
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,

    // Numbers (top row)
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Modifiers
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,
    MetaLeft, // Windows/Command/Super
    MetaRight,

    // Navigation
    Escape,
    Tab,
    CapsLock,
    Space,
    Enter,
    Backspace,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Lock keys
    NumLock,
    ScrollLock,
    PrintScreen,
    Pause,

    // Punctuation and symbols
    Grave,        // ` ~
    Minus,        // - _
    Equal,        // = +
    BracketLeft,  // [ {
    BracketRight, // ] }
    Backslash,    // \ |
    Semicolon,    // ; :
    Quote,        // ' "
    Comma,        // , <
    Period,       // . >
    Slash,        // / ?
    IntlBackslash,

    // Numpad
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
    NumpadAdd,
    NumpadSubtract,
    NumpadMultiply,
    NumpadDivide,
    NumpadDecimal,
    NumpadEnter,

    /// Key with no named variant; carries the raw platform keycode.
    Unknown(u32),
}

const LETTERS: [Key; 26] = [
    Key::KeyA,
    Key::KeyB,
    Key::KeyC,
    Key::KeyD,
    Key::KeyE,
    Key::KeyF,
    Key::KeyG,
    Key::KeyH,
    Key::KeyI,
    Key::KeyJ,
    Key::KeyK,
    Key::KeyL,
    Key::KeyM,
    Key::KeyN,
    Key::KeyO,
    Key::KeyP,
    Key::KeyQ,
    Key::KeyR,
    Key::KeyS,
    Key::KeyT,
    Key::KeyU,
    Key::KeyV,
    Key::KeyW,
    Key::KeyX,
    Key::KeyY,
    Key::KeyZ,
];

const DIGITS: [Key; 10] = [
    Key::Num0,
    Key::Num1,
    Key::Num2,
    Key::Num3,
    Key::Num4,
    Key::Num5,
    Key::Num6,
    Key::Num7,
    Key::Num8,
    Key::Num9,
];

const FUNCTION_KEYS: [Key; 12] = [
    Key::F1,
    Key::F2,
    Key::F3,
    Key::F4,
    Key::F5,
    Key::F6,
    Key::F7,
    Key::F8,
    Key::F9,
    Key::F10,
    Key::F11,
    Key::F12,
];

/// Multi-character names accepted on the command line, lowercase.
const NAMED_KEYS: &[(&str, Key)] = &[
    ("esc", Key::Escape),
    ("escape", Key::Escape),
    ("tab", Key::Tab),
    ("space", Key::Space),
    ("enter", Key::Enter),
    ("return", Key::Enter),
    ("backspace", Key::Backspace),
    ("insert", Key::Insert),
    ("delete", Key::Delete),
    ("del", Key::Delete),
    ("home", Key::Home),
    ("end", Key::End),
    ("page up", Key::PageUp),
    ("pageup", Key::PageUp),
    ("page down", Key::PageDown),
    ("pagedown", Key::PageDown),
    ("up", Key::ArrowUp),
    ("down", Key::ArrowDown),
    ("left", Key::ArrowLeft),
    ("right", Key::ArrowRight),
    ("caps lock", Key::CapsLock),
    ("capslock", Key::CapsLock),
    ("num lock", Key::NumLock),
    ("numlock", Key::NumLock),
    ("scroll lock", Key::ScrollLock),
    ("scrolllock", Key::ScrollLock),
    ("print screen", Key::PrintScreen),
    ("printscreen", Key::PrintScreen),
    ("pause", Key::Pause),
    ("shift", Key::ShiftLeft),
    ("left shift", Key::ShiftLeft),
    ("right shift", Key::ShiftRight),
    ("ctrl", Key::ControlLeft),
    ("left ctrl", Key::ControlLeft),
    ("right ctrl", Key::ControlRight),
    ("alt", Key::AltLeft),
    ("left alt", Key::AltLeft),
    ("right alt", Key::AltRight),
    ("windows", Key::MetaLeft),
    ("super", Key::MetaLeft),
    ("left windows", Key::MetaLeft),
    ("right windows", Key::MetaRight),
];

impl Key {
    fn from_char(c: char) -> Option<Key> {
        let c = c.to_ascii_lowercase();
        match c {
            'a'..='z' => Some(LETTERS[(c as u8 - b'a') as usize]),
            '0'..='9' => Some(DIGITS[(c as u8 - b'0') as usize]),
            '`' => Some(Key::Grave),
            '-' => Some(Key::Minus),
            '=' => Some(Key::Equal),
            '[' => Some(Key::BracketLeft),
            ']' => Some(Key::BracketRight),
            '\\' => Some(Key::Backslash),
            ';' => Some(Key::Semicolon),
            '\'' => Some(Key::Quote),
            ',' => Some(Key::Comma),
            '.' => Some(Key::Period),
            '/' => Some(Key::Slash),
            ' ' => Some(Key::Space),
            _ => None,
        }
    }
}

impl FromStr for Key {
    type Err = Error;

    /// Parse a key name as typed by a user: a single character (`p`, `5`, `/`),
    /// a function key (`f9`), or a name such as `esc` or `page down`.
    /// Matching is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && let Some(key) = Key::from_char(c)
        {
            return Ok(key);
        }

        let name = s.trim().to_ascii_lowercase();
        if let Some(n) = name.strip_prefix('f')
            && let Ok(n) = n.parse::<usize>()
            && (1..=FUNCTION_KEYS.len()).contains(&n)
        {
            return Ok(FUNCTION_KEYS[n - 1]);
        }

        NAMED_KEYS
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|(_, key)| *key)
            .ok_or_else(|| Error::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(i) = LETTERS.iter().position(|k| k == self) {
            return write!(f, "{}", (b'a' + i as u8) as char);
        }
        if let Some(i) = DIGITS.iter().position(|k| k == self) {
            return write!(f, "{}", i);
        }
        if let Some(i) = FUNCTION_KEYS.iter().position(|k| k == self) {
            return write!(f, "f{}", i + 1);
        }
        match NAMED_KEYS.iter().find(|(_, key)| key == self) {
            Some((name, _)) => f.write_str(name),
            None => write!(f, "{:?}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_characters() {
        assert_eq!("p".parse::<Key>().unwrap(), Key::KeyP);
        assert_eq!("P".parse::<Key>().unwrap(), Key::KeyP);
        assert_eq!("7".parse::<Key>().unwrap(), Key::Num7);
        assert_eq!("/".parse::<Key>().unwrap(), Key::Slash);
        assert_eq!(" ".parse::<Key>().unwrap(), Key::Space);
    }

    #[test]
    fn test_parse_function_keys() {
        assert_eq!("f1".parse::<Key>().unwrap(), Key::F1);
        assert_eq!("F12".parse::<Key>().unwrap(), Key::F12);
        assert!("f13".parse::<Key>().is_err());
        assert!("f0".parse::<Key>().is_err());
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!("esc".parse::<Key>().unwrap(), Key::Escape);
        assert_eq!("Escape".parse::<Key>().unwrap(), Key::Escape);
        assert_eq!("page down".parse::<Key>().unwrap(), Key::PageDown);
        assert_eq!("right ctrl".parse::<Key>().unwrap(), Key::ControlRight);
    }

    #[test]
    fn test_parse_unknown_key() {
        let err = "hyper".parse::<Key>().unwrap_err();
        assert!(matches!(err, Error::UnknownKey(name) if name == "hyper"));
        assert!("".parse::<Key>().is_err());
    }

    #[test]
    fn test_display_matches_parse() {
        for key in [Key::KeyP, Key::Num3, Key::F9, Key::Escape, Key::PageUp] {
            let name = key.to_string();
            assert_eq!(name.parse::<Key>().unwrap(), key, "name {name:?}");
        }
    }
}
