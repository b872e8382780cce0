//! Keystrokes and their textual form

use std::fmt;
use std::str::FromStr;

use super::config::ShortcutError;

/// Modifier keys as a bitfield
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000);

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & Self::CTRL.0 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & Self::SHIFT.0 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & Self::ALT.0 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & Self::META.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Cmd on macOS, Ctrl elsewhere
    pub fn cmd() -> Modifiers {
        if cfg!(target_os = "macos") {
            Modifiers::META
        } else {
            Modifiers::CTRL
        }
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key, always lowercase
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Space,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// F1-F24
    F(u8),
}

impl KeyCode {
    fn parse(key: &str) -> Option<KeyCode> {
        if key.chars().count() == 1 {
            return key.chars().next().map(|c| KeyCode::Char(c.to_ascii_lowercase()));
        }

        let named = match key {
            "enter" | "return" => KeyCode::Enter,
            "escape" | "esc" => KeyCode::Escape,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "space" => KeyCode::Space,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            _ => {
                let n: u8 = key.strip_prefix('f')?.parse().ok()?;
                return (1..=24).contains(&n).then_some(KeyCode::F(n));
            }
        };
        Some(named)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(c) => write!(f, "{}", c.to_uppercase()),
            KeyCode::F(n) => write!(f, "F{}", n),
            other => write!(f, "{:?}", other),
        }
    }
}

/// A key with modifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl Keystroke {
    pub const fn new(key: KeyCode, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    pub fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c.to_ascii_lowercase()), Modifiers::NONE)
    }

    pub fn char_with_mods(c: char, mods: Modifiers) -> Self {
        Self::new(KeyCode::Char(c.to_ascii_lowercase()), mods)
    }

    /// Text shown next to menu entries, e.g. `Ctrl+Shift+S`
    pub fn display_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.ctrl() {
            f.write_str("Ctrl+")?;
        }
        if self.mods.alt() {
            f.write_str(if cfg!(target_os = "macos") { "Option+" } else { "Alt+" })?;
        }
        if self.mods.shift() {
            f.write_str("Shift+")?;
        }
        if self.mods.meta() {
            f.write_str(if cfg!(target_os = "macos") { "Cmd+" } else { "Meta+" })?;
        }
        write!(f, "{}", self.key)
    }
}

/// Parses strings like `cmd+shift+s` or `alt+f4`
impl FromStr for Keystroke {
    type Err = ShortcutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mods = Modifiers::NONE;
        let mut key = None;

        for part in s.split('+').map(str::trim) {
            let part = part.to_lowercase();
            match part.as_str() {
                "cmd" => mods = mods | Modifiers::cmd(),
                "ctrl" | "control" => mods = mods | Modifiers::CTRL,
                "shift" => mods = mods | Modifiers::SHIFT,
                "alt" | "option" => mods = mods | Modifiers::ALT,
                "meta" | "super" | "win" => mods = mods | Modifiers::META,
                _ if key.is_some() => {
                    return Err(ShortcutError::InvalidKey(format!(
                        "more than one key in '{}'",
                        s
                    )))
                }
                _ => {
                    key = Some(
                        KeyCode::parse(&part)
                            .ok_or_else(|| ShortcutError::InvalidKey(format!("unknown key '{}'", part)))?,
                    )
                }
            }
        }

        let key = key.ok_or_else(|| ShortcutError::InvalidKey(format!("no key in '{}'", s)))?;
        Ok(Keystroke::new(key, mods))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_modifiers() {
        let stroke: Keystroke = "ctrl+shift+s".parse().unwrap();
        assert_eq!(stroke, Keystroke::char_with_mods('s', Modifiers::CTRL | Modifiers::SHIFT));
        assert_eq!(stroke.to_string(), "Ctrl+Shift+S");
    }

    #[test]
    fn test_parse_named_and_function_keys() {
        assert_eq!("escape".parse::<Keystroke>().unwrap().key, KeyCode::Escape);
        assert_eq!("Alt+F4".parse::<Keystroke>().unwrap().key, KeyCode::F(4));
        assert!("f25".parse::<Keystroke>().is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!("ctrl+a+b".parse::<Keystroke>().is_err());
        assert!("ctrl+shift".parse::<Keystroke>().is_err());
        assert!("ctrl+bogus".parse::<Keystroke>().is_err());
    }

    #[test]
    fn test_char_is_lowercased() {
        assert_eq!(Keystroke::char('A'), Keystroke::char('a'));
    }
}
