//! Key bindings, written as chord strings like `Mod-Shift-z`.
//!
//! `Mod` is the primary modifier (Ctrl in a terminal). Single letters are
//! case-insensitive; an uppercase letter implies Shift.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use super::commands::{EditorCommand, Motion};
use super::schema::MarkType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeymapError {
    #[error("empty key binding")]
    Empty,
    #[error("unknown modifier `{modifier}` in `{chord}`")]
    UnknownModifier { modifier: String, chord: String },
    #[error("unknown key `{key}` in `{chord}`")]
    UnknownKey { key: String, chord: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    Esc,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    F(u8),
}

/// A key plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: Key,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyChord {
    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    #[must_use]
    pub const fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub const fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Lowercase letters, recording case as Shift.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if let Key::Char(ch) = self.key
            && ch.is_uppercase()
        {
            self.key = Key::Char(ch.to_lowercase().next().unwrap_or(ch));
            self.shift = true;
        }
        self
    }

    /// Parse a chord such as `Mod-b`, `Shift-ArrowLeft` or `Mod-Shift-z`.
    ///
    /// # Errors
    ///
    /// Fails on an empty string, an unknown modifier or an unknown key name.
    pub fn parse(chord: &str) -> Result<Self, KeymapError> {
        let mut parts: Vec<&str> = chord.split('-').collect();
        // "Mod--" binds the minus key itself.
        if chord.ends_with("--") {
            parts.truncate(parts.len().saturating_sub(2));
            parts.push("-");
        }
        let Some(name) = parts.pop().filter(|name| !name.is_empty()) else {
            return Err(KeymapError::Empty);
        };

        let mut parsed = Self::plain(parse_key(name).ok_or_else(|| KeymapError::UnknownKey {
            key: name.to_string(),
            chord: chord.to_string(),
        })?);
        for modifier in parts {
            match modifier {
                "Mod" | "Ctrl" | "Control" | "Cmd" | "c" | "m" => parsed.ctrl = true,
                "Alt" | "a" => parsed.alt = true,
                "Shift" | "s" => parsed.shift = true,
                _ => {
                    return Err(KeymapError::UnknownModifier {
                        modifier: modifier.to_string(),
                        chord: chord.to_string(),
                    });
                }
            }
        }
        Ok(parsed.normalized())
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl-")?;
        }
        if self.alt {
            f.write_str("Alt-")?;
        }
        if self.shift {
            f.write_str("Shift-")?;
        }
        match self.key {
            Key::Char(ch) => write!(f, "{ch}"),
            Key::F(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

fn parse_key(name: &str) -> Option<Key> {
    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Some(Key::Char(ch));
    }
    let key = match name {
        "Enter" => Key::Enter,
        "Backspace" => Key::Backspace,
        "Delete" => Key::Delete,
        "Tab" => Key::Tab,
        "Escape" | "Esc" => Key::Esc,
        "ArrowLeft" | "Left" => Key::Left,
        "ArrowRight" | "Right" => Key::Right,
        "ArrowUp" | "Up" => Key::Up,
        "ArrowDown" | "Down" => Key::Down,
        "Home" => Key::Home,
        "End" => Key::End,
        "Space" => Key::Char(' '),
        _ => {
            let n = name.strip_prefix('F')?.parse::<u8>().ok()?;
            Key::F(n)
        }
    };
    Some(key)
}

/// Formatting and history bindings.
const FORMAT_BINDINGS: &[(&str, EditorCommand)] = &[
    ("Mod-b", EditorCommand::ToggleMark(MarkType::Bold)),
    ("Mod-i", EditorCommand::ToggleMark(MarkType::Italic)),
    ("Mod-u", EditorCommand::ToggleMark(MarkType::Underline)),
    ("Mod-z", EditorCommand::Undo),
    ("Mod-y", EditorCommand::Redo),
    ("Mod-Shift-z", EditorCommand::Redo),
];

/// Standard editing and cursor bindings.
const BASE_BINDINGS: &[(&str, EditorCommand)] = &[
    ("Enter", EditorCommand::SplitBlock),
    ("Backspace", EditorCommand::DeleteBackward),
    ("Shift-Backspace", EditorCommand::DeleteBackward),
    ("Delete", EditorCommand::DeleteForward),
    ("Mod-a", EditorCommand::SelectAll),
];

const MOTION_KEYS: &[(&str, Motion)] = &[
    ("ArrowLeft", Motion::Left),
    ("ArrowRight", Motion::Right),
    ("ArrowUp", Motion::Up),
    ("ArrowDown", Motion::Down),
    ("Home", Motion::LineStart),
    ("End", Motion::LineEnd),
    ("Mod-Home", Motion::DocStart),
    ("Mod-End", Motion::DocEnd),
];

/// Maps chords to editor commands.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: HashMap<KeyChord, EditorCommand>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The editor's full keymap: formatting, history, base editing and
    /// cursor motion (with Shift to extend).
    ///
    /// # Errors
    ///
    /// Fails if any built-in chord string does not parse.
    pub fn standard() -> Result<Self, KeymapError> {
        let mut keymap = Self::new();
        for (chord, command) in FORMAT_BINDINGS.iter().chain(BASE_BINDINGS) {
            keymap.bind(chord, command.clone())?;
        }
        for (chord, motion) in MOTION_KEYS {
            keymap.bind(
                chord,
                EditorCommand::Move {
                    motion: *motion,
                    extend: false,
                },
            )?;
            keymap.bind(
                &format!("Shift-{chord}"),
                EditorCommand::Move {
                    motion: *motion,
                    extend: true,
                },
            )?;
        }
        Ok(keymap)
    }

    /// Bind `chord`, replacing any previous binding.
    ///
    /// # Errors
    ///
    /// Fails if `chord` does not parse.
    pub fn bind(&mut self, chord: &str, command: EditorCommand) -> Result<(), KeymapError> {
        let chord = KeyChord::parse(chord)?;
        self.bindings.insert(chord, command);
        Ok(())
    }

    pub fn lookup(&self, chord: &KeyChord) -> Option<&EditorCommand> {
        self.bindings.get(&chord.normalized())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mod_letter() {
        let chord = KeyChord::parse("Mod-b").unwrap();
        assert_eq!(chord, KeyChord::plain(Key::Char('b')).ctrl());
    }

    #[test]
    fn test_parse_mod_shift_letter() {
        let chord = KeyChord::parse("Mod-Shift-z").unwrap();
        assert_eq!(chord, KeyChord::plain(Key::Char('z')).ctrl().shift());
    }

    #[test]
    fn test_uppercase_letter_implies_shift() {
        assert_eq!(
            KeyChord::parse("Mod-Z").unwrap(),
            KeyChord::parse("Mod-Shift-z").unwrap()
        );
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(
            KeyChord::parse("Shift-ArrowLeft").unwrap(),
            KeyChord::plain(Key::Left).shift()
        );
        assert_eq!(KeyChord::parse("F1").unwrap(), KeyChord::plain(Key::F(1)));
        assert_eq!(
            KeyChord::parse("Mod--").unwrap(),
            KeyChord::plain(Key::Char('-')).ctrl()
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(KeyChord::parse(""), Err(KeymapError::Empty));
        assert!(matches!(
            KeyChord::parse("Hyper-b"),
            Err(KeymapError::UnknownModifier { .. })
        ));
        assert!(matches!(
            KeyChord::parse("Mod-Banana"),
            Err(KeymapError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_standard_keymap_bindings() {
        let keymap = Keymap::standard().unwrap();
        let ctrl = |c| KeyChord::plain(Key::Char(c)).ctrl();
        assert_eq!(
            keymap.lookup(&ctrl('b')),
            Some(&EditorCommand::ToggleMark(MarkType::Bold))
        );
        assert_eq!(
            keymap.lookup(&ctrl('i')),
            Some(&EditorCommand::ToggleMark(MarkType::Italic))
        );
        assert_eq!(
            keymap.lookup(&ctrl('u')),
            Some(&EditorCommand::ToggleMark(MarkType::Underline))
        );
        assert_eq!(keymap.lookup(&ctrl('z')), Some(&EditorCommand::Undo));
        assert_eq!(keymap.lookup(&ctrl('y')), Some(&EditorCommand::Redo));
        assert_eq!(keymap.lookup(&ctrl('z').shift()), Some(&EditorCommand::Redo));
        // Terminals may report Ctrl+Shift+Z as an uppercase char.
        assert_eq!(keymap.lookup(&ctrl('Z')), Some(&EditorCommand::Redo));
    }

    #[test]
    fn test_standard_keymap_motion_with_shift_extends() {
        let keymap = Keymap::standard().unwrap();
        assert_eq!(
            keymap.lookup(&KeyChord::plain(Key::End).shift()),
            Some(&EditorCommand::Move {
                motion: Motion::LineEnd,
                extend: true,
            })
        );
        assert_eq!(
            keymap.lookup(&KeyChord::plain(Key::Home).ctrl()),
            Some(&EditorCommand::Move {
                motion: Motion::DocStart,
                extend: false,
            })
        );
    }

    #[test]
    fn test_plain_letters_are_unbound() {
        let keymap = Keymap::standard().unwrap();
        assert!(keymap.lookup(&KeyChord::plain(Key::Char('b'))).is_none());
    }
}
