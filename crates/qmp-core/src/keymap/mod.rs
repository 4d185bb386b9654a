//! Key symbol translation tables for guest keyboard and mouse input.
//!
//! The canonical representation on the wire is the QMP `QKeyCode` name.
//! Human key names and literal characters are translated at the boundary,
//! right before an [`InputEvent`] is built.
//!
//! # Shifted characters (for beginners)
//!
//! A keyboard has no `!` key.  Typing `!` on a US layout means holding Shift
//! and pressing `1`.  The guest only sees physical key transitions, so to type
//! `!` we must emulate exactly that:
//!
//! ```text
//! shift down → 1 down → 1 up → shift up
//! ```
//!
//! [`shifted_equivalent`] knows which base key produces each shifted
//! punctuation character.  Uppercase letters are handled separately: any
//! character for which `char::is_uppercase` is true is typed as Shift plus its
//! lowercase form, whether or not it appears in the table.
//!
//! The four-event order is load-bearing.  Releasing Shift before the base key
//! leaves the guest's modifier state out of step with what was intended.

pub mod qcode;

use crate::protocol::messages::InputEvent;

pub use qcode::to_qcode;

/// qcode of the modifier used for shifted characters.
pub const SHIFT_QCODE: &str = "shift";

/// Unified key mapper providing all translation directions.
pub struct KeyMapper;

impl KeyMapper {
    /// Canonicalizes a human key name into a QMP qcode.
    ///
    /// Unknown names pass through unchanged.
    pub fn normalize(symbol: &str) -> String {
        to_qcode(symbol).to_string()
    }

    /// Returns the base key that produces `ch` when combined with Shift.
    pub fn shifted_equivalent(ch: char) -> Option<char> {
        shifted_equivalent(ch)
    }

    /// Builds the ordered key events that type `ch`.
    pub fn key_press_sequence(ch: char) -> Vec<InputEvent> {
        key_press_sequence(ch)
    }

    /// Maps a caller-facing mouse button name to its QMP name.
    pub fn button_name(name: &str) -> &str {
        button_name(name)
    }
}

/// Returns the unshifted base key for a shifted US-layout punctuation
/// character.
///
/// Returns `None` for every other character, including uppercase letters.
pub fn shifted_equivalent(ch: char) -> Option<char> {
    match ch {
        '!' => Some('1'),
        '@' => Some('2'),
        '#' => Some('3'),
        '$' => Some('4'),
        '%' => Some('5'),
        '^' => Some('6'),
        '&' => Some('7'),
        '*' => Some('8'),
        '(' => Some('9'),
        ')' => Some('0'),
        '_' => Some('-'),
        '+' => Some('='),
        '{' => Some('['),
        '}' => Some(']'),
        '|' => Some('\\'),
        ':' => Some(';'),
        '"' => Some('\''),
        '~' => Some('`'),
        '<' => Some(','),
        '>' => Some('.'),
        '?' => Some('/'),
        _ => None,
    }
}

/// Returns `true` when typing `ch` requires holding Shift.
pub fn requires_shift(ch: char) -> bool {
    ch.is_uppercase() || shifted_equivalent(ch).is_some()
}

/// Builds the ordered key events that type a single character.
///
/// - Shifted (table hit or uppercase): `[shift↓, base↓, base↑, shift↑]`, where
///   the base key is lowercased before qcode translation.
/// - Otherwise: `[key↓, key↑]` for the translated character.
///
/// # Examples
///
/// ```rust
/// use qmp_core::keymap::key_press_sequence;
/// use qmp_core::protocol::InputEvent;
///
/// assert_eq!(
///     key_press_sequence('A'),
///     vec![
///         InputEvent::key("shift", true),
///         InputEvent::key("a", true),
///         InputEvent::key("a", false),
///         InputEvent::key("shift", false),
///     ]
/// );
/// ```
pub fn key_press_sequence(ch: char) -> Vec<InputEvent> {
    if requires_shift(ch) {
        let base: String = shifted_equivalent(ch)
            .unwrap_or(ch)
            .to_lowercase()
            .collect();
        let qcode = KeyMapper::normalize(&base);
        vec![
            InputEvent::key(SHIFT_QCODE, true),
            InputEvent::key(qcode.clone(), true),
            InputEvent::key(qcode, false),
            InputEvent::key(SHIFT_QCODE, false),
        ]
    } else {
        let mut buf = [0u8; 4];
        let qcode = KeyMapper::normalize(ch.encode_utf8(&mut buf));
        vec![
            InputEvent::key(qcode.clone(), true),
            InputEvent::key(qcode, false),
        ]
    }
}

/// Maps mouse button synonyms to the names QMP uses.
///
/// `forward` becomes `side` and `back` becomes `extra`; every other name
/// passes through unchanged.
pub fn button_name(name: &str) -> &str {
    match name {
        "forward" => "side",
        "back" => "extra",
        other => other,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
