//! Human key name to QMP `QKeyCode` translation table.
//!
//! QEMU identifies keys by *qcode* names (`ret`, `esc`, `spc`, `meta_l`, ...).
//! Reference: the `QKeyCode` enum in QEMU's `qapi/ui.json`.
//!
//! # Why a translation table? (for beginners)
//!
//! Callers describe keys the way people talk about them: `"enter"`, `"win"`,
//! `"escape"`, or the literal character they want typed (`" "`, `"\n"`,
//! `","`).  QEMU only understands its own symbolic names, so every key name
//! passes through [`to_qcode`] on its way to the wire.
//!
//! Names that are not in the table are returned unchanged.  Single lowercase
//! letters, digits, and most named keys (`tab`, `ctrl`, `alt`, `shift`,
//! `delete`, `f1`..`f12`, `up`, `down`, ...) are already valid qcodes.

/// Translates a human key name or single character into a QMP qcode name.
///
/// Returns the input unchanged when it has no table entry.
///
/// # Examples
///
/// ```rust
/// use qmp_core::keymap::qcode::to_qcode;
///
/// assert_eq!(to_qcode("enter"), "ret");
/// assert_eq!(to_qcode(","), "comma");
/// assert_eq!(to_qcode("a"), "a");
/// ```
pub fn to_qcode(symbol: &str) -> &str {
    match symbol {
        // Whitespace and line control
        "enter" | "return" | "\n" | "\r" => "ret",
        " " | "space" => "spc",
        "\t" => "tab",

        // Named keys whose qcode differs from the common name
        "escape" | "esc" => "esc",
        "win" | "windows" | "super" | "meta" | "cmd" | "command" => "meta_l",
        "control" => "ctrl",
        "option" => "alt",
        "pageup" | "page_up" => "pgup",
        "pagedown" | "page_down" => "pgdn",
        "del" => "delete",
        "ins" => "insert",
        "capslock" => "caps_lock",
        "arrowup" => "up",
        "arrowdown" => "down",
        "arrowleft" => "left",
        "arrowright" => "right",

        // Unshifted punctuation
        "-" => "minus",
        "=" => "equal",
        "[" => "bracket_left",
        "]" => "bracket_right",
        "\\" => "backslash",
        ";" => "semicolon",
        "'" => "apostrophe",
        "`" => "grave_accent",
        "," => "comma",
        "." => "dot",
        "/" => "slash",
        "*" => "asterisk",

        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_variants_map_to_ret() {
        for name in ["enter", "return", "\n", "\r"] {
            assert_eq!(to_qcode(name), "ret", "{name:?} should map to ret");
        }
    }

    #[test]
    fn test_win_maps_to_meta_l() {
        assert_eq!(to_qcode("win"), "meta_l");
    }

    #[test]
    fn test_escape_maps_to_esc() {
        assert_eq!(to_qcode("escape"), "esc");
    }

    #[test]
    fn test_space_character_maps_to_spc() {
        assert_eq!(to_qcode(" "), "spc");
    }

    #[test]
    fn test_tab_character_maps_to_tab() {
        assert_eq!(to_qcode("\t"), "tab");
    }

    #[test]
    fn test_unshifted_punctuation_has_qcodes() {
        let pairs = [
            ("-", "minus"),
            ("=", "equal"),
            ("[", "bracket_left"),
            ("]", "bracket_right"),
            ("\\", "backslash"),
            (";", "semicolon"),
            ("'", "apostrophe"),
            ("`", "grave_accent"),
            (",", "comma"),
            (".", "dot"),
            ("/", "slash"),
        ];
        for (input, expected) in pairs {
            assert_eq!(to_qcode(input), expected);
        }
    }

    #[test]
    fn test_unknown_symbols_pass_through_unchanged() {
        for name in ["a", "z", "5", "ctrl", "f12", "not-a-key"] {
            assert_eq!(to_qcode(name), name);
        }
    }
}
