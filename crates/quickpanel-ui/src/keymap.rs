//! Key events understood by the quick panel.
//!
//! Hosts translate their toolkit's key events into `KeyEvent`s. The
//! keystroke parser accepts the same user-friendly format as settings and
//! scripts: "ctrl+n", "cmd-shift-z", "mod+down".

use bitflags::bitflags;
use quickpanel_core::PrimaryModifier;

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CONTROL = 0b0010;
        const ALT = 0b0100;
        const SUPER = 0b1000;
    }
}

/// Keys the panel reacts to. Anything else arrives as `Char` or `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Enter,
    NumpadEnter,
    Escape,
    Char(char),
    Other(String),
}

/// A key press or release with its modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A key without modifiers.
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::empty())
    }

    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// Resolve the platform primary modifier: Command on macOS, Control elsewhere.
pub fn primary_modifier(setting: PrimaryModifier) -> Modifiers {
    match setting {
        PrimaryModifier::Control => Modifiers::CONTROL,
        PrimaryModifier::Super => Modifiers::SUPER,
        PrimaryModifier::Auto => {
            if cfg!(target_os = "macos") {
                Modifiers::SUPER
            } else {
                Modifiers::CONTROL
            }
        }
    }
}

/// Label for the primary modifier in key hints.
pub fn primary_modifier_label(primary: Modifiers) -> &'static str {
    if primary.contains(Modifiers::SUPER) {
        "⌘"
    } else {
        "Ctrl"
    }
}

// =============================================================================
// Keystroke Parsing
// =============================================================================

/// Normalize "ctrl+n" to "ctrl-n".
fn normalize_keystroke(s: &str) -> String {
    s.replace('+', "-")
}

/// Parse a keystroke string such as "ctrl+down" or "mod-enter".
///
/// `mod` and `primary` resolve to `primary`.
pub fn parse_keystroke(s: &str, primary: Modifiers) -> Result<KeyEvent, String> {
    let normalized = normalize_keystroke(s.trim());
    let mut parts: Vec<&str> = normalized.split('-').collect();
    // "ctrl--" means ctrl + '-'
    if normalized.ends_with("--") {
        parts.pop();
        parts.pop();
        parts.push("-");
    }
    let Some(key_part) = parts.pop() else {
        return Err(format!("Invalid keystroke '{}'", s));
    };

    let mut modifiers = Modifiers::empty();
    for part in parts {
        modifiers |= match part.to_ascii_lowercase().as_str() {
            "shift" => Modifiers::SHIFT,
            "ctrl" | "control" => Modifiers::CONTROL,
            "alt" | "option" => Modifiers::ALT,
            "cmd" | "super" | "meta" => Modifiers::SUPER,
            "mod" | "primary" => primary,
            other => return Err(format!("Invalid modifier '{}' in '{}'", other, s)),
        };
    }

    let key = match key_part.to_ascii_lowercase().as_str() {
        "up" => Key::Up,
        "down" => Key::Down,
        "left" => Key::Left,
        "right" => Key::Right,
        "pageup" => Key::PageUp,
        "pagedown" => Key::PageDown,
        "enter" | "return" => Key::Enter,
        "numpadenter" => Key::NumpadEnter,
        "escape" | "esc" => Key::Escape,
        "" => return Err(format!("Missing key in '{}'", s)),
        _ => {
            let mut chars = key_part.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => Key::Other(key_part.to_string()),
            }
        }
    };

    Ok(KeyEvent::new(key, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keystroke() {
        assert_eq!(normalize_keystroke("ctrl+n"), "ctrl-n");
        assert_eq!(normalize_keystroke("cmd+shift+z"), "cmd-shift-z");
        assert_eq!(normalize_keystroke("ctrl-n"), "ctrl-n"); // Already normalized
    }

    #[test]
    fn test_parse_keystroke() {
        let event = parse_keystroke("ctrl+down", Modifiers::SUPER).unwrap();
        assert_eq!(event.key, Key::Down);
        assert_eq!(event.modifiers, Modifiers::CONTROL);

        let event = parse_keystroke("mod-shift-enter", Modifiers::SUPER).unwrap();
        assert_eq!(event.key, Key::Enter);
        assert_eq!(event.modifiers, Modifiers::SUPER | Modifiers::SHIFT);
        assert!(event.shift());

        let event = parse_keystroke("esc", Modifiers::CONTROL).unwrap();
        assert_eq!(event, KeyEvent::plain(Key::Escape));

        let event = parse_keystroke("ctrl--", Modifiers::CONTROL).unwrap();
        assert_eq!(event.key, Key::Char('-'));
    }

    #[test]
    fn test_parse_keystroke_errors() {
        assert!(parse_keystroke("hyper+x", Modifiers::CONTROL).is_err());
        assert!(parse_keystroke("", Modifiers::CONTROL).is_err());
    }

    #[test]
    fn test_primary_modifier() {
        assert_eq!(
            primary_modifier(PrimaryModifier::Control),
            Modifiers::CONTROL
        );
        assert_eq!(primary_modifier(PrimaryModifier::Super), Modifiers::SUPER);
        let auto = primary_modifier(PrimaryModifier::Auto);
        assert!(auto == Modifiers::SUPER || auto == Modifiers::CONTROL);
        assert_eq!(primary_modifier_label(Modifiers::SUPER), "⌘");
        assert_eq!(primary_modifier_label(Modifiers::CONTROL), "Ctrl");
    }
}
