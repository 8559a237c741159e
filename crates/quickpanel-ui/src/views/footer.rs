//! Footer: panel title and key hints.

/// One key hint, e.g. "⌘ + ↩︎ multiple".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHint {
    pub keys: String,
    pub label: &'static str,
    /// Drawn highlighted while the primary modifier is held.
    pub highlight: bool,
}

impl KeyHint {
    fn plain(keys: impl Into<String>, label: &'static str) -> Self {
        Self {
            keys: keys.into(),
            label,
            highlight: false,
        }
    }
}

impl std::fmt::Display for KeyHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.keys, self.label)
    }
}

/// Inputs for building the footer.
#[derive(Debug, Clone, Copy)]
pub struct FooterContext<'a> {
    pub title: Option<&'a str>,
    pub width: f32,
    pub wide_min_width: f32,
    /// "⌘" or "Ctrl".
    pub modifier_label: &'a str,
    pub primary_held: bool,
    /// A menu item is listed or there is history to go back to.
    pub can_navigate: bool,
    pub multiple: bool,
    pub multiple_repeat: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterView {
    pub title: String,
    pub hints: Vec<KeyHint>,
}

impl FooterView {
    pub fn build(ctx: FooterContext<'_>) -> Self {
        let modifier = ctx.modifier_label;
        let with_modifier = |keys: String, label: &'static str| KeyHint {
            keys,
            label,
            highlight: ctx.primary_held,
        };

        let mut hints = vec![
            KeyHint::plain("ESC", "close"),
            KeyHint::plain("▲▼", "select"),
        ];

        if ctx.width >= ctx.wide_min_width {
            hints.push(with_modifier(format!("{} + ▲▼", modifier), "page"));
            if ctx.can_navigate {
                hints.push(with_modifier(
                    format!("{} + ◀︎▶︎", modifier),
                    "back/forward",
                ));
            }
        }

        hints.push(KeyHint::plain("↩︎", "confirm"));

        if ctx.multiple {
            hints.push(with_modifier(format!("{} + ↩︎", modifier), "multiple"));
        }
        if ctx.multiple_repeat {
            hints.push(with_modifier(
                format!("⇧ + {} + ↩︎", modifier),
                "multiple repeat",
            ));
        }

        Self {
            title: ctx.title.unwrap_or_default().to_string(),
            hints,
        }
    }

    /// Hints joined for single-line display.
    pub fn hint_line(&self) -> String {
        self.hints
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("  ")
    }
}
