//! Transliteration for matching Latin search text against CJK labels.

use quickpanel_core::TransliterationError;

/// Converts text in another script to a Latin spelling for loose matching.
pub trait Transliterator: Send + Sync {
    /// Whether this transliterator understands any part of `text`.
    fn supports(&self, text: &str) -> bool;

    /// Latin rendering of `text`. Characters it does not know pass through.
    fn transliterate(&self, text: &str) -> Result<String, TransliterationError>;
}

/// Han characters to toneless pinyin, syllables joined without separators.
#[cfg(feature = "pinyin")]
#[derive(Debug, Clone, Copy, Default)]
pub struct PinyinTransliterator;

#[cfg(feature = "pinyin")]
impl Transliterator for PinyinTransliterator {
    fn supports(&self, text: &str) -> bool {
        use pinyin::ToPinyin;
        text.chars().any(|c| c.to_pinyin().is_some())
    }

    fn transliterate(&self, text: &str) -> Result<String, TransliterationError> {
        use pinyin::ToPinyin;

        let mut out = String::with_capacity(text.len() * 2);
        for c in text.chars() {
            match c.to_pinyin() {
                Some(p) => out.push_str(p.plain()),
                None => out.push(c),
            }
        }
        Ok(out.to_lowercase())
    }
}

/// The transliterator compiled into this build, if any.
pub fn default_transliterator() -> Option<Box<dyn Transliterator>> {
    #[cfg(feature = "pinyin")]
    {
        Some(Box::new(PinyinTransliterator))
    }
    #[cfg(not(feature = "pinyin"))]
    {
        None
    }
}
