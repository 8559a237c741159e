//! Item filtering against the current search text.
//!
//! An item passes when its search corpus (`filter_text + label +
//! description`) contains the search text, case-insensitively. Failing that,
//! a loose subsequence pattern is tried, against a transliterated corpus when
//! the corpus is in a script the transliterator handles. Any failure along
//! the way lets the item through.

use quickpanel_core::ListItem;
use regex::{Regex, RegexBuilder};

use crate::transliterate::Transliterator;

/// Outcome of one filter pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterResult {
    /// Indices into the source list, in source order. Pinned items are
    /// always present.
    pub indices: Vec<usize>,
    /// Whether any non-pinned item matched. The panel collapses when false.
    pub has_matches: bool,
}

impl FilterResult {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Strip one leading trigger character from `search_text`.
pub fn strip_trigger<'a>(search_text: &'a str, triggers: &[char]) -> &'a str {
    let mut chars = search_text.chars();
    match chars.next() {
        Some(c) if triggers.contains(&c) => chars.as_str(),
        _ => search_text,
    }
}

/// Build the loose pattern: every char escaped, joined by `.*`.
///
/// Returns `None` if the pattern does not compile.
pub fn loose_pattern(query: &str) -> Option<Regex> {
    let pattern = query
        .chars()
        .map(|c| regex::escape(c.encode_utf8(&mut [0; 4])))
        .collect::<Vec<_>>()
        .join(".*");

    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::debug!("Loose pattern for '{}' failed to compile: {}", query, e);
            None
        }
    }
}

/// Filter `items` by `search_text`.
pub fn filter_items(
    items: &[ListItem],
    search_text: &str,
    triggers: &[char],
    transliterator: Option<&dyn Transliterator>,
) -> FilterResult {
    let query = strip_trigger(search_text, triggers);
    let lower_query = query.to_lowercase();
    let pattern = if query.is_empty() {
        None
    } else {
        loose_pattern(&lower_query)
    };

    let mut indices = Vec::with_capacity(items.len());
    let mut has_matches = false;

    for (i, item) in items.iter().enumerate() {
        if item.always_visible {
            indices.push(i);
        } else if query.is_empty()
            || matches_item(item, &lower_query, pattern.as_ref(), transliterator)
        {
            has_matches = true;
            indices.push(i);
        }
    }

    FilterResult {
        indices,
        has_matches,
    }
}

fn matches_item(
    item: &ListItem,
    lower_query: &str,
    pattern: Option<&Regex>,
    transliterator: Option<&dyn Transliterator>,
) -> bool {
    let corpus = item.search_corpus();
    let lower_corpus = corpus.to_lowercase();

    if lower_corpus.contains(lower_query) {
        return true;
    }

    let Some(pattern) = pattern else {
        return true;
    };

    match transliterator {
        Some(t) if !corpus.is_ascii() && t.supports(&corpus) => match t.transliterate(&corpus) {
            Ok(latin) => pattern.is_match(&latin.to_lowercase()),
            Err(e) => {
                tracing::debug!("Transliteration failed for '{}': {}", item.label, e);
                true
            }
        },
        _ => pattern.is_match(&lower_corpus),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickpanel_core::TransliterationError;

    const TRIGGERS: &[char] = &['/', '@'];

    fn labels(items: &[ListItem], result: &FilterResult) -> Vec<String> {
        result
            .indices
            .iter()
            .map(|&i| items[i].label.clone())
            .collect()
    }

    #[test]
    fn test_strip_trigger() {
        assert_eq!(strip_trigger("/alp", TRIGGERS), "alp");
        assert_eq!(strip_trigger("@", TRIGGERS), "");
        assert_eq!(strip_trigger("//x", TRIGGERS), "/x");
        assert_eq!(strip_trigger("alp", TRIGGERS), "alp");
    }

    #[test]
    fn test_empty_search_passes_everything() {
        let items = vec![ListItem::new("Alpha"), ListItem::new("Beta")];
        let result = filter_items(&items, "/", TRIGGERS, None);
        assert_eq!(result.indices, vec![0, 1]);
        assert!(result.has_matches);
    }

    #[test]
    fn test_pinned_items_survive_filtering() {
        let items = vec![
            ListItem::new("Alpha"),
            ListItem::new("Beta").always_visible(),
            ListItem::new("Gamma"),
        ];
        let result = filter_items(&items, "alp", TRIGGERS, None);
        assert_eq!(labels(&items, &result), vec!["Alpha", "Beta"]);
        assert!(result.has_matches);
    }

    #[test]
    fn test_no_matches_collapses_even_with_pinned() {
        let items = vec![
            ListItem::new("Clear").always_visible(),
            ListItem::new("Alpha"),
        ];
        let result = filter_items(&items, "@zzz", TRIGGERS, None);
        assert_eq!(labels(&items, &result), vec!["Clear"]);
        assert!(!result.has_matches);
    }

    #[test]
    fn test_substring_over_corpus() {
        let items = vec![
            ListItem::new("GPT-4o").description("OpenAI"),
            ListItem::new("Claude").filter_text("anthropic"),
            ListItem::new("Gemini"),
        ];
        assert_eq!(
            labels(&items, &filter_items(&items, "@OPENAI", TRIGGERS, None)),
            vec!["GPT-4o"]
        );
        assert_eq!(
            labels(&items, &filter_items(&items, "@anthrop", TRIGGERS, None)),
            vec!["Claude"]
        );
    }

    #[test]
    fn test_loose_subsequence() {
        let items = vec![ListItem::new("Knowledge Base"), ListItem::new("Translate")];
        let result = filter_items(&items, "/kb", TRIGGERS, None);
        assert_eq!(labels(&items, &result), vec!["Knowledge Base"]);
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let items = vec![ListItem::new("a.b"), ListItem::new("axb")];
        let result = filter_items(&items, "/a.b", TRIGGERS, None);
        assert_eq!(labels(&items, &result), vec!["a.b"]);

        let items = vec![ListItem::new("c++ (gcc)"), ListItem::new("rust")];
        let result = filter_items(&items, "/c+(", TRIGGERS, None);
        assert_eq!(labels(&items, &result), vec!["c++ (gcc)"]);
    }

    struct FakeLatin;

    impl Transliterator for FakeLatin {
        fn supports(&self, text: &str) -> bool {
            text.contains('翻')
        }

        fn transliterate(&self, text: &str) -> Result<String, TransliterationError> {
            Ok(text.replace("翻译", "fanyi"))
        }
    }

    struct Broken;

    impl Transliterator for Broken {
        fn supports(&self, _: &str) -> bool {
            true
        }

        fn transliterate(&self, _: &str) -> Result<String, TransliterationError> {
            Err(TransliterationError::Failed("boom".to_string()))
        }
    }

    #[test]
    fn test_transliterated_match() {
        let items = vec![ListItem::new("翻译"), ListItem::new("总结")];
        let result = filter_items(&items, "/fy", TRIGGERS, Some(&FakeLatin));
        assert_eq!(labels(&items, &result), vec!["翻译"]);

        // Without a transliterator CJK labels only match literally
        let result = filter_items(&items, "/fy", TRIGGERS, None);
        assert!(result.is_empty());
    }

    #[test]
    fn test_transliteration_failure_fails_open() {
        let items = vec![ListItem::new("翻译"), ListItem::new("Alpha")];
        let result = filter_items(&items, "/zz", TRIGGERS, Some(&Broken));
        assert_eq!(labels(&items, &result), vec!["翻译"]);
    }
}
