//! Keyword-based review classification.
//!
//! Sentiment counts exact token hits against the lexicon word sets; themes are
//! detected by substring containment, so a keyword also matches inside a
//! longer word ("light" in "delightful").

use crate::lexicon::{self, THEME_KEYWORDS};
use crate::models::{Sentiment, Theme};

/// Classifies the tone of `text` by comparing positive and negative hits.
/// Ties, including no hits at all, are `Neutral`.
pub fn analyze_sentiment(text: &str) -> Sentiment {
    let normalized = text.to_lowercase().replace(['.', ','], "");
    let words: Vec<&str> = normalized.split_whitespace().collect();

    let positive_count = words.iter().filter(|w| lexicon::is_positive(w)).count();
    let negative_count = words.iter().filter(|w| lexicon::is_negative(w)).count();

    if positive_count > negative_count {
        Sentiment::Positive
    } else if negative_count > positive_count {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Returns every theme with at least one keyword in `text`, in table order.
pub fn detect_themes(text: &str) -> Vec<Theme> {
    let lowercase_text = text.to_lowercase();
    THEME_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lowercase_text.contains(k)))
        .map(|(theme, _)| *theme)
        .collect()
}
