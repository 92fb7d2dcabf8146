//! Fixed vocabulary behind review classification.
//!
//! Word sets are looked up by exact token, theme keywords by substring.
//! The theme table is a slice so iteration order is the declaration order.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::models::Theme;

// Words that count toward a positive review
static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "shiny", "elegant", "premium", "beautiful", "comfortable",
        "sturdy", "durable", "perfect", "loved", "great", "nice",
    ].into_iter().collect()
});

// Words that count toward a negative review
static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "tarnish", "dull", "broke", "broken", "heavy", "uncomfortable",
        "cheap", "poor", "bad", "scratch", "fragile",
    ].into_iter().collect()
});

/// Theme keyword table, in the order themes are reported.
pub const THEME_KEYWORDS: &[(Theme, &[&str])] = &[
    (
        Theme::Comfort,
        &["light", "heavy", "fit", "wearable", "comfortable", "size", "tight", "loose"],
    ),
    (
        Theme::Durability,
        &["broke", "broken", "strong", "quality", "fragile", "snap", "sturdy", "tarnish"],
    ),
    (
        Theme::Appearance,
        &["shiny", "dull", "design", "polish", "beautiful", "look", "color"],
    ),
];

pub fn is_positive(token: &str) -> bool {
    POSITIVE_WORDS.contains(token)
}

pub fn is_negative(token: &str) -> bool {
    NEGATIVE_WORDS.contains(token)
}
