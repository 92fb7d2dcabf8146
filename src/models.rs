//! Feedback domain types.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::classifier;
use crate::error::Error;

/// Separator used for the `themes` column and its JSON rendering.
pub const THEME_DELIMITER: &str = ",";

/// Overall tone of a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sentiment::ALL
            .into_iter()
            .find(|sentiment| sentiment.as_str() == s)
            .ok_or_else(|| Error::CorruptRecord(format!("unknown sentiment '{}'", s)))
    }
}

/// Product aspect a review talks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Comfort,
    Durability,
    Appearance,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Comfort, Theme::Durability, Theme::Appearance];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Comfort => "comfort",
            Theme::Durability => "durability",
            Theme::Appearance => "appearance",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.as_str() == s)
            .ok_or_else(|| Error::CorruptRecord(format!("unknown theme '{}'", s)))
    }
}

/// Joins themes into their stored form, e.g. `durability,appearance`.
pub fn join_themes(themes: &[Theme]) -> String {
    themes
        .iter()
        .map(Theme::as_str)
        .collect::<Vec<_>>()
        .join(THEME_DELIMITER)
}

/// Parses the stored theme list. An empty string is an empty list.
pub fn split_themes(stored: &str) -> Result<Vec<Theme>, Error> {
    if stored.is_empty() {
        return Ok(Vec::new());
    }
    stored.split(THEME_DELIMITER).map(str::parse::<Theme>).collect()
}

/// Request body for `POST /feedback`
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FeedbackSubmission {
    #[serde(rename = "productId")]
    pub product_id: String,
    /// Also accepts integer strings (`"5"`) and whole floats (`5.0`)
    #[serde(deserialize_with = "deserialize_rating")]
    pub rating: i64,
    pub review: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RatingInput {
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_rating<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match RatingInput::deserialize(deserializer)? {
        RatingInput::Int(rating) => Ok(rating),
        RatingInput::Float(rating)
            if rating.fract() == 0.0 && rating >= i64::MIN as f64 && rating < i64::MAX as f64 =>
        {
            Ok(rating as i64)
        }
        RatingInput::Float(rating) => Err(de::Error::custom(format!(
            "rating {} is not a whole number",
            rating
        ))),
        RatingInput::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("rating '{}' is not an integer", text))),
    }
}

/// A submission with its classification fixed at construction.
///
/// Sentiment and themes are only ever computed here, so a stored record keeps
/// the labels the lexicon produced when it was written.
#[derive(Debug, Clone)]
pub struct ClassifiedFeedback {
    product_id: String,
    rating: i64,
    review: String,
    sentiment: Sentiment,
    themes: Vec<Theme>,
}

impl ClassifiedFeedback {
    pub fn new(submission: FeedbackSubmission) -> Self {
        let sentiment = classifier::analyze_sentiment(&submission.review);
        let themes = classifier::detect_themes(&submission.review);
        Self {
            product_id: submission.product_id,
            rating: submission.rating,
            review: submission.review,
            sentiment,
            themes,
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn rating(&self) -> i64 {
        self.rating
    }

    pub fn review(&self) -> &str {
        &self.review
    }

    pub fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Attaches the store-assigned id.
    pub(crate) fn into_record(self, id: i64) -> FeedbackRecord {
        FeedbackRecord {
            id,
            product_id: self.product_id,
            rating: self.rating,
            review: self.review,
            sentiment: self.sentiment,
            themes: self.themes,
        }
    }
}

/// A stored review as returned by `GET /reviews/{productId}`
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FeedbackRecord {
    pub id: i64,
    #[serde(rename = "productId")]
    pub product_id: String,
    pub rating: i64,
    pub review: String,
    pub sentiment: Sentiment,
    /// Comma-joined, e.g. `durability,appearance`
    #[serde(serialize_with = "serialize_themes")]
    #[schema(value_type = String, example = "durability,appearance")]
    pub themes: Vec<Theme>,
}

fn serialize_themes<S>(themes: &[Theme], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&join_themes(themes))
}
