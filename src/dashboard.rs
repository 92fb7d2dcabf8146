//! Per-product aggregation behind `GET /dashboard/{productId}`.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{FeedbackRecord, Sentiment, Theme};

/// Share of reviews above which a theme is called out.
pub const THEME_SHARE_THRESHOLD: f64 = 0.3;

pub const DURABILITY_WARNING: &str = "Warning: High volume of durability mentions.";
pub const COMFORT_TOPIC: &str = "Comfort is a key topic. Consider checking sizing/weight.";
pub const NEGATIVE_CRITICAL: &str = "Critical: Negative sentiment outweighs positive.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct SentimentCount {
    #[serde(rename = "Positive")]
    pub positive: usize,
    #[serde(rename = "Negative")]
    pub negative: usize,
    #[serde(rename = "Neutral")]
    pub neutral: usize,
}

impl SentimentCount {
    fn add(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ThemeCount {
    pub comfort: usize,
    pub durability: usize,
    pub appearance: usize,
}

impl ThemeCount {
    fn add(&mut self, theme: Theme) {
        match theme {
            Theme::Comfort => self.comfort += 1,
            Theme::Durability => self.durability += 1,
            Theme::Appearance => self.appearance += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub sentiment_count: SentimentCount,
    pub theme_count: ThemeCount,
    pub insights: Vec<String>,
}

/// Builds the dashboard for one product's records.
pub fn summarize(records: &[FeedbackRecord]) -> Dashboard {
    let mut sentiment_count = SentimentCount::default();
    let mut theme_count = ThemeCount::default();

    for record in records {
        sentiment_count.add(record.sentiment);
        for theme in &record.themes {
            theme_count.add(*theme);
        }
    }

    let insights = insights(records.len(), &sentiment_count, &theme_count);

    Dashboard {
        sentiment_count,
        theme_count,
        insights,
    }
}

/// Applies the insight rules in order. Rules are independent of each other.
fn insights(total: usize, sentiments: &SentimentCount, themes: &ThemeCount) -> Vec<String> {
    let mut insights = Vec::new();
    if total == 0 {
        return insights;
    }

    let share = |count: usize| count as f64 / total as f64;

    if share(themes.durability) > THEME_SHARE_THRESHOLD {
        insights.push(DURABILITY_WARNING.to_string());
    }
    if share(themes.comfort) > THEME_SHARE_THRESHOLD {
        insights.push(COMFORT_TOPIC.to_string());
    }
    if sentiments.negative > sentiments.positive {
        insights.push(NEGATIVE_CRITICAL.to_string());
    }

    insights
}
