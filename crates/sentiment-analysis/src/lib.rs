use analysis_core::{ArticleRecord, SentimentValue};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod extract;
pub mod text;

pub use extract::{extract_compound, PolarityScores};
pub use text::{excerpt, sanitize, sanitize_listing};

/// Compound scores inside `[-NEUTRAL_BAND, NEUTRAL_BAND]` are neutral.
pub const NEUTRAL_BAND: f64 = 0.05;

/// Share of neutral articles at which a corpus counts as sentiment-sparse.
pub const MOSTLY_NEUTRAL_RATIO: f64 = 0.85;

/// Discrete polarity of one article. Every article gets exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }

    /// Human-readable label for the sentiment
    pub fn to_label(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything the classifier accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SentimentInput<'a> {
    Score(f64),
    Label(&'a str),
    Missing,
}

impl From<f64> for SentimentInput<'_> {
    fn from(value: f64) -> Self {
        SentimentInput::Score(value)
    }
}

impl<'a> From<&'a str> for SentimentInput<'a> {
    fn from(value: &'a str) -> Self {
        SentimentInput::Label(value)
    }
}

impl From<Option<f64>> for SentimentInput<'_> {
    fn from(value: Option<f64>) -> Self {
        value.map_or(SentimentInput::Missing, SentimentInput::Score)
    }
}

/// Maps a compound score or a categorical label to a [`SentimentLabel`].
///
/// Labels match on substrings after lower-casing, `"pos"` checked before
/// `"neg"`, so a label containing both is positive. Scores use the fixed
/// ±[`NEUTRAL_BAND`] band, inclusive on both edges.
pub fn classify<'a>(value: impl Into<SentimentInput<'a>>) -> SentimentLabel {
    match value.into() {
        SentimentInput::Label(label) => {
            let lower = label.to_lowercase();
            if lower.contains("pos") {
                SentimentLabel::Positive
            } else if lower.contains("neg") {
                SentimentLabel::Negative
            } else {
                SentimentLabel::Neutral
            }
        }
        SentimentInput::Score(v) if v > NEUTRAL_BAND => SentimentLabel::Positive,
        SentimentInput::Score(v) if v < -NEUTRAL_BAND => SentimentLabel::Negative,
        SentimentInput::Score(_) | SentimentInput::Missing => SentimentLabel::Neutral,
    }
}

/// Label of one article, shared by the counts and the per-article display.
///
/// The compound score decides when one can be extracted (this already covers
/// `{pos, neu, neg}` triples, whose stand-in scores classify back to the same
/// dominant label). Failing that, a categorical `sentiment` string is
/// classified; anything else is neutral.
pub fn label_article(article: &ArticleRecord) -> SentimentLabel {
    if let Some(compound) = extract_compound(article) {
        return classify(compound);
    }
    match &article.sentiment {
        Some(SentimentValue::Text(label)) => classify(label.as_str()),
        _ => SentimentLabel::Neutral,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }

    fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }
}

/// Whole-number shares that always add up to 100 (or are all 0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentPercentages {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl SentimentPercentages {
    /// Positive and neutral are rounded; negative takes the remainder.
    pub fn from_counts(counts: &SentimentCounts) -> Self {
        let total = counts.total();
        if total == 0 {
            return Self::default();
        }

        let share = |n: usize| (100.0 * n as f64 / total as f64).round() as u32;
        let positive = share(counts.positive);
        // Both roundings going up can overshoot 100 when nothing is negative.
        let neutral = share(counts.neutral).min(100 - positive);

        Self {
            positive,
            neutral,
            negative: 100 - positive - neutral,
        }
    }

    pub fn get(&self, label: SentimentLabel) -> u32 {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }
}

/// Sentiment breakdown of an article collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub counts: SentimentCounts,
    pub total: usize,
    pub percentages: SentimentPercentages,
    /// At least [`MOSTLY_NEUTRAL_RATIO`] of a non-empty corpus is neutral.
    pub mostly_neutral: bool,
    /// Per-article labels, in input order.
    pub labels: Vec<SentimentLabel>,
}

pub fn aggregate(articles: &[ArticleRecord]) -> SentimentSummary {
    let mut counts = SentimentCounts::default();
    let labels: Vec<SentimentLabel> = articles
        .iter()
        .map(|article| {
            let label = label_article(article);
            counts.record(label);
            label
        })
        .collect();

    let total = articles.len();
    let percentages = SentimentPercentages::from_counts(&counts);
    let mostly_neutral =
        total > 0 && counts.neutral as f64 / total as f64 >= MOSTLY_NEUTRAL_RATIO;

    tracing::debug!(
        "Classified {} articles: {} positive, {} neutral, {} negative",
        total,
        counts.positive,
        counts.neutral,
        counts.negative
    );

    SentimentSummary {
        counts,
        total,
        percentages,
        mostly_neutral,
        labels,
    }
}
