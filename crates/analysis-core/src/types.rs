use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::AnalysisError;

/// A loosely typed numeric field as it arrives on the wire.
///
/// Back-ends disagree on whether scores are numbers or numeric strings, and a
/// few send something else entirely. `Other` keeps decoding from failing on
/// those so one odd article never sinks a whole response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Other(Value),
}

impl Scalar {
    /// Numeric value, if this field reads as a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) if n.is_finite() => Some(*n),
            Scalar::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

/// The `sentiment` field of an article, which comes in several shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SentimentValue {
    /// A bare compound score.
    Number(f64),
    /// A categorical label such as `"Positive"`.
    Text(String),
    /// An object exposing a `compound` member (other members are ignored).
    Scores {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        compound: Option<Scalar>,
    },
    Other(Value),
}

/// One news article as supplied by the analysis service.
///
/// Every field is optional; accessors resolve the alternate spellings the
/// service uses for the same concept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compound: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neu: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neg: Option<Scalar>,
}

impl ArticleRecord {
    /// `title`, falling back to `headline`.
    pub fn display_title(&self) -> Option<&str> {
        first_non_empty(&[&self.title, &self.headline])
    }

    /// `summary`, then `content`, then `description`.
    pub fn body(&self) -> Option<&str> {
        first_non_empty(&[&self.summary, &self.content, &self.description])
    }

    /// `source`, falling back to `sourceName`.
    pub fn publisher(&self) -> Option<&str> {
        first_non_empty(&[&self.source, &self.source_name])
    }

    /// Parses `publishedAt` as RFC 3339 (NewsAPI) or RFC 2822 (RSS `pubDate`).
    pub fn published_time(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.published_at.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_rfc2822(raw))
            .ok()
    }
}

fn first_non_empty<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Fundamentals block of an analysis. Every metric may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    #[serde(rename = "marketPrice", default, deserialize_with = "lenient_number")]
    pub market_price: Option<f64>,
    #[serde(rename = "totalRevenue", default, deserialize_with = "lenient_number")]
    pub total_revenue: Option<f64>,
    #[serde(rename = "netIncome", default, deserialize_with = "lenient_number")]
    pub net_income: Option<f64>,
    #[serde(rename = "revenueYoY", default, deserialize_with = "lenient_number")]
    pub revenue_yoy: Option<f64>,
    #[serde(rename = "netMargin", default, deserialize_with = "lenient_number")]
    pub net_margin: Option<f64>,
    #[serde(rename = "trailingEPS", default, deserialize_with = "lenient_number")]
    pub trailing_eps: Option<f64>,
    #[serde(rename = "trailingPE", default, deserialize_with = "lenient_number")]
    pub trailing_pe: Option<f64>,
    #[serde(rename = "sharesOutstanding", default, deserialize_with = "lenient_number")]
    pub shares_outstanding: Option<f64>,
}

/// Result of one `/analyze` call. Replaced wholesale by the next call.
///
/// Top-level scores are required: a body without them is rejected rather than
/// rendered with placeholders. Fundamentals are optional throughout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "AnalysisResultWire")]
pub struct AnalysisResult {
    pub ticker: String,
    pub current_price: f64,
    pub price_change: f64,
    pub final_score: f64,
    pub sentiment_score: f64,
    pub technical_score: f64,
    pub fundamental_score: f64,
    pub fundamentals: Fundamentals,
    /// Volatility-adjusted threshold, when the service offers one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_threshold: Option<f64>,
    pub articles: Vec<ArticleRecord>,
}

impl AnalysisResult {
    /// Whether the final score clears the user's confidence threshold.
    pub fn clears_threshold(&self, threshold: f64) -> bool {
        self.final_score >= threshold
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisResultWire {
    ticker: String,
    current_price: f64,
    price_change: f64,
    final_score: f64,
    sentiment_score: f64,
    technical_score: f64,
    fundamental_score: f64,
    #[serde(default)]
    fundamentals: Option<Fundamentals>,
    #[serde(default, deserialize_with = "lenient_number")]
    suggested_threshold: Option<f64>,
    #[serde(default, deserialize_with = "lenient_articles")]
    sentiment_articles: Option<Vec<ArticleRecord>>,
    #[serde(default, deserialize_with = "lenient_articles")]
    news: Option<Vec<ArticleRecord>>,
    #[serde(default, deserialize_with = "lenient_articles")]
    articles: Option<Vec<ArticleRecord>>,
}

impl From<AnalysisResultWire> for AnalysisResult {
    fn from(wire: AnalysisResultWire) -> Self {
        // First present key wins, even when its list is empty.
        let articles = wire
            .sentiment_articles
            .or(wire.news)
            .or(wire.articles)
            .unwrap_or_default();

        Self {
            ticker: wire.ticker,
            current_price: wire.current_price,
            price_change: wire.price_change,
            final_score: wire.final_score,
            sentiment_score: wire.sentiment_score,
            technical_score: wire.technical_score,
            fundamental_score: wire.fundamental_score,
            fundamentals: wire.fundamentals.unwrap_or_default(),
            suggested_threshold: wire.suggested_threshold,
            articles,
        }
    }
}

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub ticker: String,
    pub max_news: u32,
    pub threshold: f64,
    pub sentiment_weight: f64,
    pub technical_weight: f64,
    pub fundamental_weight: f64,
}

impl AnalyzeRequest {
    pub const DEFAULT_MAX_NEWS: u32 = 20;
    pub const DEFAULT_THRESHOLD: f64 = 0.60;
    pub const DEFAULT_SENTIMENT_WEIGHT: f64 = 0.30;
    pub const DEFAULT_TECHNICAL_WEIGHT: f64 = 0.30;
    pub const DEFAULT_FUNDAMENTAL_WEIGHT: f64 = 0.40;

    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            max_news: Self::DEFAULT_MAX_NEWS,
            threshold: Self::DEFAULT_THRESHOLD,
            sentiment_weight: Self::DEFAULT_SENTIMENT_WEIGHT,
            technical_weight: Self::DEFAULT_TECHNICAL_WEIGHT,
            fundamental_weight: Self::DEFAULT_FUNDAMENTAL_WEIGHT,
        }
    }

    // Blank inputs (None) keep the default.

    pub fn max_news(mut self, value: Option<u32>) -> Self {
        if let Some(v) = value {
            self.max_news = v;
        }
        self
    }

    pub fn threshold(mut self, value: Option<f64>) -> Self {
        if let Some(v) = value {
            self.threshold = v;
        }
        self
    }

    pub fn sentiment_weight(mut self, value: Option<f64>) -> Self {
        if let Some(v) = value {
            self.sentiment_weight = v;
        }
        self
    }

    pub fn technical_weight(mut self, value: Option<f64>) -> Self {
        if let Some(v) = value {
            self.technical_weight = v;
        }
        self
    }

    pub fn fundamental_weight(mut self, value: Option<f64>) -> Self {
        if let Some(v) = value {
            self.fundamental_weight = v;
        }
        self
    }

    /// Trims and upper-cases the ticker, then checks every field.
    pub fn normalized(mut self) -> Result<Self, AnalysisError> {
        self.ticker = self.ticker.trim().to_uppercase();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.ticker.trim().is_empty() {
            return Err(AnalysisError::InvalidInput("ticker symbol is required".to_string()));
        }
        if self.max_news == 0 {
            return Err(AnalysisError::InvalidInput(
                "maxNews must be at least 1".to_string(),
            ));
        }
        for (field, value) in [
            ("threshold", self.threshold),
            ("sentimentWeight", self.sentiment_weight),
            ("technicalWeight", self.technical_weight),
            ("fundamentalWeight", self.fundamental_weight),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(AnalysisError::OutOfRange { field, value });
            }
        }
        Ok(())
    }
}

/// News listing category served by `GET /news`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    #[default]
    Indian,
    World,
}

impl NewsCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::Indian => "indian",
            NewsCategory::World => "world",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NewsCategory::Indian => "Indian Markets",
            NewsCategory::World => "World Markets",
        }
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewsCategory {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "indian" => Ok(NewsCategory::Indian),
            "world" => Ok(NewsCategory::World),
            other => Err(AnalysisError::UnknownCategory(other.to_string())),
        }
    }
}

/// Body of `GET /news`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsFeed {
    #[serde(default, deserialize_with = "lenient_list")]
    pub articles: Vec<ArticleRecord>,
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        // Publisher objects: {"name": "Reuters", ...}
        Value::Object(map) => map.get("name").and_then(text_of),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(text_of))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.and_then(|s| s.as_number()))
}

/// Decodes an article list one element at a time. Elements that are not
/// objects become empty (neutral) records, so the list keeps its length.
fn article_list(value: Value) -> Option<Vec<ArticleRecord>> {
    let Value::Array(items) = value else {
        return None;
    };
    let articles = items
        .into_iter()
        .map(|item| match item {
            Value::Object(_) => serde_json::from_value(item).unwrap_or_default(),
            _ => ArticleRecord::default(),
        })
        .collect();
    Some(articles)
}

fn lenient_articles<'de, D>(deserializer: D) -> Result<Option<Vec<ArticleRecord>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(article_list))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<ArticleRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_articles(deserializer)?.unwrap_or_default())
}
