use analysis_core::{ArticleRecord, Scalar, SentimentValue};

use crate::SentimentLabel;

/// The `{pos, neu, neg}` proportions some scorers emit instead of a compound value.
///
/// Members are not required to sum to 1. A member that is absent (or not a
/// number) counts as 0 when comparing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarityScores {
    pub pos: Option<f64>,
    pub neu: Option<f64>,
    pub neg: Option<f64>,
}

impl PolarityScores {
    /// Reads the triple off an article. `None` when no member is numeric.
    pub fn from_article(article: &ArticleRecord) -> Option<Self> {
        let scores = Self {
            pos: article.pos.as_ref().and_then(Scalar::as_number),
            neu: article.neu.as_ref().and_then(Scalar::as_number),
            neg: article.neg.as_ref().and_then(Scalar::as_number),
        };
        if scores.pos.is_none() && scores.neu.is_none() && scores.neg.is_none() {
            None
        } else {
            Some(scores)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.pos.is_some() && self.neu.is_some() && self.neg.is_some()
    }

    /// Majority wins; any tie, or a dominant `neu`, is neutral.
    pub fn dominant(&self) -> SentimentLabel {
        let pos = self.pos.unwrap_or(0.0);
        let neu = self.neu.unwrap_or(0.0);
        let neg = self.neg.unwrap_or(0.0);

        if pos > neu && pos > neg {
            SentimentLabel::Positive
        } else if neg > neu && neg > pos {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    /// Compound stand-in for the dominant polarity: +0.5, -0.5 or 0.0.
    pub fn compound(&self) -> f64 {
        match self.dominant() {
            SentimentLabel::Positive => 0.5,
            SentimentLabel::Negative => -0.5,
            SentimentLabel::Neutral => 0.0,
        }
    }
}

/// Resolves the single authoritative compound score of an article.
///
/// Fields are tried in a fixed order and the first one that reads as a finite
/// number wins: `compound`, `sentimentScore`, numeric `sentiment`,
/// `sentiment.compound`, then the `{pos, neu, neg}` dominance fallback.
/// The result is clamped to [-1, 1]. `None` means the article is unscored.
pub fn extract_compound(article: &ArticleRecord) -> Option<f64> {
    direct_compound(article)
        .or_else(|| PolarityScores::from_article(article).map(|s| s.compound()))
        .map(|v| v.clamp(-1.0, 1.0))
}

fn direct_compound(article: &ArticleRecord) -> Option<f64> {
    if let Some(v) = article.compound.as_ref().and_then(Scalar::as_number) {
        return Some(v);
    }
    if let Some(v) = article.sentiment_score.as_ref().and_then(Scalar::as_number) {
        return Some(v);
    }
    match &article.sentiment {
        Some(SentimentValue::Number(n)) if n.is_finite() => Some(*n),
        Some(SentimentValue::Scores { compound: Some(c) }) => c.as_number(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn article(value: serde_json::Value) -> ArticleRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_compound_takes_priority() {
        let a = article(json!({"compound": 0.4, "sentiment": -0.2}));
        assert_eq!(extract_compound(&a), Some(0.4));

        let a = article(json!({"sentimentScore": -0.3, "sentiment": {"compound": 0.9}}));
        assert_eq!(extract_compound(&a), Some(-0.3));
    }

    #[test]
    fn test_unparseable_fields_fall_through() {
        // A non-numeric compound does not stop the search.
        let a = article(json!({"compound": "n/a", "sentimentScore": "0.25"}));
        assert_eq!(extract_compound(&a), Some(0.25));

        let a = article(json!({"compound": null, "sentiment": {"compound": "-0.6"}}));
        assert_eq!(extract_compound(&a), Some(-0.6));

        let a = article(json!({"sentiment": {"label": "positive"}, "pos": 0.7, "neu": 0.2, "neg": 0.1}));
        assert_eq!(extract_compound(&a), Some(0.5));
    }

    #[test]
    fn test_triple_fallback() {
        let cases = [
            (json!({"pos": 0.6, "neu": 0.3, "neg": 0.1}), 0.5),
            (json!({"pos": 0.2, "neu": 0.3, "neg": 0.5}), -0.5),
            (json!({"pos": 0.3, "neu": 0.3, "neg": 0.4}), -0.5),
            (json!({"pos": 0.3, "neu": 0.4, "neg": 0.3}), 0.0),
            (json!({"pos": 0.4, "neu": 0.2, "neg": 0.4}), 0.0),
            // Missing members count as zero.
            (json!({"neg": 0.2}), -0.5),
        ];
        for (value, expected) in cases {
            let a = article(value.clone());
            assert_eq!(extract_compound(&a), Some(expected), "input {}", value);
        }
    }

    #[test]
    fn test_no_sentiment_is_none() {
        let a = article(json!({"title": "Quiet day", "sentiment": "neutral"}));
        assert_eq!(extract_compound(&a), None);
        assert_eq!(extract_compound(&ArticleRecord::default()), None);
    }

    #[test]
    fn test_result_is_clamped() {
        let a = article(json!({"compound": 3.5}));
        assert_eq!(extract_compound(&a), Some(1.0));
        let a = article(json!({"sentiment": -7}));
        assert_eq!(extract_compound(&a), Some(-1.0));
    }

    #[test]
    fn test_polarity_presence() {
        let a = article(json!({"pos": "0.2", "neu": 0.5}));
        let scores = PolarityScores::from_article(&a).unwrap();
        assert!(!scores.is_complete());
        assert_eq!(scores.dominant(), SentimentLabel::Neutral);
        assert!(PolarityScores::from_article(&ArticleRecord::default()).is_none());
    }
}
