//! Terminal rendering of the results and news screens.

use analysis_core::{AnalysisResult, AnalyzeRequest, ArticleRecord, Fundamentals, NewsCategory, NewsFeed};
use sentiment_analysis::{aggregate, excerpt, sanitize, sanitize_listing, SentimentLabel, SentimentSummary};

use crate::format::{
    format_count, format_currency, format_currency_crore, format_date, format_percent,
    format_ratio, format_score, format_signed_percent, or_na, score_bar,
};
use crate::settings::Theme;

const BAR_WIDTH: usize = 10;
const EXCERPT_CHARS: usize = 160;
const LABEL_WIDTH: usize = 22;

pub const CONFIDENT_BADGE: &str = "✓ Confident to Invest";
pub const NOT_CONFIDENT_BADGE: &str = "✗ Not Confident to Invest";
pub const MOSTLY_NEUTRAL_HINT: &str =
    "Most articles read as neutral, so news sentiment carries little signal for this stock.";

/// ANSI colours for one theme. Every field is empty in plain mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub heading: &'static str,
    pub positive: &'static str,
    pub negative: &'static str,
    pub neutral: &'static str,
    pub muted: &'static str,
    reset: &'static str,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                heading: "\x1b[1;97m",
                positive: "\x1b[92m",
                negative: "\x1b[91m",
                neutral: "\x1b[93m",
                muted: "\x1b[90m",
                reset: "\x1b[0m",
            },
            Theme::Light => Self {
                heading: "\x1b[1;30m",
                positive: "\x1b[32m",
                negative: "\x1b[31m",
                neutral: "\x1b[33m",
                muted: "\x1b[2m",
                reset: "\x1b[0m",
            },
        }
    }

    pub fn plain() -> Self {
        Self {
            heading: "",
            positive: "",
            negative: "",
            neutral: "",
            muted: "",
            reset: "",
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if color.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", color, text, self.reset)
        }
    }

    fn sentiment(&self, label: SentimentLabel) -> &'static str {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }

    fn signed(&self, value: f64) -> &'static str {
        if value >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }
}

/// The analysis screen for one result and the request that produced it.
pub fn results(result: &AnalysisResult, request: &AnalyzeRequest, palette: &Palette) -> String {
    let mut lines = Vec::new();

    lines.push(palette.paint(palette.heading, &result.ticker));
    lines.push(format!(
        "{}  {}",
        format_currency(result.current_price),
        palette.paint(palette.signed(result.price_change), &format_signed_percent(result.price_change)),
    ));
    lines.push(String::new());

    let confident = result.clears_threshold(request.threshold);
    let badge = if confident { CONFIDENT_BADGE } else { NOT_CONFIDENT_BADGE };
    let badge_color = if confident { palette.positive } else { palette.negative };
    lines.push(palette.paint(badge_color, badge));
    lines.push(format!(
        "Final Score: {} / 1.00 (Threshold: {})",
        format_score(result.final_score),
        format_score(request.threshold)
    ));
    if let Some(suggested) = result.suggested_threshold.filter(|t| t.is_finite()) {
        lines.push(palette.paint(
            palette.muted,
            &format!("Suggested threshold: {}", format_score(suggested)),
        ));
    }
    lines.push(String::new());

    let sentiment_note = format!("Based on {} news articles", request.max_news);
    for (title, score, note) in [
        ("Sentiment Score", result.sentiment_score, sentiment_note.as_str()),
        ("Technical Score", result.technical_score, "RSI, MACD, Moving Averages"),
        ("Fundamental Score", result.fundamental_score, "Revenue, Margins, P/E Ratio"),
    ] {
        lines.push(format!(
            "{:<20}{}  {}  {}",
            title,
            format_score(score),
            score_bar(score, BAR_WIDTH),
            palette.paint(palette.muted, note)
        ));
    }
    lines.push(String::new());

    lines.push(palette.paint(palette.heading, "Fundamentals"));
    for (label, value) in fundamentals_rows(&result.fundamentals) {
        lines.push(format!("  {:<width$}{}", label, value, width = LABEL_WIDTH));
    }
    lines.push(String::new());

    lines.extend(sentiment_section(&result.articles, palette));
    lines.join("\n")
}

/// Display rows for the fundamentals table. Missing figures read `N/A`.
pub fn fundamentals_rows(f: &Fundamentals) -> Vec<(&'static str, String)> {
    vec![
        ("Market Price", or_na(f.market_price, format_currency)),
        ("Total Revenue", or_na(f.total_revenue, format_currency_crore)),
        ("Net Income", or_na(f.net_income, format_currency_crore)),
        ("Revenue Growth (YoY)", or_na(f.revenue_yoy, format_signed_percent)),
        ("Net Margin", or_na(f.net_margin, format_percent)),
        ("EPS (TTM)", or_na(f.trailing_eps, format_currency)),
        ("P/E Ratio", or_na(f.trailing_pe, format_ratio)),
        ("Shares Outstanding", or_na(f.shares_outstanding, format_count)),
    ]
}

fn sentiment_section(articles: &[ArticleRecord], palette: &Palette) -> Vec<String> {
    let summary = aggregate(articles);
    let mut lines = vec![palette.paint(
        palette.heading,
        &format!("News Sentiment ({} articles)", summary.total),
    )];

    if summary.total == 0 {
        lines.push(palette.paint(palette.muted, "  No news articles were returned."));
        return lines;
    }

    lines.extend(breakdown_lines(&summary, palette));
    if summary.mostly_neutral {
        lines.push(palette.paint(palette.muted, &format!("  {}", MOSTLY_NEUTRAL_HINT)));
    }

    for (article, label) in articles.iter().zip(&summary.labels) {
        lines.push(String::new());
        let title = article.display_title().map(sanitize).unwrap_or_default();
        lines.push(format!(
            "  {} {}",
            palette.paint(palette.sentiment(*label), &format!("[{}]", label)),
            if title.is_empty() { "Untitled" } else { title.as_str() }
        ));
        if let Some(meta) = article_meta(article) {
            lines.push(format!("    {}", palette.paint(palette.muted, &meta)));
        }
        if let Some(body) = article.body().map(|b| excerpt(b, EXCERPT_CHARS)).filter(|b| !b.is_empty()) {
            lines.push(format!("    {}", body));
        }
    }
    lines
}

fn breakdown_lines(summary: &SentimentSummary, palette: &Palette) -> Vec<String> {
    [SentimentLabel::Positive, SentimentLabel::Neutral, SentimentLabel::Negative]
        .into_iter()
        .map(|label| {
            format!(
                "  {}{:>4}  {:>3}%",
                palette.paint(palette.sentiment(label), &format!("{:<10}", label.to_label())),
                summary.counts.get(label),
                summary.percentages.get(label)
            )
        })
        .collect()
}

/// The news listing for one category.
pub fn news(category: NewsCategory, feed: &NewsFeed, palette: &Palette) -> String {
    let mut lines = vec![palette.paint(palette.heading, category.label())];

    if feed.articles.is_empty() {
        lines.push(palette.paint(palette.muted, "No news available right now."));
        return lines.join("\n");
    }

    for (i, article) in feed.articles.iter().enumerate() {
        lines.push(String::new());
        let title = article.display_title().map(sanitize_listing).unwrap_or_default();
        lines.push(format!(
            "{:>2}. {}",
            i + 1,
            if title.is_empty() { "Untitled" } else { title.as_str() }
        ));
        if let Some(meta) = article_meta(article) {
            lines.push(format!("    {}", palette.paint(palette.muted, &meta)));
        }
        let body = article
            .body()
            .map(|b| excerpt(&sanitize_listing(b), EXCERPT_CHARS))
            .unwrap_or_default();
        if !body.is_empty() {
            lines.push(format!("    {}", body));
        }
        if let Some(url) = article.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            lines.push(format!("    {}", palette.paint(palette.muted, url)));
        }
    }
    lines.join("\n")
}

fn article_meta(article: &ArticleRecord) -> Option<String> {
    let date = article.published_time().map(|t| format_date(&t)).or_else(|| {
        article
            .published_at
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
    });

    match (article.publisher(), date) {
        (Some(source), Some(date)) => Some(format!("{} | {}", source, date)),
        (Some(source), None) => Some(source.to_string()),
        (None, Some(date)) => Some(date),
        (None, None) => None,
    }
}
