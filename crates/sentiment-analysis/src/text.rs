//! Clean-up of untrusted article text before it is displayed.
//!
//! [`sanitize`] is used for sentiment-article excerpts: it drops links and
//! normalizes whitespace but leaves other markup alone. [`sanitize_listing`]
//! is the stricter variant for the news listing, which also strips every tag
//! and decodes character entities.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static ANCHOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b[^>]*>.*?</a>").expect("anchor pattern"));
static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("url pattern"));
static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("whitespace pattern"));
static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));
static ENTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);").expect("entity pattern")
});

/// Removes hyperlink spans and bare URLs, then collapses whitespace.
///
/// Idempotent: `sanitize(&sanitize(x)) == sanitize(x)`.
pub fn sanitize(text: &str) -> String {
    let without_links = strip_links(text);
    WHITESPACE_REGEX
        .replace_all(&without_links, " ")
        .trim()
        .to_string()
}

/// Strips all tags and decodes entities, then applies [`sanitize`].
pub fn sanitize_listing(text: &str) -> String {
    let without_tags = TAG_REGEX.replace_all(text, "");
    sanitize(&decode_entities(&without_tags))
}

/// Sanitized text cut to at most `max_chars` characters, with `…` when cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let clean = sanitize(text);
    if clean.chars().count() <= max_chars {
        return clean;
    }
    let cut: String = clean.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

// Removing one link can splice its neighbours into a new one, so repeat until
// nothing changes. Each pass only deletes text, so this terminates.
fn strip_links(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let without_anchors = ANCHOR_REGEX.replace_all(&current, "");
        let next = URL_REGEX.replace_all(&without_anchors, "").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Decodes numeric and common named entities in one pass.
/// `&amp;lt;` becomes `&lt;`, not `<`. Unknown entities are kept as written.
fn decode_entities(text: &str) -> String {
    ENTITY_REGEX
        .replace_all(text, |caps: &Captures| match decode_entity(&caps[1]) {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn decode_entity(body: &str) -> Option<char> {
    if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .filter(|c| *c != '\0');
    }
    if let Some(dec) = body.strip_prefix('#') {
        return dec
            .parse::<u32>()
            .ok()
            .and_then(char::from_u32)
            .filter(|c| *c != '\0');
    }

    let c = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "hellip" => '\u{2026}',
        "bull" => '\u{2022}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        "euro" => '\u{20ac}',
        "pound" => '\u{a3}',
        _ => return None,
    };
    Some(c)
}
