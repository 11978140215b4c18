//! Recovery parser for chat-model replies.
//!
//! The model is asked for `标题N:` lines plus a `正文:` block, but replies
//! arrive as strict JSON, JSON inside a code fence, loosely labeled text, or
//! garbage. Each extraction strategy below is a pure function; `parse_reply`
//! composes them in a fixed priority order and always returns a valid
//! [`Post`], substituting placeholders when every strategy comes up short.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::post::{Post, TITLE_COUNT};

static TITLE_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"标题\d+[:：]\s*(.+)").unwrap());
static CONTENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)正文[:：]\s*(.+?)(?:\n\n|$)").unwrap());
static FENCED_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[\w-]*\s*\n(.*?)```").unwrap());
static NUMBERED_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*\d+[.、]\s*(.+)$").unwrap());
static BULLET_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[-•]\s*(.+)$").unwrap());
static QUOTED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"\n]+)""#).unwrap());

/// Tokens that mark a line or paragraph as structural output rather than
/// copy, used by the last-resort scans.
const TITLE_DENY_TOKENS: [&str; 4] = ["：", "JSON", "content", "properties"];
const PARAGRAPH_DENY_TOKENS: [&str; 4] = ["标题", "{", "}", "properties"];

#[derive(Debug, Deserialize)]
struct JsonPost {
    titles: Vec<String>,
    content: String,
}

/// Total function: any input produces a post with five titles and non-empty
/// content. Title and content extraction are independent, so a reply with
/// usable titles and a mangled body (or vice versa) degrades per field.
pub fn parse_reply(raw: &str) -> Post {
    // A reply that quotes its own output schema can pass the JSON strategies
    // while containing nothing usable, so this check runs first.
    if is_schema_echo(raw) {
        return Post::schema_echo();
    }

    if let Some(parsed) = strict_json(raw).or_else(|| fenced_json(raw)) {
        return Post::new(parsed.titles, parsed.content);
    }

    let titles = labeled_titles(raw)
        .or_else(|| listed_titles(raw))
        .or_else(|| short_line_titles(raw))
        .unwrap_or_default();

    let content = labeled_content(raw)
        .or_else(|| paragraph_content(raw))
        .or_else(|| long_line_content(raw))
        .unwrap_or_default();

    Post::new(titles, content)
}

fn is_schema_echo(raw: &str) -> bool {
    raw.contains("properties") && raw.contains("required")
}

fn strict_json(raw: &str) -> Option<JsonPost> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

fn fenced_json(raw: &str) -> Option<JsonPost> {
    FENCED_BLOCK_RE
        .captures_iter(raw)
        .filter_map(|caps| serde_json::from_str(caps.get(1)?.as_str().trim()).ok())
        .next()
}

/// `标题1: …` lines, kept in order of appearance (models sometimes number
/// them out of order).
fn labeled_titles(raw: &str) -> Option<Vec<String>> {
    collect_captures(&TITLE_LINE_RE, raw)
}

/// Numbered, bulleted, or double-quoted lists; the first pattern kind that
/// yields a full set wins.
fn listed_titles(raw: &str) -> Option<Vec<String>> {
    [&NUMBERED_LINE_RE, &BULLET_LINE_RE, &QUOTED_RE]
        .into_iter()
        .find_map(|re| collect_captures(re, raw))
}

fn collect_captures(re: &Regex, raw: &str) -> Option<Vec<String>> {
    let matches: Vec<String> = re
        .captures_iter(raw)
        .filter_map(|caps| Some(caps.get(1)?.as_str().trim().to_string()))
        .collect();
    full_title_set(matches)
}

/// Last resort for titles: any short line that doesn't look structural.
fn short_line_titles(raw: &str) -> Option<Vec<String>> {
    let candidates: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && line.chars().count() <= 50
                && !line.starts_with('{')
                && !line.starts_with('}')
                && !TITLE_DENY_TOKENS.iter().any(|token| line.contains(token))
        })
        .map(str::to_string)
        .collect();
    full_title_set(candidates)
}

fn full_title_set(mut candidates: Vec<String>) -> Option<Vec<String>> {
    if candidates.len() < TITLE_COUNT {
        return None;
    }
    candidates.truncate(TITLE_COUNT);
    Some(candidates)
}

/// Everything after a `正文:` marker, up to the next blank line or the end
/// of the reply.
fn labeled_content(raw: &str) -> Option<String> {
    let caps = CONTENT_RE.captures(raw)?;
    let body = caps.get(1)?.as_str().trim();
    if body.is_empty() {
        return None;
    }
    Some(body.to_string())
}

/// First substantial paragraph that doesn't look structural.
fn paragraph_content(raw: &str) -> Option<String> {
    raw.split("\n\n")
        .map(str::trim)
        .find(|para| {
            para.chars().count() > 50
                && !PARAGRAPH_DENY_TOKENS
                    .iter()
                    .any(|token| para.contains(token))
        })
        .map(str::to_string)
}

/// Last resort for content: the first long line, verbatim.
fn long_line_content(raw: &str) -> Option<String> {
    raw.lines()
        .find(|line| line.chars().count() > 100)
        .map(str::to_string)
}
