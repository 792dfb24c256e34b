//! The bibliography module converts the BIBLIOGRAFIA section (or an
//! already-structured entry sequence) into citation/URL pairs, synthesizing
//! a search-engine fallback URL when none is given.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::constants::SEARCH_URL_BASE;
use crate::guide::{BibliographyEntry, BibliographySource};

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://\S+").expect("Failed to compile URL_RE"));

/// A "| URL" tail accidentally left inside citation text.
static EMBEDDED_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\|\s*(https?://\S+)").expect("Failed to compile EMBEDDED_URL_RE")
});

static TRAILING_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\|\s*https?://\S+\s*$").expect("Failed to compile TRAILING_URL_RE")
});

/// Parses bibliography input into entries with a guaranteed non-empty link.
///
/// Structured input passes through, with missing links recovered from a
/// "| URL" tail inside the text or synthesized from the citation. Text input
/// is parsed line by line: the preferred shape is `<citation> | <URL or
/// NO_LINK>` split on the last pipe; failing that an inline URL is extracted
/// and stripped from the display text; failing that a search URL is
/// synthesized. Total over arbitrary input.
pub fn parse_bibliography(source: &BibliographySource) -> Vec<BibliographyEntry> {
    match source {
        BibliographySource::Entries(entries) => entries.iter().map(normalize_entry).collect(),
        BibliographySource::Text(text) => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(entry_from_line)
            .collect(),
    }
}

/// Builds the deterministic search-engine URL used whenever a citation has no
/// explicit link. Quotes and parentheses are dropped from the query.
pub fn make_search_url(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '(' | ')'))
        .collect();
    Url::parse_with_params(SEARCH_URL_BASE, [("q", cleaned.trim())])
        .map_or_else(|_| SEARCH_URL_BASE.to_string(), |built| built.to_string())
}

/// Parses one bibliography line into an entry.
pub fn entry_from_line(line: &str) -> BibliographyEntry {
    if let Some((text_part, link_part)) = line.rsplit_once('|') {
        let text = text_part.trim().to_string();
        let candidate = link_part.trim();
        if candidate.is_empty() || candidate.eq_ignore_ascii_case("NO_LINK") {
            let link = make_search_url(&text);
            return BibliographyEntry { text, link };
        }
        return BibliographyEntry {
            text,
            link: candidate.to_string(),
        };
    }
    if let Some(found) = URL_RE.find(line) {
        let display = line.replacen(found.as_str(), "", 1).trim().to_string();
        return BibliographyEntry {
            text: if display.is_empty() {
                line.to_string()
            } else {
                display
            },
            link: found.as_str().to_string(),
        };
    }
    BibliographyEntry {
        text: line.to_string(),
        link: make_search_url(line),
    }
}

/// Guarantees a structured entry has a usable link and no URL artifact left
/// in its citation text.
fn normalize_entry(entry: &BibliographyEntry) -> BibliographyEntry {
    let mut link = entry.link.trim().to_string();
    if link.is_empty()
        && let Some(caps) = EMBEDDED_URL_RE.captures(&entry.text)
        && let Some(found) = caps.get(1)
    {
        link = found.as_str().to_string();
    }
    let text = TRAILING_URL_RE.replace(&entry.text, "").trim().to_string();
    if link.is_empty() {
        link = make_search_url(&text);
    }
    BibliographyEntry { text, link }
}
