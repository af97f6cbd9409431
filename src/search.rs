// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Case-insensitive text search across both content channels of a document.

use crate::models::Document;

/// Characters of context kept on each side of a match.
const EXCERPT_RADIUS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Primary,
    Secondary,
}

/// The first match of a query in one channel of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub document_id: String,
    pub page_number: usize,
    pub channel: Channel,
    pub excerpt: String,
    /// Character range of the match within the channel text.
    pub highlight: (usize, usize),
}

/// Find `query` in every page, reporting at most one hit per channel per page.
pub fn search_document(document: &Document, query: &str) -> Vec<SearchResult> {
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();
    for (page_number, page) in document.pages.iter().enumerate() {
        for (channel, text) in [
            (Channel::Primary, &page.content.primary),
            (Channel::Secondary, &page.content.secondary),
        ] {
            if let Some((excerpt, highlight)) = find_match(text, &needle) {
                results.push(SearchResult {
                    document_id: document.id.clone(),
                    page_number,
                    channel,
                    excerpt,
                    highlight,
                });
            }
        }
    }
    results
}

fn find_match(text: &str, needle: &[char]) -> Option<(String, (usize, usize))> {
    let chars: Vec<char> = text.chars().collect();
    // Lowercasing can expand a char, so each lowered char remembers the
    // index of the char it came from.
    let (lowered, origin): (Vec<char>, Vec<usize>) = chars
        .iter()
        .enumerate()
        .flat_map(|(i, c)| c.to_lowercase().map(move |l| (l, i)))
        .unzip();

    let hit = lowered
        .windows(needle.len())
        .position(|window| window == needle)?;
    let start = origin[hit];
    let end = origin[hit + needle.len() - 1] + 1;

    let from = start.saturating_sub(EXCERPT_RADIUS);
    let to = (start + EXCERPT_RADIUS).min(chars.len());
    let excerpt = chars[from..to].iter().collect();
    Some((excerpt, (start, end)))
}
