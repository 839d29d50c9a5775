//! Fuzzy ranking of catalog entries against a search query.
//!
//! Pure and allocation-light: it runs on every keystroke while the menu
//! filter is active. Integer arithmetic throughout, so ranking is stable
//! across platforms.

use crate::catalog::CatalogEntry;

const MATCH_POINTS: usize = 10;
const CONSECUTIVE_STEP: usize = 5;
const WORD_START_POINTS: usize = 8;
const POSITION_MAX: usize = 50;
const COMPACTNESS_MAX: usize = 25;
const NAME_MATCH_BOOST: usize = 50;

/// Filter and rank `entries` against `query`
///
/// An empty query returns every entry in its original order, unscored.
/// Otherwise entries scoring 0 are dropped and the rest are sorted best
/// first; equal scores keep their original relative order.
pub fn filter_commands(query: &str, entries: &[CatalogEntry]) -> Vec<CatalogEntry> {
    if query.is_empty() {
        return entries.to_vec();
    }

    let query: Vec<char> = query.to_lowercase().chars().collect();

    let mut scored: Vec<(usize, &CatalogEntry)> = entries
        .iter()
        .map(|entry| (entry_score(entry, &query), entry))
        .filter(|(score, _)| *score > 0)
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored.into_iter().map(|(_, entry)| *entry).collect()
}

/// Overall score of one entry: best of name/description, plus a flat boost
/// when the name itself matched
pub fn entry_score(entry: &CatalogEntry, query: &[char]) -> usize {
    let name: Vec<char> = entry.name.to_lowercase().chars().collect();
    let description: Vec<char> = entry.description.to_lowercase().chars().collect();

    let name_score = field_score(&name, query);
    let description_score = field_score(&description, query);

    let best = name_score.max(description_score);
    if name_score > 0 {
        best + NAME_MATCH_BOOST
    } else {
        best
    }
}

/// Greedy subsequence score of `query` inside `text`; 0 means no match
fn field_score(text: &[char], query: &[char]) -> usize {
    if query.is_empty() || text.is_empty() {
        return 0;
    }

    let mut query_idx = 0;
    let mut score = 0;
    let mut run_bonus = 0;
    let mut positions: Vec<usize> = Vec::with_capacity(query.len());

    for (i, &ch) in text.iter().enumerate() {
        if query_idx >= query.len() || ch != query[query_idx] {
            continue;
        }

        positions.push(i);
        score += MATCH_POINTS;

        // A run continues when the previous text char equals the previous
        // query char, whether or not that char was the one matched.
        if query_idx > 0 && i > 0 && text[i - 1] == query[query_idx - 1] {
            run_bonus += CONSECUTIVE_STEP;
            score += run_bonus;
        } else {
            run_bonus = 0;
        }

        if i == 0 || text[i - 1] == ' ' || text[i - 1] == '-' {
            score += WORD_START_POINTS;
        }

        query_idx += 1;
    }

    if query_idx < query.len() {
        return 0;
    }

    score + position_bonus(&positions, text.len()) + compactness_bonus(&positions, text.len())
}

/// Up to 50 points for matches concentrated near the start
fn position_bonus(positions: &[usize], len: usize) -> usize {
    if positions.is_empty() || len == 0 {
        return 0;
    }
    let average = positions.iter().sum::<usize>() / positions.len();
    POSITION_MAX.saturating_sub(average * POSITION_MAX / len)
}

/// Up to 25 points for tightly clustered matches
fn compactness_bonus(positions: &[usize], len: usize) -> usize {
    match (positions.first(), positions.last()) {
        (Some(first), Some(last)) if positions.len() > 1 => {
            let span = last - first + 1;
            COMPACTNESS_MAX.saturating_sub(span * COMPACTNESS_MAX / len)
        }
        _ => 0,
    }
}
