//! Fuzzy matching over event descriptions.

use serde::Serialize;
use strsim::normalized_damerau_levenshtein;

use crate::store::EventRecord;

/// A description matching a query, by position in the indexed records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchHit {
    pub index: usize,
    pub score: f64,
}

/// Normalized descriptions of a fixed set of records.
///
/// Must be rebuilt whenever the record set changes; hit indices refer to
/// positions in the slice the index was built from.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<Vec<String>>,
}

impl SearchIndex {
    pub fn new<'a>(records: impl IntoIterator<Item = &'a EventRecord>) -> Self {
        let entries = records
            .into_iter()
            .map(|record| words(record.description()))
            .collect();
        SearchIndex { entries }
    }

    /// Hits scoring at least `threshold`, best first. Equal scores keep
    /// index order.
    pub fn search(&self, query: &str, threshold: f64) -> Vec<SearchHit> {
        let query_words = words(query);
        if query_words.is_empty() {
            return Vec::new();
        }
        let query = Query::new(&query_words);

        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                let score = score(&query, candidate, threshold);
                (score > 0.0 && score >= threshold).then_some(SearchHit { index, score })
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits
    }
}

struct Query {
    text: String,
    chars: usize,
    words: usize,
}

impl Query {
    fn new(words: &[String]) -> Self {
        let text = words.join(" ");
        Query {
            chars: text.chars().count(),
            text,
            words: words.len(),
        }
    }

    /// Best similarity any text of `chars` characters could reach: the
    /// edit distance is at least the length difference.
    fn ceiling(&self, chars: usize) -> f64 {
        let (short, long) = if chars < self.chars {
            (chars, self.chars)
        } else {
            (self.chars, chars)
        };
        short as f64 / long as f64
    }
}

/// Lowercase, drop symbols, split on whitespace.
fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Best similarity of the query against the whole candidate or any run of
/// roughly as many words in it. A verbatim occurrence scores 1.0.
///
/// Texts whose length alone keeps them below `threshold` or below the best
/// score so far are not compared, so results under `threshold` may be
/// reported lower than their true similarity.
fn score(query: &Query, candidate: &[String], threshold: f64) -> f64 {
    if candidate.is_empty() {
        return 0.0;
    }

    let joined = candidate.join(" ");
    if joined.contains(&query.text) {
        return 1.0;
    }

    // offsets[i] = characters in the first i words, separators included
    let mut offsets = Vec::with_capacity(candidate.len() + 1);
    let mut total = 0;
    offsets.push(total);
    for word in candidate {
        total += word.chars().count() + 1;
        offsets.push(total);
    }

    // Only compare texts that could beat both the threshold and `best`
    let worth_comparing = |chars: usize, best: f64| {
        let ceiling = query.ceiling(chars);
        ceiling >= threshold && ceiling > best
    };

    let mut best = 0.0_f64;
    if worth_comparing(offsets[candidate.len()] - 1, best) {
        best = normalized_damerau_levenshtein(&query.text, &joined);
    }

    let min_len = query.words.saturating_sub(1).max(1);
    for len in min_len..=query.words + 1 {
        for start in 0..candidate.len().saturating_sub(len - 1) {
            let chars = offsets[start + len] - offsets[start] - 1;
            if worth_comparing(chars, best) {
                let window = candidate[start..start + len].join(" ");
                best = best.max(normalized_damerau_levenshtein(&query.text, &window));
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationToken;
    use crate::store::{EventInstant, StoredEvent};
    use chrono::{TimeZone, Utc};

    fn record(description: Option<&str>) -> EventRecord {
        EventRecord {
            location: LocationToken::new("Building13", "A123"),
            event: StoredEvent {
                uid: "uid".to_string(),
                summary: "summary".to_string(),
                description: description.map(str::to_string),
                start: EventInstant {
                    date: Utc.with_ymd_and_hms(2025, 3, 17, 8, 0, 0).unwrap(),
                },
                end: None,
            },
        }
    }

    fn index(descriptions: &[Option<&str>]) -> SearchIndex {
        let records: Vec<_> = descriptions.iter().map(|d| record(*d)).collect();
        SearchIndex::new(&records)
    }

    #[test]
    fn test_words_normalizes() {
        assert_eq!(
            words("  Linear-Algebra,  LECTURE!  "),
            vec!["linear", "algebra", "lecture"]
        );
    }

    #[test]
    fn test_exact_substring_scores_one() {
        let idx = index(&[Some("Introduction to Linear Algebra, lecture 3")]);
        let hits = idx.search("linear algebra", 0.2);
        assert_eq!(hits, vec![SearchHit { index: 0, score: 1.0 }]);
    }

    #[test]
    fn test_typo_still_matches_below_exact() {
        let idx = index(&[Some("Linear algebra"), Some("Linaer algebra")]);
        let hits = idx.search("linear algebra", 0.2);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].index, 0);
        assert_eq!(hits[0].score, 1.0);
        assert!(hits[1].score < 1.0);
        assert!(hits[1].score > 0.8);
    }

    #[test]
    fn test_threshold_filters_weak_matches() {
        let idx = index(&[Some("Organic chemistry lab"), Some("Linear algebra")]);
        let hits = idx.search("algebra", 0.9);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 1);
    }

    #[test]
    fn test_missing_description_never_matches() {
        let idx = index(&[None, Some("")]);
        assert!(idx.search("anything", 0.0).is_empty());
    }

    #[test]
    fn test_ties_keep_index_order() {
        let idx = index(&[Some("exam"), Some("other"), Some("final exam")]);
        let hits = idx.search("exam", 0.5);
        let indices: Vec<_> = hits.iter().map(|h| h.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    /// Every window compared, no length shortcut.
    fn full_scan(query: &str, candidate: &[String]) -> f64 {
        let query_len = words(query).len();
        let mut best = normalized_damerau_levenshtein(query, &candidate.join(" "));
        for len in query_len.saturating_sub(1).max(1)..=query_len + 1 {
            for window in candidate.windows(len) {
                best = best.max(normalized_damerau_levenshtein(query, &window.join(" ")));
            }
        }
        best
    }

    #[test]
    fn test_length_shortcut_keeps_best_score() {
        let descriptions = [
            "Seminar on numerical linear algebra methods for sparse systems",
            "Organic chemistry laboratory safety briefing",
            "a",
            "Linaer algebr exercise group",
            "Thesis defence: stochastic processes in population genetics",
        ];
        for query in ["linear algebra", "chemistry", "thesis defense stochastic", "x"] {
            let q = Query::new(&words(query));
            for description in descriptions {
                let candidate = words(description);
                if candidate.join(" ").contains(&q.text) {
                    continue;
                }
                let expected = full_scan(&q.text, &candidate);
                assert_eq!(score(&q, &candidate, 0.0), expected, "{query} / {description}");
                if expected >= 0.5 {
                    assert_eq!(score(&q, &candidate, 0.5), expected, "{query} / {description}");
                }
            }
        }
    }

    #[test]
    fn test_empty_query_has_no_hits() {
        let idx = index(&[Some("exam")]);
        assert!(idx.search("  ", 0.2).is_empty());
        assert!(idx.search("!!", 0.2).is_empty());
    }
}
