// Inverted-index helpers: tokenizing names, diffing word sets on rename,
// intersecting posting lists and tf-idf ranking of the candidates.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Entity kinds that carry a searchable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Team,
    Tournament,
    User,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Team => "team",
            SearchKind::Tournament => "tournament",
            SearchKind::User => "user",
        }
    }
}

/// Lowercased, trimmed form of a name. Term frequencies are counted on it.
pub fn keyname(name: &str) -> String {
    tokenize(name).join(" ")
}

/// Split a name into lowercase words.
pub fn tokenize(name: &str) -> Vec<String> {
    name.split_whitespace()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Distinct words of `text`, in order of first appearance.
pub fn set_of_words(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

pub fn count_term(words: &[String], word: &str) -> usize {
    words.iter().filter(|w| w.as_str() == word).count()
}

/// Words to drop and words to add when a name changes from `old` to `new`.
#[derive(Debug, Default, PartialEq)]
pub struct WordDiff {
    pub removed: Vec<String>,
    pub added: Vec<String>,
}

pub fn diff_words(old: &str, new: &str) -> WordDiff {
    let old_words = set_of_words(old);
    let new_words = set_of_words(new);
    WordDiff {
        removed: old_words
            .iter()
            .filter(|w| !new_words.contains(w))
            .cloned()
            .collect(),
        added: new_words
            .iter()
            .filter(|w| !old_words.contains(w))
            .cloned()
            .collect(),
    }
}

/// Ids present in every list, in the order of the first list.
pub fn intersect(lists: &[Vec<i64>]) -> Vec<i64> {
    let Some((first, rest)) = lists.split_first() else {
        return Vec::new();
    };
    let rest: Vec<HashSet<i64>> = rest.iter().map(|l| l.iter().copied().collect()).collect();
    let mut seen = HashSet::new();
    first
        .iter()
        .copied()
        .filter(|id| rest.iter().all(|set| set.contains(id)))
        .filter(|id| seen.insert(*id))
        .collect()
}

fn idf(word_count: usize, doc_freq: usize) -> f64 {
    ((word_count as f64 + 1.0) / (doc_freq as f64 + 1.0)).log10()
}

/// Rank candidate documents against a query with a tf-idf dot product.
///
/// `candidates` are `(id, keyname)` pairs, `word_count` is the number of
/// distinct words indexed for the kind and `doc_freq` maps each query word to
/// the number of documents containing it. Ties keep ascending id order.
pub fn score_query(
    query: &str,
    candidates: &[(i64, String)],
    word_count: usize,
    doc_freq: &HashMap<String, usize>,
) -> Vec<i64> {
    let query_words = tokenize(query);
    let distinct = set_of_words(query);

    let weights: Vec<f64> = distinct
        .iter()
        .map(|w| idf(word_count, doc_freq.get(w).copied().unwrap_or(0)))
        .collect();

    let q: Vec<f64> = distinct
        .iter()
        .zip(&weights)
        .map(|(w, idf)| (1.0 + count_term(&query_words, w) as f64).log10() * idf)
        .collect();

    let mut scored: Vec<(i64, f64)> = candidates
        .iter()
        .map(|(id, name)| {
            let doc_words = tokenize(name);
            let score = distinct
                .iter()
                .zip(&weights)
                .zip(&q)
                .map(|((w, idf), qi)| {
                    (1.0 + count_term(&doc_words, w) as f64).log10() * idf * qi
                })
                .sum::<f64>();
            (*id, score)
        })
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    scored.into_iter().map(|(id, _)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_trims() {
        assert_eq!(tokenize("  Les  Bleus FC "), vec!["les", "bleus", "fc"]);
        assert!(tokenize("   ").is_empty());
        assert_eq!(keyname(" World  CUP "), "world cup");
    }

    #[test]
    fn test_set_of_words_keeps_first_occurrence() {
        assert_eq!(set_of_words("a b a c b"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_count_term() {
        let words = tokenize("go go gonawin go");
        assert_eq!(count_term(&words, "go"), 3);
        assert_eq!(count_term(&words, "gonawin"), 1);
        assert_eq!(count_term(&words, "nope"), 0);
    }

    #[test]
    fn test_diff_words() {
        let diff = diff_words("Red Devils United", "Red Lions united");
        assert_eq!(diff.removed, vec!["devils"]);
        assert_eq!(diff.added, vec!["lions"]);

        let same = diff_words("Foo Bar", "bar foo");
        assert_eq!(same, WordDiff::default());
    }

    #[test]
    fn test_intersect() {
        assert_eq!(intersect(&[vec![3, 1, 2], vec![2, 3], vec![3, 2, 9]]), vec![3, 2]);
        assert_eq!(intersect(&[vec![1, 2]]), vec![1, 2]);
        assert!(intersect(&[vec![1], vec![2]]).is_empty());
        assert!(intersect(&[]).is_empty());
    }

    #[test]
    fn test_score_query_prefers_higher_term_frequency() {
        let candidates = vec![
            (1, "paris club".to_string()),
            (2, "paris paris club".to_string()),
        ];
        let mut df = HashMap::new();
        df.insert("paris".to_string(), 2);
        // "paris", "club" and one word from another document
        let ranked = score_query("paris", &candidates, 3, &df);
        assert_eq!(ranked, vec![2, 1]);
    }

    #[test]
    fn test_score_query_ties_break_by_id() {
        let candidates = vec![(7, "alpha".to_string()), (3, "alpha".to_string())];
        let mut df = HashMap::new();
        df.insert("alpha".to_string(), 2);
        assert_eq!(score_query("alpha", &candidates, 1, &df), vec![3, 7]);
    }

    #[test]
    fn test_search_kind_names() {
        assert_eq!(SearchKind::Team.as_str(), "team");
        assert_eq!(SearchKind::Tournament.as_str(), "tournament");
        assert_eq!(SearchKind::User.as_str(), "user");
    }
}
