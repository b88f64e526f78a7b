// Prediction scoring and team accuracy.

use serde::Serialize;

/// Points for an exact score.
pub const EXACT_SCORE_POINTS: i64 = 3;
/// Points for predicting the right outcome with the wrong score.
pub const TREND_POINTS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Outcome from team 1's point of view.
    pub fn of(result1: i64, result2: i64) -> Self {
        match result1.cmp(&result2) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::Loss,
        }
    }

    /// Activity verb for a finished match, e.g. "won 2-1 against".
    pub fn verb(&self, result1: i64, result2: i64) -> String {
        let word = match self {
            Outcome::Win => "won",
            Outcome::Draw => "tied",
            Outcome::Loss => "lost",
        };
        format!("{word} {result1}-{result2} against")
    }
}

/// Points earned by a prediction once the real result is known.
pub fn predict_score(actual: (i64, i64), predicted: (i64, i64)) -> i64 {
    if actual == predicted {
        EXACT_SCORE_POINTS
    } else if Outcome::of(actual.0, actual.1) == Outcome::of(predicted.0, predicted.1) {
        TREND_POINTS
    } else {
        0
    }
}

/// Share of the maximum points a team's players collected on one match.
pub fn match_accuracy(sum_scores: i64, players: usize) -> f64 {
    if players == 0 {
        return 0.0;
    }
    sum_scores as f64 / (EXACT_SCORE_POINTS as f64 * players as f64)
}

/// Next value of a running accuracy series.
pub fn next_running_accuracy(history: &[f64], acc: f64) -> f64 {
    let sum: f64 = history.iter().sum();
    (sum + acc) / (history.len() as f64 + 1.0)
}

/// Positions `(start, end)` to read from a feed of `size` entries, walking
/// backwards from `start` down to `end` so the newest entries come first.
/// Returns `None` when the page lies past the end of the feed.
pub fn page_window(size: i64, count: i64, page: i64) -> Option<(i64, i64)> {
    if size <= 0 || count <= 0 || page <= 0 {
        return None;
    }
    let (start, end) = if size - count * page >= 0 {
        let start = size - (page - 1) * count - 1;
        (start, start - count + 1)
    } else {
        (count + size - count * page - 1, 0)
    };
    (start >= 0).then_some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_score() {
        assert_eq!(predict_score((2, 1), (2, 1)), 3);
        assert_eq!(predict_score((0, 0), (0, 0)), 3);
    }

    #[test]
    fn test_trend() {
        assert_eq!(predict_score((2, 1), (1, 0)), 1);
        assert_eq!(predict_score((0, 3), (1, 2)), 1);
        assert_eq!(predict_score((1, 1), (2, 2)), 1);
    }

    #[test]
    fn test_wrong_outcome_scores_nothing() {
        assert_eq!(predict_score((2, 1), (0, 1)), 0);
        assert_eq!(predict_score((2, 1), (1, 1)), 0);
        assert_eq!(predict_score((1, 1), (3, 0)), 0);
    }

    #[test]
    fn test_outcome_verb() {
        assert_eq!(Outcome::of(2, 1).verb(2, 1), "won 2-1 against");
        assert_eq!(Outcome::of(0, 3).verb(0, 3), "lost 0-3 against");
        assert_eq!(Outcome::of(1, 1).verb(1, 1), "tied 1-1 against");
    }

    #[test]
    fn test_match_accuracy() {
        assert_eq!(match_accuracy(0, 0), 0.0);
        assert_eq!(match_accuracy(3, 1), 1.0);
        assert!((match_accuracy(4, 2) - 4.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_running_accuracy() {
        assert_eq!(next_running_accuracy(&[], 0.5), 0.5);
        // two zero-filled matches dilute the first real value
        assert!((next_running_accuracy(&[0.0, 0.0], 0.9) - 0.3).abs() < 1e-9);
        assert!((next_running_accuracy(&[0.5], 1.0) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_page_window_full_pages() {
        assert_eq!(page_window(10, 5, 1), Some((9, 5)));
        assert_eq!(page_window(10, 5, 2), Some((4, 0)));
    }

    #[test]
    fn test_page_window_partial_last_page() {
        assert_eq!(page_window(7, 5, 1), Some((6, 2)));
        assert_eq!(page_window(7, 5, 2), Some((1, 0)));
    }

    #[test]
    fn test_page_window_out_of_range() {
        assert_eq!(page_window(7, 5, 3), None);
        assert_eq!(page_window(0, 5, 1), None);
        assert_eq!(page_window(5, 0, 1), None);
        assert_eq!(page_window(5, 5, 0), None);
    }
}
