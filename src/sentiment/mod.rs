//! Lexicon-based sentiment scoring for feedback comments.
//!
//! A comment is scored against two fixed keyword lists. The score is a
//! crude positivity signal in `[0, 100]`: 100 means every matched keyword
//! was positive, 0 means every matched keyword was negative, and 50 means
//! no signal (no keyword matched at all, or an even split).
//!
//! Scoring happens exactly once, when feedback is created; the stored
//! score is never recomputed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Keywords counted as positive signal.
pub const POSITIVE_WORDS: [&str; 12] = [
    "good",
    "great",
    "excellent",
    "amazing",
    "fantastic",
    "wonderful",
    "helpful",
    "informative",
    "clear",
    "engaging",
    "knowledgeable",
    "friendly",
];

/// Keywords counted as negative signal.
pub const NEGATIVE_WORDS: [&str; 11] = [
    "bad",
    "poor",
    "terrible",
    "awful",
    "confusing",
    "boring",
    "unhelpful",
    "unclear",
    "disorganized",
    "rushed",
    "disappointing",
];

static POSITIVE_MATCHER: Lazy<Regex> = Lazy::new(|| keyword_matcher(&POSITIVE_WORDS));
static NEGATIVE_MATCHER: Lazy<Regex> = Lazy::new(|| keyword_matcher(&NEGATIVE_WORDS));

/// Build a whole-word matcher for a keyword list.
///
/// `\b` boundaries keep substring hits from counting: "goodness" does not
/// match "good".
fn keyword_matcher(words: &[&str]) -> Regex {
    let pattern = format!(r"\b(?:{})\b", words.join("|"));
    Regex::new(&pattern).expect("keyword lists form a valid pattern")
}

/// Score a free-text comment.
///
/// Counts whole-word, case-insensitive occurrences of each keyword, then
/// returns the positive share of all matches as a percentage. When no
/// keyword matches (including the empty string), returns 50.
///
/// Rounding is round-half-up: the ratio is non-negative, so
/// [`f64::round`]'s ties-away-from-zero behavior rounds exact `.5`
/// boundaries upward.
///
/// Pure and total: any string input produces a score in `[0, 100]` with
/// no I/O and no shared state.
pub fn score(comment: &str) -> u8 {
    let lowered = comment.to_lowercase();
    let positive = POSITIVE_MATCHER.find_iter(&lowered).count();
    let negative = NEGATIVE_MATCHER.find_iter(&lowered).count();

    if positive == 0 && negative == 0 {
        return 50;
    }

    let total = (positive + negative) as f64;
    (positive as f64 / total * 100.0).round() as u8
}

/// Display bucket derived from a sentiment score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SentimentCategory {
    Positive,
    Neutral,
    Negative,
}

impl SentimentCategory {
    /// Bucket a score: >= 70 is positive, 40..70 is neutral, below 40 is
    /// negative.
    pub fn from_score(score: u8) -> Self {
        if score >= 70 {
            Self::Positive
        } else if score >= 40 {
            Self::Neutral
        } else {
            Self::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

/// Per-category counts over a set of sentiment scores.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SentimentDistribution {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl SentimentDistribution {
    pub fn tally(scores: impl IntoIterator<Item = u8>) -> Self {
        let mut distribution = Self::default();
        for score in scores {
            match SentimentCategory::from_score(score) {
                SentimentCategory::Positive => distribution.positive += 1,
                SentimentCategory::Neutral => distribution.neutral += 1,
                SentimentCategory::Negative => distribution.negative += 1,
            }
        }
        distribution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_comment_is_neutral() {
        assert_eq!(score(""), 50);
    }

    #[test]
    fn comment_without_keywords_is_neutral() {
        assert_eq!(score("the session covered databases and indexing"), 50);
    }

    #[test]
    fn only_positive_keywords_score_100() {
        assert_eq!(score("great and engaging"), 100);
        assert_eq!(score("helpful"), 100);
    }

    #[test]
    fn only_negative_keywords_score_0() {
        assert_eq!(score("boring and confusing"), 0);
        assert_eq!(score("rushed"), 0);
    }

    #[test]
    fn substring_hits_do_not_count() {
        // "goodness" contains "good" but is not a whole-word match
        assert_eq!(score("goodness"), 50);
        assert_eq!(score("unclearly clarified"), 50);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(score("GREAT session"), score("great session"));
        assert_eq!(score("Boring"), 0);
    }

    #[test]
    fn repeated_keywords_count_each_occurrence() {
        // 3 positive, 1 negative -> round(3/4 * 100) = 75
        assert_eq!(score("good good good bad"), 75);
    }

    #[test]
    fn mixed_comment_with_even_split_scores_50() {
        let comment =
            "The trainer was great and knowledgeable, but the pace was confusing and rushed.";
        assert_eq!(score(comment), 50);
    }

    #[test]
    fn exact_half_rounds_up() {
        // 1 positive of 3 matches -> round(33.33) = 33; 2 of 3 -> 67
        assert_eq!(score("good bad poor"), 33);
        assert_eq!(score("good great bad"), 67);
        // 1 of 2 is an exact .5 tie in counts and lands on 50
        assert_eq!(score("good bad"), 50);
    }

    #[test]
    fn punctuation_and_unicode_are_handled() {
        assert_eq!(score("great, great; great!"), 100);
        assert_eq!(score("très bad"), 0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let comment = "helpful but disorganized";
        assert_eq!(score(comment), score(comment));
    }

    #[test]
    fn categories_follow_thresholds() {
        assert_eq!(SentimentCategory::from_score(100), SentimentCategory::Positive);
        assert_eq!(SentimentCategory::from_score(70), SentimentCategory::Positive);
        assert_eq!(SentimentCategory::from_score(69), SentimentCategory::Neutral);
        assert_eq!(SentimentCategory::from_score(50), SentimentCategory::Neutral);
        assert_eq!(SentimentCategory::from_score(40), SentimentCategory::Neutral);
        assert_eq!(SentimentCategory::from_score(39), SentimentCategory::Negative);
        assert_eq!(SentimentCategory::from_score(0), SentimentCategory::Negative);
    }

    #[test]
    fn distribution_tallies_by_category() {
        let distribution = SentimentDistribution::tally([100, 85, 50, 40, 10]);
        assert_eq!(
            distribution,
            SentimentDistribution {
                positive: 2,
                neutral: 2,
                negative: 1,
            }
        );
    }

    #[test]
    fn distribution_of_nothing_is_empty() {
        assert_eq!(SentimentDistribution::tally([]), SentimentDistribution::default());
    }
}
