//! Usage accounting strategies.
//!
//! A session counts each exchange once. When the backend reports token
//! counts those are preferred; otherwise an estimator fills in.

/// Estimates the usage of one exchange from its two texts.
pub trait UsageEstimator: Send + Sync {
    fn estimate(&self, user_text: &str, assistant_text: &str) -> u64;
}

/// Counts whitespace-delimited words on both sides of the exchange.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCountEstimator;

impl UsageEstimator for WordCountEstimator {
    fn estimate(&self, user_text: &str, assistant_text: &str) -> u64 {
        word_count(user_text).saturating_add(word_count(assistant_text))
    }
}

/// Number of whitespace-delimited words in `text`.
pub fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_count_ignores_surrounding_and_repeated_whitespace() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("hello world"), 2);
        assert_eq!(word_count("  hi \n there\tfriend  "), 3);
    }

    #[test]
    fn word_count_estimator_sums_both_sides() {
        assert_eq!(WordCountEstimator.estimate("hello world", "hi there friend"), 5);
        assert_eq!(WordCountEstimator.estimate("Oi", "Olá!"), 2);
    }
}
