// Text feature extraction: the raw linguistic measurements every other
// analyzer builds on.
//
// Tokenization is deliberately simple: split on anything that isn't a
// letter, digit or apostrophe, lowercase, drop empty pieces. Measurements
// that need the original casing (capitalization, punctuation runs) read the
// raw text directly.

use std::collections::HashMap;

use super::lexicon::lexicon;
use super::similarity;

/// Split text into raw word slices, preserving case.
pub fn raw_words(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .collect()
}

/// Lowercased tokens of a text.
pub fn tokens(text: &str) -> Vec<String> {
    raw_words(text).into_iter().map(str::to_lowercase).collect()
}

/// Linguistic measurements of a single review text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFeatures {
    pub tokens: Vec<String>,
    pub char_count: usize,
    pub word_count: usize,
    /// Distinct tokens / total tokens
    pub unique_ratio: f64,
    pub sentence_count: usize,
    pub avg_sentence_length: f64,
    /// Uppercase letters / alphabetic letters
    pub caps_ratio: f64,
    pub exclamation_count: usize,
    /// Runs of two or more consecutive '!' / '?'
    pub punctuation_runs: usize,
    pub superlative_count: usize,
    /// Highest count of any single superlative
    pub max_superlative_repeat: usize,
    /// Longest run of the same word back to back
    pub longest_repeat_run: usize,
    /// Longest run of one repeated non-space character ("soooo", "!!!!")
    pub longest_char_run: usize,
    /// Excess repetition of the most frequent content word, 0-1
    pub dominant_token_ratio: f64,
    pub concrete_count: usize,
    /// Tokens that look misspelled (stretched letters, no vowels)
    pub irregular_count: usize,
    pub intense_count: usize,
    pub generic_phrase_count: usize,
    pub promo_count: usize,
    /// Best match against the fake-review templates, 0 below the match threshold
    pub template_similarity: f64,
}

impl TextFeatures {
    pub fn extract(text: &str) -> Self {
        let lex = lexicon();
        let raw = raw_words(text);
        let tokens: Vec<String> = raw.iter().map(|w| w.to_lowercase()).collect();
        let word_count = tokens.len();

        if word_count == 0 {
            return Self {
                char_count: text.chars().count(),
                exclamation_count: text.matches('!').count(),
                punctuation_runs: count_punctuation_runs(text),
                longest_char_run: longest_char_run(text),
                ..Self::default()
            };
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for token in &tokens {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }
        let unique_ratio = counts.len() as f64 / word_count as f64;

        let (letters, upper) = text
            .chars()
            .filter(|c| c.is_alphabetic())
            .fold((0usize, 0usize), |(l, u), c| {
                (l + 1, u + usize::from(c.is_uppercase()))
            });
        let caps_ratio = if letters == 0 {
            0.0
        } else {
            upper as f64 / letters as f64
        };

        let sentence_lengths: Vec<usize> = text
            .split(['.', '!', '?'])
            .map(|s| raw_words(s).len())
            .filter(|&n| n > 0)
            .collect();
        let sentence_count = sentence_lengths.len().max(1);
        let avg_sentence_length = word_count as f64 / sentence_count as f64;

        let superlative_count = tokens.iter().filter(|t| lex.is_superlative(t)).count();
        let max_superlative_repeat = counts
            .iter()
            .filter(|(t, _)| lex.is_superlative(t))
            .map(|(_, &c)| c)
            .max()
            .unwrap_or(0);

        let mut longest_repeat_run = 1;
        let mut run = 1;
        for pair in tokens.windows(2) {
            if pair[0] == pair[1] {
                run += 1;
                longest_repeat_run = longest_repeat_run.max(run);
            } else {
                run = 1;
            }
        }

        let lower = text.to_lowercase();

        Self {
            char_count: text.chars().count(),
            word_count,
            unique_ratio,
            sentence_count,
            avg_sentence_length,
            caps_ratio,
            exclamation_count: text.matches('!').count(),
            punctuation_runs: count_punctuation_runs(text),
            superlative_count,
            max_superlative_repeat,
            longest_repeat_run,
            longest_char_run: longest_char_run(text),
            dominant_token_ratio: dominant_token_ratio(&tokens),
            concrete_count: tokens.iter().filter(|t| lex.is_concrete(t)).count(),
            irregular_count: tokens.iter().filter(|t| looks_irregular(t)).count(),
            intense_count: tokens.iter().filter(|t| lex.is_intense(t)).count(),
            generic_phrase_count: lex
                .generic_phrases
                .iter()
                .filter(|p| lower.contains(*p))
                .count(),
            promo_count: lex
                .promo_keywords
                .iter()
                .filter(|k| tokens.iter().any(|t| t == *k))
                .count(),
            template_similarity: similarity::template_similarity(&tokens),
            tokens,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    /// Superlatives per token.
    pub fn superlative_density(&self) -> f64 {
        ratio(self.superlative_count, self.word_count)
    }

    pub fn irregular_ratio(&self) -> f64 {
        ratio(self.irregular_count, self.word_count)
    }

    /// 0-1 credit for concrete detail; three concrete tokens earn full credit.
    pub fn specificity(&self) -> f64 {
        (self.concrete_count as f64 / 3.0).min(1.0)
    }

    /// Mostly the same few words over and over.
    pub fn is_degenerate(&self) -> bool {
        self.word_count >= 3 && self.unique_ratio < 0.5
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn count_punctuation_runs(text: &str) -> usize {
    let mut runs = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == '!' || c == '?' {
            current += 1;
        } else {
            if current >= 2 {
                runs += 1;
            }
            current = 0;
        }
    }
    if current >= 2 {
        runs += 1;
    }
    runs
}

fn longest_char_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<char> = None;
    for c in text.chars() {
        if c.is_whitespace() {
            previous = None;
            current = 0;
            continue;
        }
        if previous == Some(c) {
            current += 1;
        } else {
            current = 1;
        }
        previous = Some(c);
        longest = longest.max(current);
    }
    longest
}

/// (count of the most frequent content token - 1) / (content tokens - 1).
///
/// Zero when every content word appears once; one when the text is a single
/// word repeated.
fn dominant_token_ratio(tokens: &[String]) -> f64 {
    let lex = lexicon();
    let content: Vec<&str> = tokens
        .iter()
        .map(String::as_str)
        .filter(|t| !lex.is_stop_word(t))
        .collect();
    if content.len() < 2 {
        return 0.0;
    }
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in &content {
        *counts.entry(token).or_insert(0) += 1;
    }
    let max = counts.values().copied().max().unwrap_or(1);
    (max - 1) as f64 / (content.len() - 1) as f64
}

/// Stretched letters ("sooo") or a long token without vowels.
fn looks_irregular(token: &str) -> bool {
    if token.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    let mut run = 1;
    let mut previous: Option<char> = None;
    for c in token.chars() {
        if previous == Some(c) {
            run += 1;
            if run >= 3 {
                return true;
            }
        } else {
            run = 1;
        }
        previous = Some(c);
    }
    token.chars().count() >= 5 && !token.chars().any(|c| "aeiouy".contains(c))
}
