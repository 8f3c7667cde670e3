// Process-wide word lists for the text analyzers.
//
// Loaded once on first use and never mutated, so every analyzer can read
// them concurrently without locking.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

/// Lexical entry: (polarity, subjectivity).
type Entry = (f64, f64);

const POLARITY: &[(&str, Entry)] = &[
    // positive
    ("good", (0.7, 0.6)),
    ("great", (0.8, 0.75)),
    ("excellent", (1.0, 1.0)),
    ("amazing", (0.6, 0.9)),
    ("awesome", (1.0, 1.0)),
    ("wonderful", (1.0, 1.0)),
    ("fantastic", (0.4, 0.9)),
    ("perfect", (1.0, 1.0)),
    ("perfectly", (1.0, 1.0)),
    ("outstanding", (0.5, 0.75)),
    ("incredible", (0.9, 0.9)),
    ("superb", (1.0, 1.0)),
    ("best", (1.0, 0.3)),
    ("love", (0.5, 0.6)),
    ("loved", (0.7, 0.8)),
    ("lovely", (0.5, 0.75)),
    ("enjoy", (0.4, 0.5)),
    ("enjoyed", (0.4, 0.5)),
    ("delicious", (1.0, 1.0)),
    ("tasty", (0.6, 0.8)),
    ("fresh", (0.3, 0.5)),
    ("friendly", (0.375, 0.5)),
    ("nice", (0.6, 1.0)),
    ("helpful", (0.5, 0.5)),
    ("attentive", (0.4, 0.6)),
    ("clean", (0.37, 0.7)),
    ("pleasant", (0.73, 1.0)),
    ("beautiful", (0.85, 1.0)),
    ("happy", (0.8, 1.0)),
    ("generous", (0.4, 0.5)),
    ("cozy", (0.5, 0.7)),
    ("recommend", (0.3, 0.4)),
    ("recommended", (0.3, 0.4)),
    ("reasonable", (0.2, 0.4)),
    ("solid", (0.2, 0.3)),
    ("prompt", (0.2, 0.3)),
    ("fine", (0.4, 0.5)),
    ("decent", (0.17, 0.5)),
    ("okay", (0.5, 0.5)),
    ("ok", (0.5, 0.5)),
    // negative
    ("bad", (-0.7, 0.67)),
    ("terrible", (-1.0, 1.0)),
    ("awful", (-1.0, 1.0)),
    ("horrible", (-1.0, 1.0)),
    ("worst", (-1.0, 1.0)),
    ("hate", (-0.8, 0.9)),
    ("hated", (-0.8, 0.9)),
    ("disgusting", (-1.0, 1.0)),
    ("disappointed", (-0.75, 0.75)),
    ("disappointing", (-0.6, 0.7)),
    ("poor", (-0.4, 0.6)),
    ("rude", (-0.6, 0.8)),
    ("dirty", (-0.6, 0.8)),
    ("cold", (-0.6, 1.0)),
    ("slow", (-0.3, 0.4)),
    ("overpriced", (-0.5, 0.6)),
    ("bland", (-0.4, 0.6)),
    ("mediocre", (-0.3, 0.6)),
    ("stale", (-0.5, 0.6)),
    ("greasy", (-0.4, 0.6)),
    ("noisy", (-0.3, 0.5)),
    ("wrong", (-0.5, 0.9)),
    ("unfriendly", (-0.5, 0.6)),
    ("inedible", (-0.8, 0.8)),
    ("avoid", (-0.4, 0.4)),
    // neutral-leaning
    ("average", (-0.15, 0.4)),
    ("normal", (0.15, 0.65)),
    ("typical", (-0.17, 0.5)),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.2),
    ("super", 1.3),
    ("truly", 1.2),
    ("highly", 1.3),
    ("extremely", 1.5),
    ("absolutely", 1.4),
    ("completely", 1.3),
    ("totally", 1.3),
    ("incredibly", 1.5),
    ("unbelievably", 1.5),
];

/// Intensifiers that signal emotional excess rather than ordinary emphasis.
const INTENSE_WORDS: &[&str] = &[
    "absolutely",
    "completely",
    "totally",
    "extremely",
    "incredibly",
    "unbelievably",
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "nothing", "nor", "hardly", "without", "don't", "dont", "didn't",
    "didnt", "isn't", "isnt", "wasn't", "wasnt", "aren't", "weren't", "won't", "can't", "cant",
    "couldn't", "wouldn't", "shouldn't",
];

const SUPERLATIVES: &[&str] = &[
    "amazing",
    "best",
    "worst",
    "perfect",
    "incredible",
    "awesome",
    "outstanding",
    "excellent",
    "fantastic",
    "wonderful",
    "terrible",
    "horrible",
    "awful",
    "ever",
    "greatest",
    "finest",
    "unbelievable",
    "phenomenal",
];

/// Nouns and measures that make a review specific.
const CONCRETE_TERMS: &[&str] = &[
    "dinner", "lunch", "breakfast", "brunch", "meal", "menu", "dish", "dishes", "ingredients",
    "portions", "portion", "price", "prices", "staff", "waiter", "waitress", "server", "table",
    "booking", "reservation", "parking", "coffee", "pasta", "pizza", "burger", "salad",
    "dessert", "wine", "beer", "cocktail", "room", "bed", "bathroom", "view", "minutes",
    "minute", "hour", "hours", "wait", "queue", "seat", "seats", "chef", "kitchen", "bill",
    "tip", "steak", "fish", "seafood", "soup", "bread", "sauce", "atmosphere", "location",
    "date", "time", "receptionist", "checkout", "delivery", "order",
];

const NUMBER_WORDS: &[&str] = &[
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "twenty", "thirty", "half", "dozen", "first", "second",
];

const POSITIVE_KEYWORDS: &[&str] = &[
    "excellent",
    "amazing",
    "wonderful",
    "fantastic",
    "great",
    "love",
    "perfect",
    "outstanding",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "terrible",
    "horrible",
    "awful",
    "worst",
    "hate",
    "disgusting",
    "disappointed",
];

const NEUTRAL_KEYWORDS: &[&str] = &["okay", "average", "decent", "fine", "normal", "typical"];

/// Phrases typical of fabricated reviews.
const FAKE_TEMPLATES: &[&str] = &[
    "best place ever",
    "best restaurant ever",
    "worst place ever",
    "worst experience ever",
    "highly recommend this place",
    "would definitely recommend",
    "five stars",
    "5 stars",
    "never going back",
    "must visit",
    "must try",
    "amazing food amazing service",
    "great food great service",
    "good food nice place",
    "perfect in every way",
    "you will not be disappointed",
    "do not waste your money",
];

/// Stock phrases that say nothing specific about a visit.
const GENERIC_PHRASES: &[&str] = &[
    "good service",
    "nice place",
    "friendly staff",
    "great food",
    "bad experience",
    "poor service",
    "would not recommend",
];

const PROMO_KEYWORDS: &[&str] = &[
    "discount", "coupon", "deal", "offer", "sale", "cheap", "free", "promo",
];

/// Commercial, social-proof, explicit-rating and pressure language.
const SUSPICIOUS_PATTERNS: &[&str] = &[
    r"(?i)\b(buy|purchase|order)\b.*\b(recommend|suggest)\b",
    r"(?i)\b(friends?|family)\b.*\b(love|recommend)\b",
    r"(?i)\b(five|5)\s*stars?\b",
    r"(?i)\b(must try|must visit|must have)\b",
];

/// Read-only lexical resources shared by every analyzer.
pub struct Lexicon {
    polarity: HashMap<&'static str, Entry>,
    intensifiers: HashMap<&'static str, f64>,
    intense_words: HashSet<&'static str>,
    negations: HashSet<&'static str>,
    superlatives: HashSet<&'static str>,
    concrete_terms: HashSet<&'static str>,
    number_words: HashSet<&'static str>,
    positive_keywords: HashSet<&'static str>,
    negative_keywords: HashSet<&'static str>,
    neutral_keywords: HashSet<&'static str>,
    stop_words: HashSet<String>,
    /// Tokenized fake-review templates
    pub templates: Vec<Vec<String>>,
    pub generic_phrases: &'static [&'static str],
    pub promo_keywords: &'static [&'static str],
    pub suspicious_patterns: Vec<Regex>,
}

static LEXICON: LazyLock<Lexicon> = LazyLock::new(Lexicon::load);

/// The shared lexicon, initialized on first call.
pub fn lexicon() -> &'static Lexicon {
    &LEXICON
}

impl Lexicon {
    fn load() -> Self {
        let stop_words: Vec<String> = get(LANGUAGE::English);

        Self {
            polarity: POLARITY.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            intense_words: INTENSE_WORDS.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
            superlatives: SUPERLATIVES.iter().copied().collect(),
            concrete_terms: CONCRETE_TERMS.iter().copied().collect(),
            number_words: NUMBER_WORDS.iter().copied().collect(),
            positive_keywords: POSITIVE_KEYWORDS.iter().copied().collect(),
            negative_keywords: NEGATIVE_KEYWORDS.iter().copied().collect(),
            neutral_keywords: NEUTRAL_KEYWORDS.iter().copied().collect(),
            stop_words: stop_words.into_iter().collect(),
            templates: FAKE_TEMPLATES
                .iter()
                .map(|t| super::features::tokens(t))
                .collect(),
            generic_phrases: GENERIC_PHRASES,
            promo_keywords: PROMO_KEYWORDS,
            // Patterns are literals; a failed compile just drops the pattern.
            suspicious_patterns: SUSPICIOUS_PATTERNS
                .iter()
                .filter_map(|p| Regex::new(p).ok())
                .collect(),
        }
    }

    pub fn polarity(&self, token: &str) -> Option<Entry> {
        self.polarity.get(token).copied()
    }

    pub fn intensifier(&self, token: &str) -> Option<f64> {
        self.intensifiers.get(token).copied()
    }

    pub fn is_intense(&self, token: &str) -> bool {
        self.intense_words.contains(token)
    }

    pub fn is_negation(&self, token: &str) -> bool {
        self.negations.contains(token)
    }

    pub fn is_superlative(&self, token: &str) -> bool {
        self.superlatives.contains(token)
    }

    /// Concrete nouns, number words and anything containing a digit.
    pub fn is_concrete(&self, token: &str) -> bool {
        self.concrete_terms.contains(token)
            || self.number_words.contains(token)
            || token.chars().any(|c| c.is_ascii_digit())
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Keyword-list sentiment: (positive - negative) / matched keywords.
    pub fn keyword_sentiment(&self, tokens: &[String]) -> f64 {
        let mut positive = 0usize;
        let mut negative = 0usize;
        let mut neutral = 0usize;
        for token in tokens {
            let t = token.as_str();
            if self.positive_keywords.contains(t) {
                positive += 1;
            } else if self.negative_keywords.contains(t) {
                negative += 1;
            } else if self.neutral_keywords.contains(t) {
                neutral += 1;
            }
        }
        let total = positive + negative + neutral;
        if total == 0 {
            return 0.0;
        }
        (positive as f64 - negative as f64) / total as f64
    }
}
