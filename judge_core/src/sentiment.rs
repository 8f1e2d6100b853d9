//! Rule-based sentiment scoring.
//!
//! Every lexicon word carries a polarity and a subjectivity. A text scores the mean of the words
//! it matches, after negations and intensifiers have adjusted them.

use std::collections::HashMap;

use crate::model::Sentiment;

/// Scores a text as `(polarity, subjectivity)`. Implementations must be pure.
pub trait SentimentProvider {
    fn score(&self, text: &str) -> Sentiment;
}

impl<F> SentimentProvider for F
where
    F: Fn(&str) -> Sentiment,
{
    fn score(&self, text: &str) -> Sentiment {
        self(text)
    }
}

// (word, polarity, subjectivity)
const WORDS: &[(&str, f64, f64)] = &[
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("beautiful", 0.85, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("brilliant", 0.9, 1.0),
    ("cool", 0.35, 0.65),
    ("excellent", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("fun", 0.3, 0.2),
    ("glad", 0.5, 1.0),
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("happy", 0.8, 1.0),
    ("interesting", 0.5, 0.5),
    ("like", 0.2, 0.3),
    ("love", 0.5, 0.6),
    ("lovely", 0.5, 0.75),
    ("nice", 0.6, 1.0),
    ("perfect", 1.0, 1.0),
    ("thanks", 0.2, 0.2),
    ("win", 0.8, 0.4),
    ("wonderful", 1.0, 1.0),
    ("angry", -0.5, 1.0),
    ("annoying", -0.8, 0.9),
    ("awful", -1.0, 1.0),
    ("bad", -0.7, 0.67),
    ("boring", -1.0, 1.0),
    ("broken", -0.4, 0.4),
    ("disappointing", -0.6, 0.7),
    ("fail", -0.5, 0.3),
    ("hate", -0.8, 0.9),
    ("horrible", -1.0, 1.0),
    ("poor", -0.4, 0.6),
    ("sad", -0.5, 1.0),
    ("sorry", -0.5, 1.0),
    ("stupid", -0.8, 1.0),
    ("terrible", -1.0, 1.0),
    ("ugly", -0.7, 1.0),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("wrong", -0.5, 0.9),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "isn't", "isnt", "don't", "dont", "doesn't", "doesnt", "didn't", "didnt", "can't",
    "cant", "won't", "wont", "wasn't", "wasnt", "aren't", "arent",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("so", 1.2),
    ("super", 1.4),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("pretty", 0.9),
];

/// Negated words keep half of their polarity, with the sign flipped.
const NEGATION_FACTOR: f64 = -0.5;

#[derive(Debug, Clone)]
pub struct LexiconSentiment {
    words: HashMap<&'static str, (f64, f64)>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for LexiconSentiment {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconSentiment {
    pub fn new() -> Self {
        Self {
            words: WORDS.iter().map(|&(w, p, s)| (w, (p, s))).collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }
}

impl SentimentProvider for LexiconSentiment {
    fn score(&self, text: &str) -> Sentiment {
        let mut matched: Vec<(f64, f64)> = Vec::new();
        let mut negate = false;
        let mut intensity = 1.0;

        let tokens = text
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);
        for token in tokens {
            if NEGATIONS.contains(&token.as_str()) {
                negate = true;
                continue;
            }
            if let Some(&factor) = self.intensifiers.get(token.as_str()) {
                intensity *= factor;
                continue;
            }
            if let Some(&(mut polarity, mut subjectivity)) = self.words.get(token.as_str()) {
                polarity *= intensity;
                subjectivity *= intensity;
                if negate {
                    polarity *= NEGATION_FACTOR;
                }
                matched.push((polarity, subjectivity));
            }
            negate = false;
            intensity = 1.0;
        }

        if matched.is_empty() {
            return Sentiment::default();
        }
        let n = matched.len() as f64;
        let polarity = matched.iter().map(|m| m.0).sum::<f64>() / n;
        let subjectivity = matched.iter().map(|m| m.1).sum::<f64>() / n;
        Sentiment {
            polarity: polarity.clamp(-1.0, 1.0),
            subjectivity: subjectivity.clamp(0.0, 1.0),
        }
    }
}
