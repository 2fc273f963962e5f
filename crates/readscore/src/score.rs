// ABOUTME: Flesch reading-ease scorer for short plain-text passages.
// ABOUTME: Counts sentences, words, and vowel-group syllables; unscorable input is a ScoreError.

use once_cell::sync::Lazy;
use regex::Regex;

static VOWEL_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[aeiouy]+").unwrap());
// Terminal punctuation followed by end of text, whitespace, or a closing quote/bracket.
// A period inside a number or an initialism like "U.S" is not a boundary.
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]+(?:["'\u{201D}\u{2019})\]]*)(?:\s|$)"#).unwrap());
// Endings that add a letter group without adding a spoken syllable.
static SILENT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[^aeiouysxzcgh]es|[^aeiouytd]ed|[^aeiouyl]e)$").unwrap());
// Vowel pairs usually spoken as two syllables ("radio", "piano", "video"), except the
// single-syllable "-tion", "-sion" and "-cia" endings.
static SPLIT_VOWELS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:[^tsc]i[aou]|eo)").unwrap());

/// Why a passage could not be scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    #[error("text is empty")]
    EmptyText,
    #[error("text has no sentence-ending punctuation")]
    NoSentences,
    #[error("text has no words")]
    NoWords,
}

/// Counts feeding the reading-ease formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    pub sentences: usize,
    pub words: usize,
    pub syllables: usize,
}

impl TextStats {
    /// Count sentences, words and syllables in `text`.
    pub fn from_text(text: &str) -> Self {
        let mut stats = TextStats {
            sentences: count_sentences(text),
            ..Default::default()
        };
        for word in words(text) {
            stats.words += 1;
            stats.syllables += count_syllables(&word);
        }
        stats
    }

    /// Apply the Flesch reading-ease formula to these counts.
    pub fn reading_ease(&self) -> Result<f64, ScoreError> {
        if self.words == 0 {
            return Err(ScoreError::NoWords);
        }
        if self.sentences == 0 {
            return Err(ScoreError::NoSentences);
        }
        let words = self.words as f64;
        let words_per_sentence = words / self.sentences as f64;
        let syllables_per_word = self.syllables as f64 / words;
        Ok(206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word)
    }
}

/// Split `text` into lowercase alphabetic words, dropping tokens with no letters.
///
/// Apostrophes and hyphens inside a token are removed, so "don't" is one word
/// and "well-known" is scored as "wellknown".
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().filter_map(|token| {
        let word: String = token
            .chars()
            .filter(|c| c.is_alphabetic())
            .flat_map(char::to_lowercase)
            .collect();
        if word.is_empty() {
            None
        } else {
            Some(word)
        }
    })
}

/// Count sentence boundaries. Text with no terminal punctuation has zero sentences.
fn count_sentences(text: &str) -> usize {
    SENTENCE_END
        .find_iter(text)
        .filter(|m| {
            // Ignore punctuation that does not end a run of words, e.g. "... ?".
            text[..m.start()]
                .chars()
                .next_back()
                .is_some_and(|c| !c.is_whitespace())
        })
        .count()
}

/// Estimate the syllables in one lowercase word.
///
/// Each run of vowels counts once. A silent trailing "e", "es" or "ed" is
/// subtracted, and vowel pairs that are usually spoken apart are added back.
/// Every word has at least one syllable.
pub fn count_syllables(word: &str) -> usize {
    let word = word.to_lowercase();
    if word.len() <= 3 {
        return 1;
    }
    let mut count = VOWEL_GROUP.find_iter(&word).count();
    if SILENT_SUFFIX.is_match(&word) {
        count = count.saturating_sub(1);
    }
    count += SPLIT_VOWELS.find_iter(&word).count();
    count.max(1)
}

/// Flesch reading ease of `text`: `206.835 - 1.015 * (words / sentences) - 84.6 * (syllables / words)`.
///
/// Higher is easier. Pure and deterministic. Empty or whitespace-only text, text
/// without words, and text without terminal punctuation are errors rather than scores.
pub fn flesch_reading_ease(text: &str) -> Result<f64, ScoreError> {
    if text.trim().is_empty() {
        return Err(ScoreError::EmptyText);
    }
    TextStats::from_text(text).reading_ease()
}
