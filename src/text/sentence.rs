//! Sentence grouping

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::word::Word;

/// Characters that end a sentence
pub const TERMINAL_PUNCTUATION: [char; 4] = ['.', '!', '?', '…'];

/// Ordered run of words, closed by terminal punctuation (or by the end of the
/// recognized text)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    words: Vec<Word>,
}

impl Sentence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a word unless the sentence is already closed
    ///
    /// Returns false, leaving the sentence unchanged, once terminal
    /// punctuation has closed it.
    pub fn push(&mut self, word: Word) -> bool {
        if self.is_terminated() {
            return false;
        }
        self.words.push(word);
        true
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether the last word carries terminal punctuation
    pub fn is_terminated(&self) -> bool {
        self.words.last().is_some_and(ends_sentence)
    }

    /// Word texts joined by single spaces
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", word)?;
        }
        Ok(())
    }
}

/// Whether the word's punctuation contains a sentence-terminal character
pub fn ends_sentence(word: &Word) -> bool {
    word.punctuation
        .as_deref()
        .is_some_and(|p| p.contains(TERMINAL_PUNCTUATION))
}

/// Partition words into sentences
///
/// A sentence is opened by the first word after a closed one and closed by any
/// word with terminal punctuation. Words left over at the end form a final,
/// unterminated sentence; no input means no sentences.
pub fn assemble_sentences<I>(words: I) -> Vec<Sentence>
where
    I: IntoIterator<Item = Word>,
{
    let mut sentences = Vec::new();
    let mut current: Option<Sentence> = None;

    for word in words {
        let closes = ends_sentence(&word);
        let sentence = current.get_or_insert_with(Sentence::new);
        let appended = sentence.push(word);
        debug_assert!(appended, "closed sentences are never left open");
        if closes {
            if let Some(sentence) = current.take() {
                sentences.push(sentence);
            }
        }
    }

    if let Some(tail) = current {
        trace!("Keeping unterminated tail of {} word(s)", tail.len());
        sentences.push(tail);
    }

    sentences
}
