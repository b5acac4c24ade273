//! Assembled recognition result
//!
//! A page owns its sentences and a sentence owns its words. Consumers that need
//! to get from a word back to its sentence go through a [`WordRef`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::fragment::{Fragment, RecognizedText};
use super::sentence::{assemble_sentences, Sentence};
use super::word::{assemble_words, Word};

/// Position of a word inside a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordRef {
    pub sentence: usize,
    pub word: usize,
}

/// Sentences reconstructed from one recognition pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    sentences: Vec<Sentence>,
}

impl Page {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }

    /// Rebuild words and sentences from reading-order fragments
    pub fn from_fragments<'a, I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = &'a Fragment>,
    {
        let words = assemble_words(fragments);
        let word_count = words.len();
        let sentences = assemble_sentences(words);
        debug!("Assembled {} word(s) into {} sentence(s)", word_count, sentences.len());
        Self { sentences }
    }

    /// Rebuild a page straight from the recognizer's block tree
    pub fn from_recognized(recognized: &RecognizedText) -> Self {
        Self::from_fragments(&recognized.fragments())
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Sentence texts joined by single spaces
    pub fn text(&self) -> String {
        self.to_string()
    }

    /// All words in reading order with their positions
    pub fn words(&self) -> impl Iterator<Item = (WordRef, &Word)> {
        self.sentences.iter().enumerate().flat_map(|(s, sentence)| {
            sentence
                .words()
                .iter()
                .enumerate()
                .map(move |(w, word)| (WordRef { sentence: s, word: w }, word))
        })
    }

    /// First word whose boxes contain the point
    ///
    /// Coordinates are truncated toward zero before testing.
    pub fn find_word(&self, x: f32, y: f32) -> Option<WordRef> {
        let (x, y) = (x as i32, y as i32);
        self.words().find(|(_, word)| word.contains(x, y)).map(|(r, _)| r)
    }

    pub fn word(&self, r: WordRef) -> Option<&Word> {
        self.sentences.get(r.sentence)?.words().get(r.word)
    }

    /// Sentence that owns the referenced word
    pub fn sentence_of(&self, r: WordRef) -> Option<&Sentence> {
        self.word(r)?;
        self.sentences.get(r.sentence)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, sentence) in self.sentences.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", sentence)?;
        }
        Ok(())
    }
}
