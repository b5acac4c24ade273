//! Word reconstruction
//!
//! Joins fragments that were split across a line wrap ("trans-" + "late") and
//! separates each word's trailing punctuation from its stem.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::fragment::{BoundingBox, Fragment};

/// A reconstructed word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// Word text without its trailing punctuation
    pub stem: String,
    /// Trailing run of non-alphanumeric characters, `None` when there is none
    pub punctuation: Option<String>,
    /// Boxes of the merged fragments that had one, in reading order
    pub bounding_boxes: Vec<BoundingBox>,
}

impl Word {
    /// Split `text` into stem and trailing punctuation
    pub fn new(text: &str, bounding_boxes: Vec<BoundingBox>) -> Self {
        let (stem, punctuation) = split_trailing_punctuation(text);
        Self {
            stem: stem.to_string(),
            punctuation: (!punctuation.is_empty()).then(|| punctuation.to_string()),
            bounding_boxes,
        }
    }

    /// Stem followed by punctuation, as it appeared in the image
    pub fn text(&self) -> String {
        match &self.punctuation {
            Some(p) => format!("{}{}", self.stem, p),
            None => self.stem.clone(),
        }
    }

    /// Whether any of the word's boxes contains the point
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.bounding_boxes.iter().any(|b| b.contains(x, y))
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stem)?;
        if let Some(p) = &self.punctuation {
            f.write_str(p)?;
        }
        Ok(())
    }
}

/// Letters and decimal digits; superscripts and vulgar fractions count as
/// punctuation
fn is_letter_or_digit(c: char) -> bool {
    c.is_alphabetic() || c.is_ascii_digit()
}

/// Split off the trailing run of characters that are neither letters nor digits
pub fn split_trailing_punctuation(text: &str) -> (&str, &str) {
    let stem_end = text
        .char_indices()
        .rev()
        .find(|&(_, c)| is_letter_or_digit(c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    text.split_at(stem_end)
}

/// Fragments collected for the word currently being built
#[derive(Debug, Default)]
struct WordAccumulator {
    text: String,
    bounding_boxes: Vec<BoundingBox>,
    parts: usize,
}

impl WordAccumulator {
    fn push(&mut self, fragment: &Fragment) {
        self.text.push_str(fragment.text_without_hyphenation());
        self.bounding_boxes.extend(fragment.bounding_box);
        self.parts += 1;
    }

    fn is_empty(&self) -> bool {
        self.parts == 0
    }

    /// Emit the collected word and start over
    fn flush(&mut self) -> Word {
        let acc = std::mem::take(self);
        if acc.parts > 1 {
            trace!("Merged {} hyphenated fragments into {:?}", acc.parts, acc.text);
        }
        Word::new(&acc.text, acc.bounding_boxes)
    }
}

/// Rebuild words from reading-order fragments
///
/// Fragments accumulate while they end in hyphenation; the first fragment that
/// does not closes the word. A group still open when the input runs out is
/// dropped.
pub fn assemble_words<'a, I>(fragments: I) -> Vec<Word>
where
    I: IntoIterator<Item = &'a Fragment>,
{
    let mut words = Vec::new();
    let mut acc = WordAccumulator::default();

    for fragment in fragments {
        acc.push(fragment);
        if fragment.ends_with_hyphenation() {
            continue;
        }
        words.push(acc.flush());
    }

    if !acc.is_empty() {
        debug!("Dropping {} trailing hyphenated fragment(s): {:?}", acc.parts, acc.text);
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(texts: &[&str], line_id: usize) -> Vec<Fragment> {
        let line_text = texts.join(" ");
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Fragment {
                text: t.to_string(),
                line_id,
                position_in_line: i,
                max_position_in_line: texts.len() - 1,
                line_text: line_text.clone(),
                bounding_box: Some(BoundingBox::from_xywh(i as i32 * 10, line_id as i32 * 10, 8, 8)),
            })
            .collect()
    }

    #[test]
    fn test_split_trailing_punctuation() {
        assert_eq!(split_trailing_punctuation("world."), ("world", "."));
        assert_eq!(split_trailing_punctuation("what?!"), ("what", "?!"));
        assert_eq!(split_trailing_punctuation("wait…"), ("wait", "…"));
        assert_eq!(split_trailing_punctuation("it's"), ("it's", ""));
        assert_eq!(split_trailing_punctuation("(note)"), ("(note", ")"));
        assert_eq!(split_trailing_punctuation("2024,"), ("2024", ","));
        assert_eq!(split_trailing_punctuation("café;"), ("café", ";"));
        assert_eq!(split_trailing_punctuation("..."), ("", "..."));
        assert_eq!(split_trailing_punctuation(""), ("", ""));
    }

    #[test]
    fn test_non_decimal_numbers_are_punctuation() {
        assert_eq!(split_trailing_punctuation("x²,"), ("x", "²,"));
        assert_eq!(split_trailing_punctuation("3½."), ("3", "½."));
        assert_eq!(split_trailing_punctuation("x2,"), ("x2", ","));
    }

    #[test]
    fn test_word_without_punctuation_is_none() {
        let word = Word::new("plain", vec![]);
        assert_eq!(word.stem, "plain");
        assert_eq!(word.punctuation, None);
        assert_eq!(word.text(), "plain");

        let word = Word::new("end.", vec![]);
        assert_eq!(word.punctuation.as_deref(), Some("."));
        assert_eq!(word.to_string(), "end.");
    }

    #[test]
    fn test_one_word_per_plain_fragment() {
        let fragments = line(&["the", "quick", "fox"], 0);
        let words = assemble_words(&fragments);
        let stems: Vec<_> = words.iter().map(|w| w.stem.as_str()).collect();
        assert_eq!(stems, vec!["the", "quick", "fox"]);
        assert!(words.iter().all(|w| w.bounding_boxes.len() == 1));
    }

    #[test]
    fn test_merge_across_line_wrap() {
        let mut fragments = line(&["trans-"], 0);
        fragments.extend(line(&["late"], 1));

        let words = assemble_words(&fragments);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].stem, "translate");
        assert_eq!(words[0].punctuation, None);
        assert_eq!(
            words[0].bounding_boxes,
            vec![BoundingBox::from_xywh(0, 0, 8, 8), BoundingBox::from_xywh(0, 10, 8, 8)]
        );
    }

    #[test]
    fn test_merge_keeps_punctuation_of_last_piece() {
        let mut fragments = line(&["we", "recon-"], 0);
        fragments.extend(line(&["struct-"], 1));
        fragments.extend(line(&["ed.", "Then"], 2));

        let words = assemble_words(&fragments);
        let texts: Vec<_> = words.iter().map(Word::text).collect();
        assert_eq!(texts, vec!["we", "reconstructed.", "Then"]);
        assert_eq!(words[1].stem, "reconstructed");
        assert_eq!(words[1].bounding_boxes.len(), 3);
    }

    #[test]
    fn test_missing_boxes_are_omitted() {
        let mut fragments = line(&["hy-"], 0);
        fragments.extend(line(&["phen"], 1));
        fragments[1].bounding_box = None;

        let words = assemble_words(&fragments);
        assert_eq!(words[0].stem, "hyphen");
        assert_eq!(words[0].bounding_boxes, vec![BoundingBox::from_xywh(0, 0, 8, 8)]);
    }

    #[test]
    fn test_trailing_hyphenated_group_is_dropped() {
        let fragments = line(&["one", "two", "dan-"], 0);
        let words = assemble_words(&fragments);
        let stems: Vec<_> = words.iter().map(|w| w.stem.as_str()).collect();
        assert_eq!(stems, vec!["one", "two"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(assemble_words(&Vec::<Fragment>::new()).is_empty());
    }

    #[test]
    fn test_word_hit_test() {
        let word = Word::new("box", vec![BoundingBox::new(0, 0, 4, 4), BoundingBox::new(10, 10, 14, 14)]);
        assert!(word.contains(2, 2));
        assert!(word.contains(12, 13));
        assert!(!word.contains(6, 6));
    }
}
