//! Text Layer
//!
//! Turns the recognizer's flat element stream back into words and sentences:
//! hyphenated line wraps are merged, trailing punctuation is split from word
//! stems and terminal punctuation closes sentences.

pub mod fragment;
pub mod page;
pub mod sentence;
pub mod word;

pub use fragment::{BoundingBox, Fragment, RecognizedText, TextBlock, TextElement, TextLine};
pub use page::{Page, WordRef};
pub use sentence::{assemble_sentences, ends_sentence, Sentence, TERMINAL_PUNCTUATION};
pub use word::{assemble_words, split_trailing_punctuation, Word};
