//! scanlate - adaptive binarization and text reconstruction for photo OCR
//!
//! Two independent stages sit around an external text recognizer:
//! - [`vision`] cleans a captured frame with a Gaussian local-threshold filter
//! - [`text`] rebuilds hyphen-split words and sentences from the recognizer's
//!   element stream

pub mod config;
pub mod text;
pub mod vision;

pub use text::{Page, RecognizedText, Sentence, Word, WordRef};
pub use vision::{binarize_in_place, Binarizer, Kernel, KernelError, PixelBuffer};
