//! Recognizer output
//!
//! The external recognizer reports text as blocks of lines of elements. Word
//! reconstruction works on the flattened, reading-order sequence of elements
//! ("fragments"), each of which remembers where in its line it sat.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in image coordinates, right and bottom exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BoundingBox {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Build from (x, y, width, height)
    pub fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Whether the point lies inside; the right and bottom edges are outside
    pub fn contains(&self, x: i32, y: i32) -> bool {
        !self.is_empty() && self.left <= x && x < self.right && self.top <= y && y < self.bottom
    }
}

/// Smallest recognized text unit, with its position inside the source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Raw recognized text, possibly ending in a hyphen
    pub text: String,
    /// Running index of the source line across the whole recognition result
    pub line_id: usize,
    /// Index of this fragment within its line
    pub position_in_line: usize,
    /// Index of the last fragment of the line
    pub max_position_in_line: usize,
    /// Full text of the source line
    pub line_text: String,
    /// Region covered by the fragment, when the recognizer reported one
    pub bounding_box: Option<BoundingBox>,
}

impl Fragment {
    /// Whether this is the last fragment of its line
    pub fn is_line_end(&self) -> bool {
        self.position_in_line == self.max_position_in_line
    }

    /// Whether the word continues in the next fragment
    ///
    /// True when the fragment itself ends in `-`, or when it closes a line whose
    /// text ends in `-`.
    pub fn ends_with_hyphenation(&self) -> bool {
        self.text.ends_with('-') || (self.is_line_end() && self.line_text.ends_with('-'))
    }

    /// Trimmed text with the continuation hyphen removed
    pub fn text_without_hyphenation(&self) -> &str {
        let text = if self.ends_with_hyphenation() {
            self.text.strip_suffix('-').unwrap_or(&self.text)
        } else {
            &self.text
        };
        text.trim()
    }
}

/// Single recognized element, as reported by the recognizer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextElement {
    pub text: String,
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
}

/// Recognized line of elements
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    #[serde(default)]
    pub elements: Vec<TextElement>,
}

/// Recognized block of lines
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub lines: Vec<TextLine>,
}

/// Complete recognition result for one image
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecognizedText {
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

impl RecognizedText {
    /// Flatten into fragments in reading order: block, line, then element
    pub fn fragments(&self) -> Vec<Fragment> {
        self.blocks
            .iter()
            .flat_map(|block| &block.lines)
            .filter(|line| !line.elements.is_empty())
            .enumerate()
            .flat_map(|(line_id, line)| {
                let max_position_in_line = line.elements.len() - 1;
                line.elements.iter().enumerate().map(move |(idx, el)| Fragment {
                    text: el.text.clone(),
                    line_id,
                    position_in_line: idx,
                    max_position_in_line,
                    line_text: line.text.clone(),
                    bounding_box: el.bounding_box,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(text: &str, line_text: &str, position: usize, max_position: usize) -> Fragment {
        Fragment {
            text: text.to_string(),
            line_id: 0,
            position_in_line: position,
            max_position_in_line: max_position,
            line_text: line_text.to_string(),
            bounding_box: None,
        }
    }

    #[test]
    fn test_bounding_box_contains() {
        let bbox = BoundingBox::from_xywh(10, 20, 30, 40);
        assert_eq!(bbox, BoundingBox::new(10, 20, 40, 60));
        assert_eq!(bbox.width(), 30);
        assert_eq!(bbox.height(), 40);
        assert!(bbox.contains(10, 20));
        assert!(bbox.contains(39, 59));
        assert!(!bbox.contains(40, 59));
        assert!(!bbox.contains(39, 60));
        assert!(!bbox.contains(9, 30));
    }

    #[test]
    fn test_empty_bounding_box_contains_nothing() {
        let bbox = BoundingBox::new(5, 5, 5, 10);
        assert!(bbox.is_empty());
        assert!(!bbox.contains(5, 6));
    }

    #[test]
    fn test_hyphen_on_fragment() {
        let f = fragment("trans-", "we trans-", 1, 1);
        assert!(f.ends_with_hyphenation());
        assert_eq!(f.text_without_hyphenation(), "trans");

        // Mid-line hyphen still counts
        let f = fragment("well-", "a well- known", 1, 2);
        assert!(f.ends_with_hyphenation());
        assert_eq!(f.text_without_hyphenation(), "well");
    }

    #[test]
    fn test_hyphen_on_line_only_applies_to_last_fragment() {
        let first = fragment("some", "some words -", 0, 2);
        assert!(!first.ends_with_hyphenation());
        assert_eq!(first.text_without_hyphenation(), "some");

        let last = fragment(" words ", "some words -", 2, 2);
        assert!(last.ends_with_hyphenation());
        // The piece did not carry the hyphen, so only whitespace goes
        assert_eq!(last.text_without_hyphenation(), "words");
    }

    #[test]
    fn test_plain_fragment_is_trimmed() {
        let f = fragment(" late ", "late", 0, 0);
        assert!(!f.ends_with_hyphenation());
        assert_eq!(f.text_without_hyphenation(), "late");
    }

    #[test]
    fn test_flatten_reading_order() {
        let bbox = BoundingBox::new(0, 0, 5, 5);
        let recognized = RecognizedText {
            blocks: vec![
                TextBlock {
                    lines: vec![
                        TextLine {
                            text: "Hello big".to_string(),
                            elements: vec![
                                TextElement { text: "Hello".to_string(), bounding_box: Some(bbox) },
                                TextElement { text: "big".to_string(), bounding_box: None },
                            ],
                        },
                        TextLine { text: String::new(), elements: vec![] },
                    ],
                },
                TextBlock {
                    lines: vec![TextLine {
                        text: "world.".to_string(),
                        elements: vec![TextElement { text: "world.".to_string(), bounding_box: None }],
                    }],
                },
            ],
        };

        let fragments = recognized.fragments();
        let summary: Vec<_> = fragments
            .iter()
            .map(|f| (f.text.as_str(), f.line_id, f.position_in_line, f.max_position_in_line))
            .collect();
        assert_eq!(summary, vec![("Hello", 0, 0, 1), ("big", 0, 1, 1), ("world.", 1, 0, 0)]);
        assert_eq!(fragments[0].bounding_box, Some(bbox));
        assert_eq!(fragments[2].line_text, "world.");
    }

    #[test]
    fn test_deserialize_recognizer_dump() {
        let json = r#"{
            "blocks": [{
                "lines": [{
                    "text": "trans-",
                    "elements": [{ "text": "trans-", "bounding_box": { "left": 1, "top": 2, "right": 3, "bottom": 4 } }]
                }]
            }]
        }"#;
        let recognized: RecognizedText = serde_json::from_str(json).unwrap();
        let fragments = recognized.fragments();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].bounding_box, Some(BoundingBox::new(1, 2, 3, 4)));
        assert!(fragments[0].ends_with_hyphenation());
    }
}
