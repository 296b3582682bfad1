//! Block tag classification.
//!
//! Top-level document children are classified purely by their element tag.
//! Heading levels are a closed six-variant enum so every per-level lookup
//! (labels, shortcuts, icons, overlay nudges) is an exhaustive match.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};

/// Heading level, `<h1>` through `<h6>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// All levels in menu order.
    pub const ALL: [HeadingLevel; 6] = [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
        HeadingLevel::H5,
        HeadingLevel::H6,
    ];

    /// Level from its number (1-6).
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::H1),
            2 => Some(Self::H2),
            3 => Some(Self::H3),
            4 => Some(Self::H4),
            5 => Some(Self::H5),
            6 => Some(Self::H6),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
            Self::H4 => 4,
            Self::H5 => 5,
            Self::H6 => 6,
        }
    }

    /// Lowercase element name (`h1`..`h6`).
    pub fn tag_name(self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
        }
    }

    /// Menu label, e.g. "Heading 3".
    pub fn label(self) -> &'static str {
        match self {
            Self::H1 => "Heading 1",
            Self::H2 => "Heading 2",
            Self::H3 => "Heading 3",
            Self::H4 => "Heading 4",
            Self::H5 => "Heading 5",
            Self::H6 => "Heading 6",
        }
    }

    /// Keyboard shortcut hint shown next to the menu label.
    pub fn shortcut(self) -> &'static str {
        match self {
            Self::H1 => "⌘1",
            Self::H2 => "⌘2",
            Self::H3 => "⌘3",
            Self::H4 => "⌘4",
            Self::H5 => "⌘5",
            Self::H6 => "⌘6",
        }
    }

    /// Icon name in the host's icon set.
    pub fn icon(self) -> &'static str {
        match self {
            Self::H1 => "heading-1",
            Self::H2 => "heading-2",
            Self::H3 => "heading-3",
            Self::H4 => "heading-4",
            Self::H5 => "heading-5",
            Self::H6 => "heading-6",
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.number()
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = SmolStr;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        HeadingLevel::from_number(n).ok_or_else(|| format_smolstr!("no heading level {}", n))
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// Classification of a top-level block element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockTag {
    Paragraph,
    Heading(HeadingLevel),
    /// `<ul>` or `<ol>`, including task lists.
    List,
    Blockquote,
    /// `<pre>`
    CodeBlock,
    /// Anything else, keeping the lowercased element name.
    Other(SmolStr),
}

impl BlockTag {
    /// Classify an element by tag name. ASCII case-insensitive, so both
    /// `"H2"` (DOM `tagName`) and `"h2"` work.
    pub fn classify(tag_name: &str) -> Self {
        let lower = tag_name.to_ascii_lowercase();
        match lower.as_str() {
            "p" => Self::Paragraph,
            "h1" => Self::Heading(HeadingLevel::H1),
            "h2" => Self::Heading(HeadingLevel::H2),
            "h3" => Self::Heading(HeadingLevel::H3),
            "h4" => Self::Heading(HeadingLevel::H4),
            "h5" => Self::Heading(HeadingLevel::H5),
            "h6" => Self::Heading(HeadingLevel::H6),
            "ul" | "ol" => Self::List,
            "blockquote" => Self::Blockquote,
            "pre" => Self::CodeBlock,
            _ => Self::Other(SmolStr::new(lower)),
        }
    }

    /// Heading level, if this is a heading.
    pub fn heading_level(&self) -> Option<HeadingLevel> {
        match self {
            Self::Heading(level) => Some(*level),
            _ => None,
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, Self::Heading(_))
    }

    /// Element name used when creating a block of this kind.
    ///
    /// Lists have no single element name; `ul` is used.
    pub fn tag_name(&self) -> SmolStr {
        match self {
            Self::Paragraph => SmolStr::new_static("p"),
            Self::Heading(level) => SmolStr::new_static(level.tag_name()),
            Self::List => SmolStr::new_static("ul"),
            Self::Blockquote => SmolStr::new_static("blockquote"),
            Self::CodeBlock => SmolStr::new_static("pre"),
            Self::Other(name) => name.clone(),
        }
    }
}

impl From<HeadingLevel> for BlockTag {
    fn from(level: HeadingLevel) -> Self {
        BlockTag::Heading(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_dom_and_html_case() {
        assert_eq!(BlockTag::classify("H1"), BlockTag::Heading(HeadingLevel::H1));
        assert_eq!(BlockTag::classify("h6"), BlockTag::Heading(HeadingLevel::H6));
        assert_eq!(BlockTag::classify("P"), BlockTag::Paragraph);
        assert_eq!(BlockTag::classify("OL"), BlockTag::List);
        assert_eq!(BlockTag::classify("ul"), BlockTag::List);
        assert_eq!(BlockTag::classify("BLOCKQUOTE"), BlockTag::Blockquote);
        assert_eq!(BlockTag::classify("pre"), BlockTag::CodeBlock);
    }

    #[test]
    fn test_classify_unknown_keeps_name() {
        assert_eq!(BlockTag::classify("HR"), BlockTag::Other("hr".into()));
        assert_eq!(BlockTag::classify("h7"), BlockTag::Other("h7".into()));
        assert!(!BlockTag::classify("div").is_heading());
    }

    #[test]
    fn test_level_numbers_round_trip_through_tag_names() {
        for level in HeadingLevel::ALL {
            assert_eq!(HeadingLevel::from_number(level.number()), Some(level));
            assert_eq!(BlockTag::classify(level.tag_name()), BlockTag::Heading(level));
        }
        assert_eq!(HeadingLevel::from_number(0), None);
        assert_eq!(HeadingLevel::from_number(7), None);
    }

    #[test]
    fn test_labels_match_level_number() {
        for level in HeadingLevel::ALL {
            let n = level.number();
            assert_eq!(level.label(), format!("Heading {n}"));
            assert_eq!(level.shortcut(), format!("⌘{n}"));
            assert_eq!(level.icon(), format!("heading-{n}"));
        }
    }

    #[test]
    fn test_level_serializes_as_number() {
        let json = serde_json::to_string(&HeadingLevel::H4).unwrap();
        assert_eq!(json, "4");
        let level: HeadingLevel = serde_json::from_str("2").unwrap();
        assert_eq!(level, HeadingLevel::H2);
        assert!(serde_json::from_str::<HeadingLevel>("9").is_err());
    }
}
