//! Accessible roles

use serde::{Deserialize, Serialize};

/// Semantic tag classifying an accessible node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Top-level window frame
    Frame,
    /// Root pane of a window
    RootPane,
    /// Scrollable viewport
    ScrollPane,
    /// Generic drawing document
    Document,
    /// Text document body
    DocumentText,
    /// Paragraph of text
    Paragraph,
    /// Graphic object
    Graphic,
    /// Text frame
    TextFrame,
    /// Generic container
    Panel,
    /// Anything else
    Unknown,
}

impl Role {
    /// All roles, in declaration order
    pub const ALL: [Role; 10] = [
        Role::Frame,
        Role::RootPane,
        Role::ScrollPane,
        Role::Document,
        Role::DocumentText,
        Role::Paragraph,
        Role::Graphic,
        Role::TextFrame,
        Role::Panel,
        Role::Unknown,
    ];

    /// Upper-case role name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Frame => "FRAME",
            Self::RootPane => "ROOT_PANE",
            Self::ScrollPane => "SCROLL_PANE",
            Self::Document => "DOCUMENT",
            Self::DocumentText => "DOCUMENT_TEXT",
            Self::Paragraph => "PARAGRAPH",
            Self::Graphic => "GRAPHIC",
            Self::TextFrame => "TEXT_FRAME",
            Self::Panel => "PANEL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown role: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("graphic".parse::<Role>().unwrap(), Role::Graphic);
        assert_eq!("DOCUMENT_TEXT".parse::<Role>().unwrap(), Role::DocumentText);
        assert!("button".parse::<Role>().is_err());
    }

    #[test]
    fn display_matches_as_str() {
        for role in Role::ALL {
            assert_eq!(role.to_string(), role.as_str());
        }
    }
}
