use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::content::ContentPart;

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    /// End user
    User,
    /// Model output
    Assistant,
    /// System instruction
    System,
}

/// Message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author
    pub role: Role,
    /// Ordered content parts
    #[serde(default)]
    pub content: Vec<ContentPart>,
}

impl Message {
    /// Create a message holding a single text part
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![ContentPart::Text {
                text: Some(text.into()),
            }],
        }
    }

    /// Whether any part carries a usable payload
    ///
    /// Parts without one are skipped during conversion, so a message made only
    /// of such parts would reach the provider empty.
    pub fn has_content(&self) -> bool {
        self.content.iter().any(|part| part.payload().is_some())
    }

    /// Concatenate the text parts of this message without separators
    ///
    /// Streamed fragments are joined this way so that token boundaries are
    /// preserved exactly.
    pub fn joined_text(&self) -> String {
        self.content.iter().filter_map(ContentPart::as_text).collect()
    }
}

/// Instructions some providers fold into the message list and others accept
/// through a dedicated field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInstructions {
    /// Instruction parts, text in current usage
    #[serde(default)]
    pub instructions: Vec<ContentPart>,
}

impl SystemInstructions {
    /// Create instructions from a single text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            instructions: vec![ContentPart::Text {
                text: Some(text.into()),
            }],
        }
    }

    /// Non-empty text instructions joined by a single space
    pub fn combined_text(&self) -> String {
        self.instructions
            .iter()
            .filter_map(ContentPart::as_text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether no instruction carries usable text
    pub fn is_blank(&self) -> bool {
        self.instructions.iter().all(|p| p.as_text().is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_text_skips_empty_and_non_text_parts() {
        let system = SystemInstructions {
            instructions: vec![
                ContentPart::Text {
                    text: Some("Be brief.".to_owned()),
                },
                ContentPart::Text { text: None },
                ContentPart::Url {
                    url: Some("https://example.com".to_owned()),
                    language: None,
                },
                ContentPart::Text {
                    text: Some("Answer in French.".to_owned()),
                },
            ],
        };
        assert_eq!(system.combined_text(), "Be brief. Answer in French.");
        assert!(!system.is_blank());
    }

    #[test]
    fn blank_instructions() {
        let system = SystemInstructions {
            instructions: vec![ContentPart::Text { text: Some(String::new()) }],
        };
        assert!(system.is_blank());
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Assistant".parse::<Role>().unwrap(), Role::Assistant);
        assert_eq!(Role::System.to_string(), "system");
    }
}
