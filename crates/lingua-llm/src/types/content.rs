use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

use crate::error::ContentError;

/// Discriminator of a content part
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContentType {
    /// Plain text
    Text,
    /// Reference to an external resource
    Url,
    /// Image, by URL or data URI
    Image,
    /// Document, by URL or data URI
    Document,
}

/// One typed unit within a message's content sequence
///
/// Payload fields are optional so that "not provided" stays distinguishable
/// from "provided empty". Adapters skip parts without a usable payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPart {
    /// Text content
    Text {
        /// The text string
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    /// Reference to an external resource
    Url {
        /// Resource location
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        /// Language hint for the referenced content
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    /// Image reference
    Image {
        /// Image URL or base64 data URI
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    /// Document reference
    Document {
        /// Document URL, path or base64 data URI
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        /// Language hint for the document
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
}

impl ContentPart {
    /// Build a text part
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptyPayload` if `text` is empty.
    pub fn text(text: impl Into<String>) -> Result<Self, ContentError> {
        let text = non_empty(text.into(), ContentType::Text)?;
        Ok(Self::Text { text: Some(text) })
    }

    /// Build a URL reference part with an optional language hint
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptyPayload` if `url` is empty.
    pub fn reference(url: impl Into<String>, language: Option<String>) -> Result<Self, ContentError> {
        let url = non_empty(url.into(), ContentType::Url)?;
        Ok(Self::Url {
            url: Some(url),
            language: language.filter(|l| !l.is_empty()),
        })
    }

    /// Build an image part from a URL or data URI
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptyPayload` if `url` is empty.
    pub fn image(url: impl Into<String>) -> Result<Self, ContentError> {
        let url = non_empty(url.into(), ContentType::Image)?;
        Ok(Self::Image { url: Some(url) })
    }

    /// Build a document part with an optional language hint
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptyPayload` if `url` is empty.
    pub fn document(url: impl Into<String>, language: Option<String>) -> Result<Self, ContentError> {
        let url = non_empty(url.into(), ContentType::Document)?;
        Ok(Self::Document {
            url: Some(url),
            language: language.filter(|l| !l.is_empty()),
        })
    }

    /// Discriminator of this part
    pub const fn content_type(&self) -> ContentType {
        match self {
            Self::Text { .. } => ContentType::Text,
            Self::Url { .. } => ContentType::Url,
            Self::Image { .. } => ContentType::Image,
            Self::Document { .. } => ContentType::Document,
        }
    }

    /// The meaningful payload of this part, if present and non-empty
    pub fn payload(&self) -> Option<&str> {
        let value = match self {
            Self::Text { text } => text.as_deref(),
            Self::Url { url, .. } | Self::Image { url } | Self::Document { url, .. } => url.as_deref(),
        };

        value.filter(|v| !v.is_empty())
    }

    /// Text payload, for text parts only
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { .. } => self.payload(),
            _ => None,
        }
    }
}

fn non_empty(value: String, content_type: ContentType) -> Result<String, ContentError> {
    if value.is_empty() {
        Err(ContentError::EmptyPayload { content_type })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_constructor_rejects_empty() {
        let err = ContentPart::text("").unwrap_err();
        assert_eq!(
            err,
            ContentError::EmptyPayload {
                content_type: ContentType::Text
            }
        );
    }

    #[test]
    fn reference_constructor_drops_empty_language() {
        let part = ContentPart::reference("https://example.com", Some(String::new())).unwrap();
        assert_eq!(
            part,
            ContentPart::Url {
                url: Some("https://example.com".to_owned()),
                language: None,
            }
        );
    }

    #[test]
    fn reference_constructor_rejects_empty_url() {
        assert!(ContentPart::reference("", Some("en".to_owned())).is_err());
        assert!(ContentPart::image("").is_err());
        assert!(ContentPart::document("", None).is_err());
    }

    #[test]
    fn absent_payload_serializes_without_field() {
        let part = ContentPart::Text { text: None };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json, serde_json::json!({"type": "text"}));
        assert_eq!(part.payload(), None);
    }

    #[test]
    fn empty_payload_is_not_meaningful() {
        let part = ContentPart::Image { url: Some(String::new()) };
        assert_eq!(part.payload(), None);
    }

    #[test]
    fn deserializes_tagged_parts() {
        let part: ContentPart =
            serde_json::from_value(serde_json::json!({"type": "url", "url": "https://a.b", "language": "fr"})).unwrap();
        assert_eq!(part.content_type(), ContentType::Url);
        assert_eq!(part.payload(), Some("https://a.b"));
    }

    #[test]
    fn content_type_renders_lowercase() {
        assert_eq!(ContentType::Document.to_string(), "document");
        assert_eq!(ContentType::Image.as_ref(), "image");
    }
}
