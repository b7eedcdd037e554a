//! Payloads returned by the `/ocr/` backend endpoint.

use serde::{Deserialize, Deserializer, Serialize};

/// Body of a `POST /ocr/` response.
///
/// Successful responses carry `text`, `segments` and `entities`, plus
/// `pdf_base64` when a PDF was requested. Failed responses carry only
/// `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OcrResponse {
    /// Full extracted text, one segment per line.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,

    /// Medical entities detected in the text.
    #[serde(default)]
    pub entities: Vec<Entity>,

    /// Layout blocks the text was read from.
    #[serde(default)]
    pub segments: Vec<Segment>,

    /// Base64-encoded PDF bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_base64: Option<String>,

    /// Backend failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A named entity found in the extracted text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    /// Source text the entity was recognised from.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,

    /// Entity label.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub entity: String,

    /// Model confidence in `[0, 1]`.
    #[serde(default)]
    pub score: f32,

    /// Start offset within the chunk the entity was found in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,

    /// End offset within the chunk the entity was found in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<u32>,
}

/// A block of text with its pixel bounding box.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    /// Recognised text.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,

    /// `[x1, y1, x2, y2]` in image pixels.
    pub bbox: [i32; 4],

    /// Layout block type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Layout detection confidence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl Segment {
    /// Create a segment from a top-left corner and size.
    pub fn from_rect(text: impl Into<String>, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            text: text.into(),
            bbox: [x, y, x + width, y + height],
            kind: None,
            score: None,
        }
    }

    pub fn top(&self) -> i32 {
        self.bbox[1]
    }

    pub fn bottom(&self) -> i32 {
        self.bbox[3]
    }

    pub fn width(&self) -> i32 {
        self.bbox[2] - self.bbox[0]
    }

    pub fn height(&self) -> i32 {
        self.bbox[3] - self.bbox[1]
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
