//! Request, prompt, and response envelopes for deck generation.
//!
//! These are the pure parts of the generation endpoint: validating the
//! `{topic, slidesCount}` body, writing the prompt that asks the model for
//! slide-formatted text, and wrapping parsed slides (or an error) in the
//! `{success, ...}` response body. The network call itself lives elsewhere.

use crate::{BlockKinds, Error, Result, Slide};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Upper bound on slides per request.
pub const MAX_SLIDES: usize = 50;

/// Slide count used when the request omits one.
pub const DEFAULT_SLIDES: usize = 5;

fn default_slides() -> usize {
    DEFAULT_SLIDES
}

/// Body of a deck generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckRequest {
    pub topic: String,

    #[serde(default = "default_slides")]
    pub slides_count: usize,
}

impl DeckRequest {
    pub fn new(topic: impl Into<String>, slides_count: usize) -> Self {
        Self {
            topic: topic.into(),
            slides_count,
        }
    }

    /// Parse and validate a JSON request body.
    pub fn from_json(json: &str) -> Result<Self> {
        let request: Self = serde_json::from_str(json)?;
        request.validate()?;
        Ok(request)
    }

    /// Check the topic is present and the slide count is in range.
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(Error::InvalidRequest("topic is required".to_string()));
        }
        if self.slides_count == 0 || self.slides_count > MAX_SLIDES {
            return Err(Error::InvalidRequest(format!(
                "slidesCount must be between 1 and {}, got {}",
                MAX_SLIDES, self.slides_count
            )));
        }
        Ok(())
    }
}

/// Builds the prompt asking the model for slide-formatted text.
///
/// Only the block kinds the parser will collect are requested.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    blocks: BlockKinds,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the prompt to the given block kinds.
    pub fn with_blocks(mut self, blocks: BlockKinds) -> Self {
        self.blocks = blocks;
        self
    }

    /// Write the prompt for a validated request.
    pub fn build(&self, request: &DeckRequest) -> String {
        let topic = request.topic.trim();
        let mut lines = vec![
            format!(
                "Create a presentation about \"{}\" with exactly {} slides.",
                topic, request.slides_count
            ),
            String::new(),
            "Start every slide with a line of the form \"Slide N: Title\".".to_string(),
            "List the key points of each slide as bullet points starting with \"- \".".to_string(),
        ];

        if self.blocks.tables {
            lines.push(
                "Where a comparison helps, add a markdown table with rows starting with \"|\"."
                    .to_string(),
            );
        }

        if self.blocks.charts {
            lines.push(
                "For numeric data, add a ```chart block containing \"Type: <bar|pie|line>\", \
                 an optional \"Title: <label>\", and one \"Label: value\" line per data point, \
                 closed with ```."
                    .to_string(),
            );
        }

        if self.blocks.columns {
            lines.push(
                "For side-by-side content, write each column heading in bold on its own line \
                 (for example **Benefits:**) followed by its bullet points."
                    .to_string(),
            );
        }

        if self.blocks.shapes {
            lines.push(
                "When a visual would help, add a line such as \"Use a triangle shape to represent \
                 hierarchy.\""
                    .to_string(),
            );
        }

        lines.push(String::new());
        lines.push("Do not add any text before the first slide.".to_string());

        lines.join("\n")
    }
}

/// Response body returned to the caller of the generation endpoint.
///
/// Serialized as `{"success": true, "slides": [...]}` or
/// `{"success": false, "error": "..."}`. The `success` flag is derived from
/// the variant, and bodies whose flag disagrees with their payload are
/// rejected when deserializing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ResponseBody")]
pub enum DeckResponse {
    Success(Vec<Slide>),
    Failure(String),
}

/// Wire shape of [`DeckResponse`] before the flag is checked.
#[derive(Deserialize)]
struct ResponseBody {
    success: bool,
    slides: Option<Vec<Slide>>,
    error: Option<String>,
}

impl TryFrom<ResponseBody> for DeckResponse {
    type Error = String;

    fn try_from(body: ResponseBody) -> std::result::Result<Self, Self::Error> {
        match body {
            ResponseBody {
                success: true,
                slides: Some(slides),
                error: None,
            } => Ok(Self::Success(slides)),
            ResponseBody {
                success: false,
                slides: None,
                error: Some(error),
            } => Ok(Self::Failure(error)),
            ResponseBody { success: true, .. } => {
                Err("success response must carry slides and no error".to_string())
            }
            ResponseBody { success: false, .. } => {
                Err("failure response must carry an error and no slides".to_string())
            }
        }
    }
}

impl Serialize for DeckResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut body = serializer.serialize_struct("DeckResponse", 2)?;
        match self {
            Self::Success(slides) => {
                body.serialize_field("success", &true)?;
                body.serialize_field("slides", slides)?;
            }
            Self::Failure(error) => {
                body.serialize_field("success", &false)?;
                body.serialize_field("error", error)?;
            }
        }
        body.end()
    }
}

impl DeckResponse {
    /// Wrap parsed slides in a success envelope.
    pub fn success(slides: Vec<Slide>) -> Self {
        Self::Success(slides)
    }

    /// Wrap an error message in a failure envelope.
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure(error.into())
    }

    /// Build a response from the model's reply text.
    ///
    /// Missing or blank text is reported as [`Error::EmptyResponse`]; any
    /// other text is handed to `parse`.
    pub fn from_generated<F>(text: Option<&str>, parse: F) -> Self
    where
        F: FnOnce(&str) -> Vec<Slide>,
    {
        match text {
            Some(text) if !text.trim().is_empty() => Self::success(parse(text)),
            _ => {
                log::warn!("Model returned no text");
                Self::from(Error::EmptyResponse)
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<Error> for DeckResponse {
    fn from(err: Error) -> Self {
        Self::failure(err.to_string())
    }
}
