use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BingError;

/// Image model offered by Bing Image Creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    /// DALL-E 3, returns up to four images per prompt.
    #[default]
    Dalle3,
    /// GPT-4o image generation, one image per prompt.
    Gpt4o,
    /// Microsoft MAI image model, one image per prompt.
    Mai,
}

impl Model {
    /// Provider-specific settings for this model.
    pub fn config(self) -> &'static ModelConfig {
        match self {
            Model::Dalle3 => &MODEL_CONFIGS[0],
            Model::Gpt4o => &MODEL_CONFIGS[1],
            Model::Mai => &MODEL_CONFIGS[2],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Model::Dalle3 => "dalle3",
            Model::Gpt4o => "gpt4o",
            Model::Mai => "mai",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = BingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dalle3" => Ok(Model::Dalle3),
            "gpt4o" => Ok(Model::Gpt4o),
            "mai" => Ok(Model::Mai),
            other => Err(BingError::InvalidArgument(format!(
                "Unknown model '{}' (expected dalle3, gpt4o or mai)",
                other
            ))),
        }
    }
}

/// Output aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    #[default]
    Square,
    Landscape,
    Portrait,
}

impl AspectRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "square",
            AspectRatio::Landscape => "landscape",
            AspectRatio::Portrait => "portrait",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = BingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(AspectRatio::Square),
            "landscape" => Ok(AspectRatio::Landscape),
            "portrait" => Ok(AspectRatio::Portrait),
            other => Err(BingError::InvalidArgument(format!(
                "Unknown aspect ratio '{}' (expected square, landscape or portrait)",
                other
            ))),
        }
    }
}

/// Provider codes for one model, as sent in the `mdl` and `ar` query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub model: Model,
    pub code: u8,
    pub expected_images: usize,
    pub square: u8,
    pub landscape: u8,
    pub portrait: u8,
}

impl ModelConfig {
    /// Provider code for the given aspect ratio.
    pub fn aspect_code(&self, aspect_ratio: AspectRatio) -> u8 {
        match aspect_ratio {
            AspectRatio::Square => self.square,
            AspectRatio::Landscape => self.landscape,
            AspectRatio::Portrait => self.portrait,
        }
    }
}

/// Process-wide model table, indexed in [`Model`] declaration order.
pub static MODEL_CONFIGS: [ModelConfig; 3] = [
    ModelConfig {
        model: Model::Dalle3,
        code: 0,
        expected_images: 4,
        square: 1,
        landscape: 2,
        portrait: 3,
    },
    ModelConfig {
        model: Model::Gpt4o,
        code: 1,
        expected_images: 1,
        square: 1,
        landscape: 2,
        portrait: 3,
    },
    ModelConfig {
        model: Model::Mai,
        code: 4,
        expected_images: 1,
        square: 1,
        landscape: 2,
        portrait: 3,
    },
];

/// Identifier of an in-flight generation job, taken from Bing's redirect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(pub(crate) String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A generated image: canonical URL plus a suggested local filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    pub url: String,
    pub filename: String,
}

/// Result of inspecting one poll response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// Bing has nothing yet; poll again after the interval.
    Pending,
    /// The finished HTML fragment.
    Ready(String),
}
