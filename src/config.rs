use std::env;
use std::time::Duration;

use crate::error::{BingError, Result};
use crate::types::{AspectRatio, Model};

/// Environment variable holding the `_U` cookie value.
pub const COOKIE_ENV: &str = "BING_AUTH_COOKIE";
/// Optional environment variable selecting the model (`dalle3`, `gpt4o`, `mai`).
pub const MODEL_ENV: &str = "BING_MODEL";
/// Optional environment variable selecting the aspect ratio.
pub const ASPECT_RATIO_ENV: &str = "BING_ASPECT_RATIO";

/// Time budgets for one `create_images` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Total time allowed for polling before giving up.
    pub generation: Duration,

    /// Pause between polls that came back empty.
    pub poll_interval: Duration,

    /// Upper bound for any single HTTP request.
    pub request: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            generation: Duration::from_secs(300),
            poll_interval: Duration::from_secs(1),
            request: Duration::from_secs(30),
        }
    }
}

impl Timeouts {
    /// Build from millisecond values.
    pub fn from_millis(generation: u64, poll_interval: u64, request: u64) -> Self {
        Self {
            generation: Duration::from_millis(generation),
            poll_interval: Duration::from_millis(poll_interval),
            request: Duration::from_millis(request),
        }
    }
}

/// Per-call options. Only the cookie is required.
///
/// ```
/// use bing_image_creator::{AspectRatio, CreateOptions, Model};
///
/// let options = CreateOptions::new("cookie-value")
///     .with_model(Model::Gpt4o)
///     .with_aspect_ratio(AspectRatio::Landscape);
/// assert_eq!(options.model, Some(Model::Gpt4o));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Value of Bing's `_U` authentication cookie.
    pub cookie: String,
    pub model: Option<Model>,
    pub aspect_ratio: Option<AspectRatio>,
    pub timeouts: Option<Timeouts>,
}

impl CreateOptions {
    pub fn new(cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
            ..Self::default()
        }
    }

    /// Load options from `BING_AUTH_COOKIE`, `BING_MODEL` and `BING_ASPECT_RATIO`.
    pub fn from_env() -> Result<Self> {
        let cookie = env::var(COOKIE_ENV).map_err(|_| {
            BingError::InvalidArgument(format!("{} is not set", COOKIE_ENV))
        })?;

        let mut options = Self::new(cookie);
        if let Ok(model) = env::var(MODEL_ENV) {
            options.model = Some(model.parse()?);
        }
        if let Ok(aspect_ratio) = env::var(ASPECT_RATIO_ENV) {
            options.aspect_ratio = Some(aspect_ratio.parse()?);
        }
        Ok(options)
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(aspect_ratio);
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = Some(timeouts);
        self
    }
}

/// A validated request with every default filled in.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    prompt: String,
    cookie: String,
    model: Model,
    aspect_ratio: AspectRatio,
    timeouts: Timeouts,
}

impl GenerationRequest {
    /// Validate the prompt and cookie and resolve defaults.
    ///
    /// # Errors
    ///
    /// [`BingError::InvalidArgument`] when the prompt or cookie is blank.
    pub fn resolve(prompt: &str, options: &CreateOptions) -> Result<Self> {
        if prompt.trim().is_empty() {
            return Err(BingError::InvalidArgument(
                "Prompt must be a non-empty string".into(),
            ));
        }
        if options.cookie.trim().is_empty() {
            return Err(BingError::InvalidArgument(
                "options.cookie is required and must be a non-empty string".into(),
            ));
        }

        Ok(Self {
            prompt: prompt.to_string(),
            cookie: options.cookie.clone(),
            model: options.model.unwrap_or_default(),
            aspect_ratio: options.aspect_ratio.unwrap_or_default(),
            timeouts: options.timeouts.unwrap_or_default(),
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// `mdl` query value.
    pub(crate) fn model_code(&self) -> u8 {
        self.model.config().code
    }

    /// `ar` query value.
    pub(crate) fn aspect_code(&self) -> u8 {
        self.model.config().aspect_code(self.aspect_ratio)
    }
}
