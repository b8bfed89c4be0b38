//! # bing-image-creator
//!
//! Async Rust client for [Bing Image Creator](https://www.bing.com/images/create),
//! driven through the same cookie-authenticated web flow the browser uses.
//!
//! A call submits the prompt, polls the async results endpoint until the
//! result fragment is ready, then extracts the image URLs, rewrites them to
//! the canonical `https://www.bing.com/th/id/<id>?pid=<pid>` form and pairs
//! each with a filename derived from the prompt.
//!
//! Obtaining the `_U` cookie, downloading or caching images, retries and
//! rate limiting are left to the caller.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bing_image_creator::{AspectRatio, CreateOptions, Model};
//!
//! # async fn example() -> bing_image_creator::Result<()> {
//! let options = CreateOptions::new(std::env::var("BING_AUTH_COOKIE").unwrap_or_default())
//!     .with_model(Model::Dalle3)
//!     .with_aspect_ratio(AspectRatio::Square);
//!
//! let images = bing_image_creator::create_images("a cat wearing a hat", &options).await?;
//! for image in &images {
//!     println!("{} {}", image.url, image.filename);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod filename;
pub mod parser;
pub mod transport;
pub mod types;
pub mod urls;

pub use client::BingClient;
pub use config::{CreateOptions, GenerationRequest, Timeouts};
pub use error::{BingError, Result};
pub use filename::generate_filename;
pub use transport::{BingRequest, BingResponse, HttpTransport, Transport};
pub use types::{AspectRatio, ImageResult, JobId, Model, ModelConfig, PollState, MODEL_CONFIGS};

/// Generate images with a one-off client on the default HTTP transport.
///
/// Prefer a shared [`BingClient`] when making many calls.
pub async fn create_images(prompt: &str, options: &CreateOptions) -> Result<Vec<ImageResult>> {
    // Validate before building a client so bad input never touches the network stack.
    GenerationRequest::resolve(prompt, options)?;
    BingClient::new()?.create_images(prompt, options).await
}
