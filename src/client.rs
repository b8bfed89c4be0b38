use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, Url};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{CreateOptions, GenerationRequest};
use crate::error::{BingError, Result};
use crate::filename::generate_filename;
use crate::parser;
use crate::transport::{BingRequest, BingResponse, HttpTransport, Transport};
use crate::types::{ImageResult, JobId, PollState};

pub const DEFAULT_BASE_URL: &str = "https://www.bing.com";

fn normalize(endpoint: String) -> String {
    endpoint.trim_end_matches('/').to_string()
}

/// Async client for Bing Image Creator.
///
/// One [`create_images`](Self::create_images) call submits the prompt, polls
/// until the result fragment is ready, and returns canonical image URLs with
/// suggested filenames. The client holds no per-call state, so a single
/// instance can serve concurrent calls.
///
/// # Example
/// ```no_run
/// use bing_image_creator::{BingClient, CreateOptions};
///
/// # async fn example() -> bing_image_creator::Result<()> {
/// let client = BingClient::new()?;
/// let images = client
///     .create_images("a cat wearing a hat", &CreateOptions::new("<_U cookie>"))
///     .await?;
/// for image in &images {
///     println!("{} -> {}", image.url, image.filename);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BingClient<T = HttpTransport> {
    transport: Arc<T>,
    base_url: String,
}

impl<T> Clone for BingClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            base_url: self.base_url.clone(),
        }
    }
}

impl BingClient<HttpTransport> {
    /// Create a client using the default `reqwest` transport.
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }
}

impl<T: Transport> BingClient<T> {
    /// Create a client on top of a custom transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Send requests somewhere other than `https://www.bing.com`.
    ///
    /// Image URLs are still canonicalized to `www.bing.com`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize(base_url.into());
        self
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Facade ──────────────────────────────────────────────────────

    /// Generate images for `prompt` and return them in page order.
    ///
    /// # Errors
    ///
    /// Any [`BingError`]; nothing is returned unless the whole flow succeeds.
    pub async fn create_images(
        &self,
        prompt: &str,
        options: &CreateOptions,
    ) -> Result<Vec<ImageResult>> {
        let request = GenerationRequest::resolve(prompt, options)?;
        let expected = request.model().config().expected_images;

        info!(
            model = %request.model(),
            aspect_ratio = %request.aspect_ratio(),
            "submitting image generation"
        );

        let job_id = self.submit(&request).await?;
        let html = self.poll_for_results(&request, &job_id).await?;
        let urls = parser::extract_image_urls(&html)?;

        if urls.len() < expected {
            warn!(
                job_id = %job_id,
                found = urls.len(),
                expected,
                "Bing returned fewer images than the model usually produces"
            );
        }
        info!(job_id = %job_id, count = urls.len(), "image generation completed");

        Ok(urls
            .into_iter()
            .enumerate()
            .map(|(index, url)| ImageResult {
                url,
                filename: generate_filename(request.prompt(), index),
            })
            .collect())
    }

    // ── Submission ──────────────────────────────────────────────────

    /// Submit the prompt and return the job id from Bing's redirect.
    ///
    /// # Errors
    ///
    /// [`BingError::Authentication`] when Bing doesn't redirect (bad cookie),
    /// [`BingError::Parse`] when the redirect carries no id, and
    /// [`BingError::RequestTimeout`] when the request budget runs out.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<JobId> {
        let url = self.endpoint_url(
            "/images/create",
            &[
                ("q", request.prompt().to_string()),
                ("rt", "4".to_string()),
                ("mdl", request.model_code().to_string()),
                ("ar", request.aspect_code().to_string()),
                ("FORM", "GENCRE".to_string()),
            ],
        )?;

        let resp = self
            .send_with_timeout(
                BingRequest {
                    method: Method::POST,
                    url,
                    cookie: request.cookie().to_string(),
                },
                request.timeouts().request,
            )
            .await?;

        let location = resp.location.ok_or(BingError::Authentication)?;
        let job_id = parser::extract_job_id(&location)?;
        debug!(job_id = %job_id, status = resp.status, "generation job accepted");
        Ok(job_id)
    }

    // ── Polling ─────────────────────────────────────────────────────

    /// Poll the async results endpoint until the HTML fragment is ready.
    ///
    /// The generation budget is checked before every poll, and each poll may
    /// use at most the budget that is left.
    ///
    /// # Errors
    ///
    /// [`BingError::GenerationTimeout`] when the budget is spent,
    /// [`BingError::UpstreamHttp`] on a non-2xx status, and the payload
    /// errors from [`parser::classify_poll_body`].
    pub async fn poll_for_results(
        &self,
        request: &GenerationRequest,
        job_id: &JobId,
    ) -> Result<String> {
        let timeouts = request.timeouts();
        let url = self.results_url(
            job_id,
            &[
                ("q", request.prompt().to_string()),
                ("mdl", request.model_code().to_string()),
                ("ar", request.aspect_code().to_string()),
            ],
        )?;

        let start = Instant::now();
        let mut attempt: u32 = 0;
        loop {
            let elapsed = start.elapsed();
            if elapsed >= timeouts.generation {
                warn!(job_id = %job_id, attempts = attempt, "generation budget exhausted");
                return Err(BingError::GenerationTimeout {
                    timeout: timeouts.generation,
                });
            }
            attempt += 1;

            let limit = timeouts.request.min(timeouts.generation - elapsed);
            let resp = self
                .send_with_timeout(
                    BingRequest {
                        method: Method::GET,
                        url: url.clone(),
                        cookie: request.cookie().to_string(),
                    },
                    limit,
                )
                .await?;

            if !resp.is_success() {
                return Err(BingError::UpstreamHttp {
                    status: resp.status,
                    status_text: resp.status_text,
                });
            }

            match parser::classify_poll_body(&resp.body)? {
                PollState::Pending => {
                    debug!(
                        job_id = %job_id,
                        attempt,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "results not ready"
                    );
                    tokio::time::sleep(timeouts.poll_interval).await;
                }
                PollState::Ready(html) => {
                    debug!(job_id = %job_id, attempt, bytes = html.len(), "results ready");
                    return Ok(html);
                }
            }
        }
    }

    // ── Internals ───────────────────────────────────────────────────

    async fn send_with_timeout(&self, request: BingRequest, limit: Duration) -> Result<BingResponse> {
        // Dropping the send future on expiry aborts the in-flight request.
        tokio::time::timeout(limit, self.transport.send(request))
            .await
            .map_err(|_| BingError::RequestTimeout { timeout: limit })?
    }

    fn endpoint_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        Url::parse_with_params(&format!("{}{}", self.base_url, path), params)
            .map_err(|e| BingError::InvalidArgument(format!("Bad request URL: {}", e)))
    }

    /// The job id always lands as one escaped path segment.
    fn results_url(&self, job_id: &JobId, params: &[(&str, String)]) -> Result<Url> {
        let mut url = self.endpoint_url("/images/create/async/results", &[])?;
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| {
                BingError::InvalidArgument(format!("Base URL can't carry a path: {}", self.base_url))
            })?
            .push(job_id.as_str());
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }
}
