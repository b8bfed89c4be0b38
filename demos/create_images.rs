//! Generate images for a prompt and print their URLs.
//!
//! Requires a valid `_U` cookie from a signed-in Bing session.
//!
//! ```sh
//! BING_AUTH_COOKIE=... cargo run --example create_images -- "a small blue square"
//! ```
//!
//! `BING_MODEL` (dalle3, gpt4o, mai) and `BING_ASPECT_RATIO` (square,
//! landscape, portrait) are optional. Set `RUST_LOG=bing_image_creator=debug`
//! to watch the polling.

use bing_image_creator::{BingClient, CreateOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "a simple red circle".to_string());

    let options = match CreateOptions::from_env() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(());
        }
    };

    let client = BingClient::new()?;
    match client.create_images(&prompt, &options).await {
        Ok(images) => {
            println!("Generated {} image(s)", images.len());
            for image in &images {
                println!("{}  {}", image.filename, image.url);
            }
        }
        Err(e) if e.is_retryable() => eprintln!("Generation failed, try again: {}", e),
        Err(e) => eprintln!("Generation failed: {}", e),
    }

    Ok(())
}
