//! Minimal live search against google.com.
//!
//! Run with: `cargo run --example basic_search -- "your query"`
//! Set `RUST_LOG=googleserp_core=debug` to watch the session work.

use googleserp_core::{SearchConfig, SearchSession};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "rust async web scraping".to_string());

    let config = SearchConfig {
        max_results: 25,
        verbose: true,
        ..SearchConfig::new(query)
    };

    let session = SearchSession::new(config)?;
    let outcome = session.search().await?;

    if outcome.is_rate_limited() {
        eprintln!("rate limited by the server; partial results below");
    }

    for result in outcome.results() {
        println!("{:>3}. {}", result.rank, result.url);
        if let Some(title) = &result.title
            && !title.is_empty()
        {
            println!("     {title}");
        }
        if let Some(description) = &result.description
            && !description.is_empty()
        {
            println!("     {description}");
        }
    }

    Ok(())
}
