use std::env;
use tokio::io::{self, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bulk_indexer::input::{feed, FeedSummary};
use bulk_indexer::{Dependencies, IndexingError};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bulk_indexer=info"));

    if env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    dotenv::dotenv().ok();
    init_tracing();

    let Dependencies {
        processor,
        close_timeout,
    } = Dependencies::new().await?;

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let FeedSummary {
        lines,
        skipped,
        read_error,
    } = feed(BufReader::new(io::stdin()), &processor, shutdown).await;

    let drained = processor.close(close_timeout).await;
    let stats = serde_json::to_string(&processor.stats()).unwrap_or_default();

    info!(
        drained = drained,
        lines = lines,
        skipped = skipped,
        stats = %stats,
        "Bulk indexer shutdown complete"
    );

    if !drained {
        warn!(
            timeout_secs = close_timeout.as_secs(),
            "Shutdown timed out before all batches settled"
        );
    }

    match read_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
