//! # ClipMagic-RS
//!
//! Rust client for the ClipMagic media-processing API. Describes video and
//! audio operations — convert, trim, compress, caption burning, silence
//! removal, stitching, AI clip generation, split-screen — as flat parameter
//! sets, compiles them into HTTP requests, executes them in batches, and
//! classifies each response as binary media or JSON.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clipmagic_rs::{BatchItem, ClipMagicClient, ConfigBuilder};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigBuilder::new()
//!         .api_key("cm-your-key")
//!         .continue_on_failure(true)
//!         .build();
//!     let client = ClipMagicClient::new(config)?;
//!
//!     let items = vec![
//!         BatchItem::from_value(0, json!({
//!             "operation": "convert",
//!             "url": "https://example.com/input.mp4",
//!             "outputFormat": "mp3",
//!         }))?,
//!         BatchItem::from_value(1, json!({
//!             "operation": "compress",
//!             "url": "https://example.com/input.mp4",
//!             "preset": "medium",
//!             "crf": 23,
//!             "outputFormat": "mp4",
//!         }))?,
//!     ];
//!
//!     for result in client.run_batch(&items).await? {
//!         println!("{}", result.to_record());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod classifier;
pub mod compiler;
pub mod config;
pub mod error;
pub mod executor;
pub mod params;
pub mod transport;
pub mod types;

// Re-export main types
pub use config::{ClientConfig, ConfigBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
pub use error::{ClientError, Result};
pub use executor::BatchExecutor;
pub use params::ParameterResolver;
pub use transport::{HttpTransport, Transport};
pub use types::{
    BatchItem, ClassifiedResult, EndMode, ExecutionResult, HttpMethod, ItemOutcome, OperationKind,
    RequestDescriptor, Segment, TransportResponse,
};

use tracing::info;

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// High-level client tying configuration, transport, and executor together.
pub struct ClipMagicClient {
    config: ClientConfig,
    transport: HttpTransport,
    executor: BatchExecutor,
}

impl ClipMagicClient {
    /// Create a client from a configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let transport = HttpTransport::new(config.clone())?;
        let executor = BatchExecutor::new(config.timeout(), config.continue_on_failure);

        info!(base_url = %config.base_url, "ClipMagic client created");

        Ok(Self {
            config,
            transport,
            executor,
        })
    }

    /// Run a batch of items, one result per item in input order.
    pub async fn run_batch(&self, items: &[BatchItem]) -> Result<Vec<ExecutionResult>> {
        self.executor.run(items, &self.transport).await
    }

    /// Convenience wrapper for a single item.
    pub async fn execute(&self, item: &BatchItem) -> Result<ExecutionResult> {
        let mut results = self.run_batch(std::slice::from_ref(item)).await?;
        Ok(results.remove(0))
    }

    /// The active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
